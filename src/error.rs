use std::fmt;

/// 应用程序错误类型
///
/// 按失败来源分类：提取错误、策略无解错误、传输错误、
/// 截止时间错误、配置错误。任何一类错误都会终止当前测验运行。
#[derive(Debug)]
pub enum AppError {
    /// 浏览器相关错误（启动、建页、导航、执行脚本）
    Browser {
        action: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 快照提取错误（无法定位提交地址、页面结构异常）
    Extraction {
        url: String,
        reason: String,
    },
    /// 策略无法给出可信答案（选定后不再回退到其他策略）
    StrategyUnsolvable {
        strategy: &'static str,
        reason: String,
    },
    /// 网络传输错误（下载、提交、导航），不重试
    Transport {
        endpoint: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 对端返回非成功状态码
    BadStatus {
        endpoint: String,
        status: u16,
    },
    /// 提交负载超出字节上限（本地拒绝，不发送）
    PayloadTooLarge {
        size: usize,
        limit: usize,
    },
    /// 截止时间已过，无法进入下一阶段
    DeadlineExceeded {
        phase: String,
    },
    /// LLM 调用错误
    Llm {
        model: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 缺少必需的凭证或配置（首次使用时报错）
    MissingCredential {
        var_name: String,
    },
    /// 其他错误（用于包装第三方库错误）
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Browser { action, source } => {
                write!(f, "浏览器错误 ({}): {}", action, source)
            }
            AppError::Extraction { url, reason } => {
                write!(f, "页面快照提取失败 ({}): {}", url, reason)
            }
            AppError::StrategyUnsolvable { strategy, reason } => {
                write!(f, "策略 {} 无法得出答案: {}", strategy, reason)
            }
            AppError::Transport { endpoint, source } => {
                write!(f, "网络请求失败 ({}): {}", endpoint, source)
            }
            AppError::BadStatus { endpoint, status } => {
                write!(f, "对端返回非成功状态 ({}): {}", endpoint, status)
            }
            AppError::PayloadTooLarge { size, limit } => {
                write!(f, "提交负载 {} 字节超过上限 {} 字节", size, limit)
            }
            AppError::DeadlineExceeded { phase } => {
                write!(f, "3 分钟截止时间已过，无法进入阶段: {}", phase)
            }
            AppError::Llm { model, source } => {
                write!(f, "LLM 调用失败 (模型: {}): {}", model, source)
            }
            AppError::MissingCredential { var_name } => {
                write!(f, "缺少必需的配置项: {}", var_name)
            }
            AppError::Other(msg) => write!(f, "错误: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Browser { source, .. }
            | AppError::Transport { source, .. }
            | AppError::Llm { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

// ========== 从常见错误类型转换 ==========

impl From<chromiumoxide::error::CdpError> for AppError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        AppError::Browser {
            action: "执行脚本".to_string(),
            source: Box::new(err),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Other(format!("JSON 处理失败: {}", err))
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建浏览器错误
    pub fn browser(
        action: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Browser {
            action: action.into(),
            source: Box::new(source),
        }
    }

    /// 创建快照提取错误
    pub fn extraction(url: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::Extraction {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// 创建策略无解错误
    pub fn unsolvable(strategy: &'static str, reason: impl Into<String>) -> Self {
        AppError::StrategyUnsolvable {
            strategy,
            reason: reason.into(),
        }
    }

    /// 创建传输错误
    pub fn transport(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Transport {
            endpoint: endpoint.into(),
            source: Box::new(source),
        }
    }

    /// 创建截止时间错误（始终标注未能进入的阶段）
    pub fn deadline(phase: impl Into<String>) -> Self {
        AppError::DeadlineExceeded {
            phase: phase.into(),
        }
    }
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
