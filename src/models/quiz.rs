//! 测验领域数据模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// 一次测验请求
///
/// 入站接口校验通过后创建，之后不可变；
/// 整个生命周期归属于唯一的一次运行，运行结束即销毁
#[derive(Debug, Clone)]
pub struct QuizRequest {
    pub email: String,
    pub secret: String,
    pub target_url: String,
    pub received_at: DateTime<Utc>,
}

/// 单个页面的结构化快照
///
/// 每一跳重新提取，只读；`submit_url` 保证是可解析的绝对地址，
/// 否则提取阶段直接失败
#[derive(Debug, Clone, Default)]
pub struct PageSnapshot {
    /// 快照来源页面的地址
    pub source_url: String,
    /// 识别出的题目文本
    pub question: String,
    /// 识别出的作答说明
    pub instructions: String,
    /// 归一化后的页面可见文本（截断至 5000 字符）
    pub raw_text: String,
    /// 答案提交地址（绝对 URL）
    pub submit_url: String,
    /// 附件链接（.csv/.json/.xlsx/.xls/.pdf/.txt）
    pub attachment_urls: Vec<String>,
    /// 页面上的全部超链接（绝对 URL，按出现顺序去重）
    pub link_urls: Vec<String>,
    /// 表格：有序行 × 有序单元格文本
    pub tables: Vec<Vec<Vec<String>>>,
    /// 段落 / 列表 / 代码块文本
    pub text_blocks: Vec<String>,
}

/// 答案值：文本、数字、布尔或结构化映射
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Bool(bool),
    Integer(i64),
    Number(f64),
    Text(String),
    Mapping(Map<String, JsonValue>),
}

impl AnswerValue {
    /// 由聚合计算结果构造答案值
    ///
    /// 整数结果输出为整数，否则保留 6 位小数
    pub fn from_aggregate(value: f64) -> Self {
        if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
            AnswerValue::Integer(value as i64)
        } else {
            AnswerValue::Number((value * 1e6).round() / 1e6)
        }
    }
}

/// 某个策略针对一跳给出的答案
///
/// 由提交客户端立即消费，不跨跳保留
#[derive(Debug, Clone)]
pub struct Answer {
    pub value: AnswerValue,
    pub metadata: Map<String, JsonValue>,
}

impl Answer {
    pub fn new(value: AnswerValue) -> Self {
        Self {
            value,
            metadata: Map::new(),
        }
    }

    /// 附加一条元数据
    pub fn with_meta(mut self, key: impl Into<String>, value: JsonValue) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// 评分端点的响应
///
/// `url` 指向下一跳题目时，循环继续
#[derive(Debug, Clone, Deserialize)]
pub struct GradingResult {
    pub correct: bool,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}
