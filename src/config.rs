/// 程序配置
///
/// 所有配置项均可通过环境变量覆盖，未设置时使用默认值
#[derive(Clone, Debug)]
pub struct Config {
    /// HTTP 服务监听端口
    pub port: u16,
    /// 测验请求的共享密钥（请求中的 secret 必须与之完全一致）
    pub quiz_secret: String,
    /// 是否以无头模式启动浏览器
    pub headless: bool,
    /// Chrome 可执行文件路径（为空时使用系统默认）
    pub chrome_executable: Option<String>,
    /// 提交负载的字节上限
    pub max_payload_bytes: usize,
    /// 同时处理的测验任务数量
    pub max_concurrent_jobs: usize,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    /// LLM 策略的系统提示词
    pub llm_system_prompt: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            quiz_secret: String::new(),
            headless: true,
            chrome_executable: None,
            max_payload_bytes: 950_000,
            max_concurrent_jobs: 2,
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-4o-mini".to_string(),
            llm_system_prompt: "You are an automated quiz solver. Answer concisely \
                                with only the final answer, no explanation."
                .to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            port: std::env::var("PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(default.port),
            quiz_secret: std::env::var("QUIZ_SECRET").unwrap_or(default.quiz_secret),
            headless: std::env::var("HEADLESS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.headless),
            chrome_executable: std::env::var("CHROME_EXECUTABLE").ok(),
            max_payload_bytes: std::env::var("MAX_PAYLOAD_BYTES").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_payload_bytes),
            max_concurrent_jobs: std::env::var("MAX_CONCURRENT_JOBS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_concurrent_jobs),
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(default.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
            llm_system_prompt: std::env::var("LLM_SYSTEM_PROMPT").unwrap_or(default.llm_system_prompt),
        }
    }
}
