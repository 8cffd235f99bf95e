pub mod llm_service;
pub mod submit_service;

pub use llm_service::LlmService;
pub use submit_service::{SubmitPayload, SubmitService};

use crate::browser::BrowserService;
use crate::config::Config;

/// 全部业务能力服务的集合
///
/// 显式构造、显式注入；策略和编排层只通过它访问外部能力。
/// 其中不存在跨运行的可变状态，可被并发运行安全共享
pub struct Services {
    pub config: Config,
    pub browser: BrowserService,
    pub llm: LlmService,
    pub submit: SubmitService,
    /// 共享的 HTTP 客户端（附件下载用）
    pub http: reqwest::Client,
}

impl Services {
    pub fn new(config: Config) -> Self {
        let http = reqwest::Client::new();
        Self {
            browser: BrowserService::new(&config),
            llm: LlmService::new(&config),
            submit: SubmitService::new(http.clone(), config.max_payload_bytes),
            http,
            config,
        }
    }
}
