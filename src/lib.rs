//! # Auto Quiz Solver
//!
//! 一个自动求解在线测验的 Rust 服务
//!
//! ## 架构设计
//!
//! 本系统采用严格的分层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page），只暴露能力
//! - `JsExecutor` - 唯一的 page owner，提供 eval() 能力
//! - `browser/` - 浏览器进程的惰性启动与 page 工厂
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，与具体测验无关
//! - `LlmService` - LLM 分析能力
//! - `SubmitService` - 答案提交与评分解析能力
//!
//! ### ③ 领域层（Extractor / Strategies）
//! - `extractor/` - 把页面 DOM 提炼为结构化快照
//! - `strategies/` - 七种按优先级排列的答案策略
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/hop` - 单次运行的跳循环状态机
//! - `orchestrator/job` - 一次运行的截止时间锚定
//! - `orchestrator/scheduler` - 并发受限的 FIFO 任务队列
//!
//! ### ⑤ 接入层（Api）
//! - `api/` - HTTP 接收端，校验入站请求并入队

pub mod api;
pub mod browser;
pub mod config;
pub mod error;
pub mod extractor;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod strategies;
pub mod utils;

// 重新导出常用类型
pub use browser::BrowserService;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use extractor::extract_snapshot;
pub use infrastructure::JsExecutor;
pub use models::{Answer, AnswerValue, Deadline, GradingResult, PageSnapshot, QuizRequest};
pub use orchestrator::{HopOrchestrator, JobScheduler, QuizJob};
pub use services::Services;
