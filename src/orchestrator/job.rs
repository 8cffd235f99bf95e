//! 测验任务
//!
//! 一个任务对应一次完整运行：从接收时刻起算统一截止时间，
//! 然后把控制权交给跳编排器。

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::error::AppError;
use crate::models::{Deadline, QuizRequest};
use crate::orchestrator::HopOrchestrator;
use crate::services::Services;

/// 单次测验运行
pub struct QuizJob {
    request: QuizRequest,
    services: Arc<Services>,
}

impl QuizJob {
    pub fn new(request: QuizRequest, services: Arc<Services>) -> Self {
        Self { request, services }
    }

    /// 执行任务；截止时间以接收时刻为锚点，排队等待不会延长它
    pub async fn run(&self) -> Result<()> {
        let deadline = Deadline::for_run(self.request.received_at);
        if deadline.expired() {
            // 在队列里等太久，时间已经耗尽
            return Err(AppError::deadline("任务启动").into());
        }

        info!(
            "🚀 开始测验任务: {} (剩余 {} 秒)",
            self.request.target_url,
            deadline.remaining_secs()
        );

        let orchestrator = HopOrchestrator::new(self.services.clone());
        orchestrator.execute(&self.request, deadline).await
    }
}
