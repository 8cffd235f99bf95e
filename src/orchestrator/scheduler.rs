//! 任务调度器
//!
//! 职责：
//! - 接收方一入队就返回，处理完全异步
//! - 用信号量限制并发运行数，超出的任务按到达顺序排队
//! - 任务失败只记录日志，不影响其他任务

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{error, info};

use crate::models::QuizRequest;
use crate::orchestrator::QuizJob;
use crate::services::Services;

pub struct JobScheduler {
    services: Arc<Services>,
    semaphore: Arc<Semaphore>,
}

impl JobScheduler {
    pub fn new(services: Arc<Services>, max_concurrent: usize) -> Self {
        Self {
            services,
            semaphore: Arc::new(Semaphore::new(max_concurrent.max(1))),
        }
    }

    /// 入队并立即返回；排队期间截止时间照常流逝
    pub fn enqueue(&self, request: QuizRequest) {
        let services = self.services.clone();
        let semaphore = self.semaphore.clone();
        let target = request.target_url.clone();

        tokio::spawn(async move {
            // 许可按等待顺序发放，天然形成 FIFO 队列
            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => return,
            };

            info!("📋 任务出队: {}", target);
            let job = QuizJob::new(request, services);
            if let Err(e) = job.run().await {
                error!("❌ 测验任务失败 ({}): {:#}", target, e);
            }
        });
    }
}
