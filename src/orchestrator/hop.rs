//! 单次运行的跳循环 - 编排层
//!
//! 状态机：导航 → 提取快照 → 选策略 → 求解 → 提交 → 评估响应，
//! 评分结果给出下一跳地址且时间尚余时回到导航，否则终止。
//!
//! ## 约束
//!
//! - 每次阶段转换前检查共享截止时间，超时即失败并标注未进入的阶段
//! - 每一跳独占一个新 page，跳结束时无论成败都释放
//! - 评分结果为 incorrect 只告警不中断：还有下一跳地址且时间尚余就继续
//! - 任一阶段出错即整次运行失败，不做部分重试

use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};
use url::Url;

use crate::browser::navigate_and_settle;
use crate::extractor::extract_snapshot;
use crate::infrastructure::JsExecutor;
use crate::models::{Deadline, GradingResult, QuizRequest};
use crate::services::{Services, SubmitPayload};
use crate::strategies::{self, StrategyContext};

/// 跳内的阶段，用于截止时间错误的标注
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HopPhase {
    Navigate,
    Extract,
    Select,
    Solve,
    Submit,
    Evaluate,
}

impl HopPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            HopPhase::Navigate => "navigate",
            HopPhase::Extract => "extract-snapshot",
            HopPhase::Select => "select-strategy",
            HopPhase::Solve => "solve",
            HopPhase::Submit => "submit",
            HopPhase::Evaluate => "evaluate-response",
        }
    }
}

impl fmt::Display for HopPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 一跳的结局
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HopOutcome {
    /// 继续下一跳（携带已解析为绝对地址的下一跳 URL）
    Continue(String),
    /// 正常终止
    Finished,
}

/// 跳编排器
///
/// 职责：
/// - 驱动一次运行内的全部跳
/// - 管理每跳 page 的取得与释放
/// - 不认识具体策略的内部逻辑
pub struct HopOrchestrator {
    services: Arc<Services>,
}

impl HopOrchestrator {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }

    /// 执行一次完整运行：从请求的目标地址一路跳到终止
    pub async fn execute(&self, request: &QuizRequest, deadline: Deadline) -> Result<()> {
        let mut current_url = request.target_url.clone();
        let mut hop_index = 1usize;

        loop {
            deadline.check("starting next quiz hop")?;
            info!("🌐 [第 {} 跳] 访问测验页面: {}", hop_index, current_url);

            let page = self.services.browser.new_page().await?;
            let executor = JsExecutor::new(page);

            let outcome = self
                .run_hop(&executor, &current_url, request, deadline)
                .await;

            // 无论本跳成败都释放 page
            if let Err(e) = executor.close().await {
                warn!("关闭页面失败: {}", e);
            }

            match outcome? {
                HopOutcome::Continue(next_url) => {
                    current_url = next_url;
                    hop_index += 1;
                }
                HopOutcome::Finished => break,
            }
        }

        info!("✅ 测验运行结束，共 {} 跳", hop_index);
        Ok(())
    }

    /// 执行一跳：导航 → 提取 → 选策略 → 求解 → 提交 → 评估
    async fn run_hop(
        &self,
        executor: &JsExecutor,
        url: &str,
        request: &QuizRequest,
        deadline: Deadline,
    ) -> Result<HopOutcome> {
        deadline.check(HopPhase::Navigate.as_str())?;
        navigate_and_settle(executor.page(), url).await?;

        deadline.check(HopPhase::Extract.as_str())?;
        let snapshot = extract_snapshot(executor, url).await?;

        deadline.check(HopPhase::Select.as_str())?;
        let strategy = strategies::pick(&snapshot);
        info!("🎯 选定策略: {}", strategy.name());

        deadline.check(HopPhase::Solve.as_str())?;
        let ctx = StrategyContext {
            snapshot: &snapshot,
            executor,
            deadline,
            services: &self.services,
        };
        let answer = strategy.solve(&ctx).await?;

        deadline.check(HopPhase::Submit.as_str())?;
        let payload = SubmitPayload::new(
            &request.email,
            &request.secret,
            &snapshot.source_url,
            answer,
        );
        let result = self
            .services
            .submit
            .submit(&snapshot.submit_url, &payload)
            .await?;

        if !result.correct {
            warn!(
                "⚠️ 提交被判为错误: {}",
                result.reason.as_deref().unwrap_or("未给出原因")
            );
        }

        deadline.check(HopPhase::Evaluate.as_str())?;
        Ok(next_hop(&result, deadline, url))
    }
}

/// 评估评分结果，决定是否继续下一跳
///
/// incorrect 不终止循环；只要还有下一跳地址且时间尚余就继续。
/// 下一跳地址可能是相对路径，相对当前页面解析为绝对地址
pub(crate) fn next_hop(result: &GradingResult, deadline: Deadline, current_url: &str) -> HopOutcome {
    match &result.url {
        Some(next) if !deadline.expired() => {
            let resolved = Url::parse(current_url)
                .ok()
                .and_then(|base| base.join(next).ok())
                .map(|u| u.to_string())
                .unwrap_or_else(|| next.clone());
            HopOutcome::Continue(resolved)
        }
        _ => HopOutcome::Finished,
    }
}
