//! 答案策略集
//!
//! 七种策略按固定优先级组成一张顺序表（最specific的排最前），
//! 选择器取第一个谓词命中的策略；兜底策略永远命中，因此选择
//! 是纯函数且总能成功。策略全部无状态，可被并发运行安全共享。
//!
//! 策略一旦选定就不再回退：选中的策略解不出来即本跳失败

pub mod attachment_csv;
pub mod attachment_json;
pub mod fallback;
pub mod heuristic_math;
pub mod linked_page_scrape;
pub mod llm;
pub mod numeric;
pub mod table_aggregation;

use anyhow::Result;

use crate::infrastructure::JsExecutor;
use crate::models::{Answer, Deadline, PageSnapshot};
use crate::services::Services;

/// 策略求解时可用的上下文
pub struct StrategyContext<'a> {
    pub snapshot: &'a PageSnapshot,
    pub executor: &'a JsExecutor,
    pub deadline: Deadline,
    pub services: &'a Services,
}

/// 策略变体
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    AttachmentCsv,
    AttachmentJson,
    TableAggregation,
    HeuristicMath,
    LinkedPageScrape,
    Llm,
    Fallback,
}

/// 顺序敏感的策略表：从最 specific 到兜底
pub const STRATEGY_ORDER: [StrategyKind; 7] = [
    StrategyKind::AttachmentCsv,
    StrategyKind::AttachmentJson,
    StrategyKind::TableAggregation,
    StrategyKind::HeuristicMath,
    StrategyKind::LinkedPageScrape,
    StrategyKind::Llm,
    StrategyKind::Fallback,
];

impl StrategyKind {
    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::AttachmentCsv => attachment_csv::NAME,
            StrategyKind::AttachmentJson => attachment_json::NAME,
            StrategyKind::TableAggregation => table_aggregation::NAME,
            StrategyKind::HeuristicMath => heuristic_math::NAME,
            StrategyKind::LinkedPageScrape => linked_page_scrape::NAME,
            StrategyKind::Llm => llm::NAME,
            StrategyKind::Fallback => fallback::NAME,
        }
    }

    /// 纯谓词：该策略是否适用于此快照
    pub fn can_solve(self, snapshot: &PageSnapshot) -> bool {
        match self {
            StrategyKind::AttachmentCsv => attachment_csv::can_solve(snapshot),
            StrategyKind::AttachmentJson => attachment_json::can_solve(snapshot),
            StrategyKind::TableAggregation => table_aggregation::can_solve(snapshot),
            StrategyKind::HeuristicMath => heuristic_math::can_solve(snapshot),
            StrategyKind::LinkedPageScrape => linked_page_scrape::can_solve(snapshot),
            StrategyKind::Llm => llm::can_solve(snapshot),
            StrategyKind::Fallback => fallback::can_solve(snapshot),
        }
    }

    /// 求解；无法给出可信答案时返回错误，绝不提交部分结果
    pub async fn solve(self, ctx: &StrategyContext<'_>) -> Result<Answer> {
        match self {
            StrategyKind::AttachmentCsv => attachment_csv::solve(ctx).await,
            StrategyKind::AttachmentJson => attachment_json::solve(ctx).await,
            StrategyKind::TableAggregation => table_aggregation::solve(ctx).await,
            StrategyKind::HeuristicMath => heuristic_math::solve(ctx).await,
            StrategyKind::LinkedPageScrape => linked_page_scrape::solve(ctx).await,
            StrategyKind::Llm => llm::solve(ctx).await,
            StrategyKind::Fallback => fallback::solve(ctx).await,
        }
    }
}

/// 选择第一个适用的策略；纯函数、必定成功
pub fn pick(snapshot: &PageSnapshot) -> StrategyKind {
    STRATEGY_ORDER
        .iter()
        .copied()
        .find(|strategy| strategy.can_solve(snapshot))
        .unwrap_or(StrategyKind::Fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_snapshot() -> PageSnapshot {
        PageSnapshot {
            source_url: "https://quiz.example.com/q/1".to_string(),
            submit_url: "https://quiz.example.com/submit".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_csv_wins_over_every_other_signal() {
        // CSV、JSON、表格、数学信号同时存在时，CSV 策略必须胜出
        let snapshot = PageSnapshot {
            attachment_urls: vec![
                "https://quiz.example.com/data.json".to_string(),
                "https://quiz.example.com/data.csv".to_string(),
            ],
            instructions: "sum the table rows of 10 and 15".to_string(),
            raw_text: "10 15".to_string(),
            tables: vec![vec![vec!["1".to_string()]]],
            ..blank_snapshot()
        };
        assert_eq!(pick(&snapshot), StrategyKind::AttachmentCsv);
    }

    #[test]
    fn test_json_attachment_selected_without_csv() {
        let snapshot = PageSnapshot {
            attachment_urls: vec!["https://quiz.example.com/data.JSON".to_string()],
            ..blank_snapshot()
        };
        assert_eq!(pick(&snapshot), StrategyKind::AttachmentJson);
    }

    #[test]
    fn test_table_requires_table_keyword() {
        let mut snapshot = PageSnapshot {
            tables: vec![vec![vec!["5".to_string()]]],
            instructions: "add up the column values".to_string(),
            ..blank_snapshot()
        };
        assert_eq!(pick(&snapshot), StrategyKind::TableAggregation);

        // 没提 table/row/column 时不适用
        snapshot.instructions = "just answer".to_string();
        assert_ne!(pick(&snapshot), StrategyKind::TableAggregation);
    }

    #[test]
    fn test_math_scenario_selected() {
        let snapshot = PageSnapshot {
            instructions: "what is the sum of 10 and 15".to_string(),
            raw_text: "what is the sum of 10 and 15".to_string(),
            ..blank_snapshot()
        };
        assert_eq!(pick(&snapshot), StrategyKind::HeuristicMath);
    }

    #[test]
    fn test_csv_scenario_selected_over_math() {
        // attachments=["data.csv"] + "find the average" → CSV 策略
        let snapshot = PageSnapshot {
            attachment_urls: vec!["https://quiz.example.com/data.csv".to_string()],
            instructions: "find the average".to_string(),
            raw_text: "1 2 3 4".to_string(),
            ..blank_snapshot()
        };
        assert_eq!(pick(&snapshot), StrategyKind::AttachmentCsv);
    }

    #[test]
    fn test_scrape_and_llm_and_fallback() {
        let snapshot = PageSnapshot {
            instructions: "fetch the secret".to_string(),
            link_urls: vec!["https://quiz.example.com/secret-page".to_string()],
            ..blank_snapshot()
        };
        assert_eq!(pick(&snapshot), StrategyKind::LinkedPageScrape);

        let snapshot = PageSnapshot {
            instructions: "ask an LLM for this one".to_string(),
            ..blank_snapshot()
        };
        assert_eq!(pick(&snapshot), StrategyKind::Llm);

        assert_eq!(pick(&blank_snapshot()), StrategyKind::Fallback);
    }
}
