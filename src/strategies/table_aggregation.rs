//! 表格聚合策略
//!
//! 页面上有表格且说明提到 table/row/column 时适用；
//! 对每个单元格剔除非数值字符后解析，按关键词聚合

use anyhow::Result;
use regex::Regex;
use serde_json::json;

use crate::error::AppError;
use crate::models::{Answer, AnswerValue, PageSnapshot};
use crate::strategies::numeric::{aggregate, detect_basic_aggregation};
use crate::strategies::StrategyContext;

pub const NAME: &str = "table-aggregation";

pub fn can_solve(snapshot: &PageSnapshot) -> bool {
    !snapshot.tables.is_empty()
        && Regex::new(r"(?i)table|row|column")
            .expect("固定正则")
            .is_match(&snapshot.instructions)
}

pub async fn solve(ctx: &StrategyContext<'_>) -> Result<Answer> {
    let snapshot = ctx.snapshot;
    let values = parse_numeric_cells(&snapshot.tables);
    if values.is_empty() {
        return Err(AppError::unsolvable(NAME, "表格中没有可解析的数值单元格").into());
    }

    let op = detect_basic_aggregation(&snapshot.instructions);
    let result = aggregate(&values, op);

    Ok(Answer::new(AnswerValue::from_aggregate(result))
        .with_meta("strategy", json!(NAME))
        .with_meta("sampleCount", json!(values.len())))
}

/// 剔除单元格中除数字、正负号、小数点以外的字符后解析
fn parse_numeric_cells(tables: &[Vec<Vec<String>>]) -> Vec<f64> {
    let mut extracted = Vec::new();
    for table in tables {
        for row in table {
            for cell in row {
                let stripped: String = cell
                    .chars()
                    .filter(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.'))
                    .collect();
                if let Ok(value) = stripped.parse::<f64>() {
                    if value.is_finite() {
                        extracted.push(value);
                    }
                }
            }
        }
    }
    extracted
}
