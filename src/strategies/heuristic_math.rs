//! 启发式数学策略
//!
//! 说明里出现算术关键词且页面上至少有两个数字时适用；
//! 从题目 + 说明 + 可见文本中抽取全部数字后按关键词计算

use anyhow::Result;
use serde_json::json;

use crate::error::AppError;
use crate::models::{Answer, AnswerValue, PageSnapshot};
use crate::strategies::numeric::{aggregate, extract_numbers, Aggregation};
use crate::strategies::StrategyContext;
use crate::utils::text::contains_word;

pub const NAME: &str = "heuristic-math";

const MATH_KEYWORDS: [&str; 11] = [
    "sum", "total", "add", "average", "mean", "product", "multiply", "difference", "subtract",
    "maximum", "minimum",
];

pub fn can_solve(snapshot: &PageSnapshot) -> bool {
    let merged = format!("{} {}", snapshot.instructions, snapshot.raw_text);
    extract_numbers(&merged).len() >= 2 && contains_word(&snapshot.instructions, &MATH_KEYWORDS)
}

pub async fn solve(ctx: &StrategyContext<'_>) -> Result<Answer> {
    let snapshot = ctx.snapshot;
    let merged = format!(
        "{}\n{}\n{}",
        snapshot.question, snapshot.instructions, snapshot.raw_text
    );
    let numbers = extract_numbers(&merged);
    if numbers.is_empty() {
        return Err(AppError::unsolvable(NAME, "页面上找不到数字").into());
    }

    let op = detect_aggregation(&snapshot.instructions);
    let value = aggregate(&numbers, op);

    Ok(Answer::new(AnswerValue::from_aggregate(value))
        .with_meta("strategy", json!(NAME))
        .with_meta("samples", json!(numbers)))
}

/// 比基础映射多出乘积与有序差两种聚合
fn detect_aggregation(instructions: &str) -> Aggregation {
    if contains_word(instructions, &["average", "mean"]) {
        Aggregation::Mean
    } else if contains_word(instructions, &["product", "multiply"]) {
        Aggregation::Product
    } else if contains_word(instructions, &["difference", "subtract"]) {
        Aggregation::Difference
    } else if contains_word(instructions, &["maximum", "max", "largest"]) {
        Aggregation::Max
    } else if contains_word(instructions, &["minimum", "min", "smallest", "least"]) {
        Aggregation::Min
    } else {
        Aggregation::Sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_scenario_yields_integer() {
        // "what is the sum of 10 and 15" → 25
        let numbers = extract_numbers("what is the sum of 10 and 15");
        let value = aggregate(&numbers, detect_aggregation("what is the sum of 10 and 15"));
        assert_eq!(AnswerValue::from_aggregate(value), AnswerValue::Integer(25));
    }

    #[test]
    fn test_detect_aggregation_priority() {
        assert_eq!(detect_aggregation("the average please"), Aggregation::Mean);
        assert_eq!(detect_aggregation("multiply them"), Aggregation::Product);
        assert_eq!(
            detect_aggregation("subtract the rest"),
            Aggregation::Difference
        );
        assert_eq!(detect_aggregation("largest number"), Aggregation::Max);
        assert_eq!(detect_aggregation("the least of them"), Aggregation::Min);
        assert_eq!(detect_aggregation("these numbers"), Aggregation::Sum);
    }
}
