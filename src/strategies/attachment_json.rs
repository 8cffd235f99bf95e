//! JSON 附件策略
//!
//! 下载第一个 JSON 附件，递归收集所有有限数值叶子，按关键词聚合

use anyhow::Result;
use serde_json::{json, Value as JsonValue};

use crate::error::AppError;
use crate::models::{Answer, AnswerValue, PageSnapshot};
use crate::strategies::numeric::{aggregate, detect_basic_aggregation};
use crate::strategies::StrategyContext;

pub const NAME: &str = "attachment-json";

pub fn can_solve(snapshot: &PageSnapshot) -> bool {
    snapshot
        .attachment_urls
        .iter()
        .any(|url| url.to_lowercase().ends_with(".json"))
}

pub async fn solve(ctx: &StrategyContext<'_>) -> Result<Answer> {
    let snapshot = ctx.snapshot;
    let json_url = snapshot
        .attachment_urls
        .iter()
        .find(|url| url.to_lowercase().ends_with(".json"))
        .ok_or_else(|| AppError::unsolvable(NAME, "找不到 JSON 附件"))?;

    let response = ctx
        .services
        .http
        .get(json_url)
        .send()
        .await
        .map_err(|e| AppError::transport(json_url, e))?;
    let status = response.status();
    if !status.is_success() {
        return Err(AppError::BadStatus {
            endpoint: json_url.clone(),
            status: status.as_u16(),
        }
        .into());
    }
    let payload: JsonValue = response
        .json()
        .await
        .map_err(|e| AppError::transport(json_url, e))?;

    let mut values = Vec::new();
    collect_numbers(&payload, &mut values);
    if values.is_empty() {
        return Err(AppError::unsolvable(NAME, "JSON 附件中没有数值字段").into());
    }

    let op = detect_basic_aggregation(&snapshot.instructions);
    let result = aggregate(&values, op);

    Ok(Answer::new(AnswerValue::from_aggregate(result))
        .with_meta("strategy", json!(NAME))
        .with_meta("attachment", json!(json_url))
        .with_meta("samples", json!(values.len())))
}

/// 递归收集所有有限数值叶子（穿过数组与对象值）
fn collect_numbers(data: &JsonValue, out: &mut Vec<f64>) {
    match data {
        JsonValue::Number(n) => {
            if let Some(v) = n.as_f64() {
                if v.is_finite() {
                    out.push(v);
                }
            }
        }
        JsonValue::Array(items) => {
            for item in items {
                collect_numbers(item, out);
            }
        }
        JsonValue::Object(map) => {
            for value in map.values() {
                collect_numbers(value, out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_numbers_recurses_through_nesting() {
        let payload = json!({
            "a": 1,
            "b": [2, {"c": 3.5}, "not a number"],
            "d": {"e": {"f": -4}},
            "g": true
        });
        let mut values = Vec::new();
        collect_numbers(&payload, &mut values);
        values.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(values, vec![-4.0, 1.0, 2.0, 3.5]);
    }

    #[test]
    fn test_collect_numbers_empty_for_non_numeric() {
        let mut values = Vec::new();
        collect_numbers(&json!({"a": "text", "b": [true, null]}), &mut values);
        assert!(values.is_empty());
    }
}
