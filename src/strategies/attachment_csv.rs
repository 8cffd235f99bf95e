//! CSV 附件策略
//!
//! 下载第一个 CSV 附件，收集其中的数值单元格，按说明里的关键词聚合。
//! 说明中出现 "cutoff <数字>" 时先做阈值过滤；
//! 过滤导致集合为空时静默退回未过滤的值（语义上存疑，但按观察到的行为保留）

use anyhow::Result;
use regex::Regex;
use serde_json::json;

use crate::error::AppError;
use crate::models::{Answer, AnswerValue, PageSnapshot};
use crate::strategies::numeric::{aggregate, detect_basic_aggregation};
use crate::strategies::StrategyContext;

pub const NAME: &str = "attachment-csv";

pub fn can_solve(snapshot: &PageSnapshot) -> bool {
    snapshot
        .attachment_urls
        .iter()
        .any(|url| url.to_lowercase().ends_with(".csv"))
}

pub async fn solve(ctx: &StrategyContext<'_>) -> Result<Answer> {
    let snapshot = ctx.snapshot;
    let csv_url = snapshot
        .attachment_urls
        .iter()
        .find(|url| url.to_lowercase().ends_with(".csv"))
        .ok_or_else(|| AppError::unsolvable(NAME, "找不到 CSV 附件"))?;

    let response = ctx
        .services
        .http
        .get(csv_url)
        .send()
        .await
        .map_err(|e| AppError::transport(csv_url, e))?;
    let status = response.status();
    if !status.is_success() {
        return Err(AppError::BadStatus {
            endpoint: csv_url.clone(),
            status: status.as_u16(),
        }
        .into());
    }
    let csv_text = response
        .text()
        .await
        .map_err(|e| AppError::transport(csv_url, e))?;

    let matrix = csv_to_matrix(&csv_text);
    let base_values = numeric_cells(&matrix);
    if base_values.is_empty() {
        return Err(AppError::unsolvable(NAME, "CSV 中没有可解析的数值").into());
    }

    let filtered = apply_cutoff(&base_values, &snapshot.instructions, &snapshot.raw_text);
    let op = detect_basic_aggregation(&snapshot.instructions);
    let result = aggregate(&filtered.values, op);

    let mut answer = Answer::new(AnswerValue::from_aggregate(result))
        .with_meta("strategy", json!(NAME))
        .with_meta("attachment", json!(csv_url))
        .with_meta("rows", json!(matrix.len()));
    if let Some(cutoff) = filtered.cutoff {
        answer = answer
            .with_meta("cutoff", json!(cutoff))
            .with_meta("cutoffMode", json!(filtered.mode));
    }
    Ok(answer)
}

/// 按行 / 逗号切分 CSV，单元格两端去空白
fn csv_to_matrix(csv: &str) -> Vec<Vec<String>> {
    csv.trim()
        .lines()
        .map(|line| line.split(',').map(|cell| cell.trim().to_string()).collect())
        .collect()
}

fn numeric_cells(matrix: &[Vec<String>]) -> Vec<f64> {
    matrix
        .iter()
        .flat_map(|row| row.iter())
        .filter_map(|cell| cell.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .collect()
}

/// 阈值过滤的结果
pub(crate) struct CutoffOutcome {
    pub values: Vec<f64>,
    pub cutoff: Option<f64>,
    pub mode: Option<&'static str>,
}

/// 说明里声明了 "cutoff <数字>" 时过滤数值集合
///
/// 说明含 less/below/under/smaller 时保留小于阈值的，否则保留大于阈值的；
/// 过滤后为空时退回原集合
pub(crate) fn apply_cutoff(values: &[f64], instructions: &str, context: &str) -> CutoffOutcome {
    let unfiltered = CutoffOutcome {
        values: values.to_vec(),
        cutoff: None,
        mode: None,
    };

    let Some(cutoff) = extract_cutoff(&format!("{}\n{}", instructions, context)) else {
        return unfiltered;
    };

    let lower = instructions.to_lowercase();
    let prefers_below = Regex::new(r"less|below|under|smaller")
        .expect("固定正则")
        .is_match(&lower);

    let filtered: Vec<f64> = values
        .iter()
        .copied()
        .filter(|v| if prefers_below { *v < cutoff } else { *v > cutoff })
        .collect();
    if filtered.is_empty() {
        return unfiltered;
    }

    CutoffOutcome {
        values: filtered,
        cutoff: Some(cutoff),
        mode: Some(if prefers_below { "lt" } else { "gt" }),
    }
}

fn extract_cutoff(text: &str) -> Option<f64> {
    let re = Regex::new(r"(?i)cutoff[^\d]*(\d+(?:\.\d+)?)").expect("固定正则");
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_matrix_and_numeric_cells() {
        let matrix = csv_to_matrix("a, 1 ,2\n3,4,x\n");
        assert_eq!(matrix.len(), 2);
        assert_eq!(numeric_cells(&matrix), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_average_over_csv_body() {
        // "1,2\n3,4" + "find the average" → 2.5
        let matrix = csv_to_matrix("1,2\n3,4");
        let values = numeric_cells(&matrix);
        assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0]);
        let result = aggregate(&values, detect_basic_aggregation("find the average"));
        assert_eq!(AnswerValue::from_aggregate(result), AnswerValue::Number(2.5));
    }

    #[test]
    fn test_cutoff_filters_above_by_default() {
        let outcome = apply_cutoff(&[1.0, 5.0, 9.0], "keep values with cutoff 4", "");
        assert_eq!(outcome.values, vec![5.0, 9.0]);
        assert_eq!(outcome.cutoff, Some(4.0));
        assert_eq!(outcome.mode, Some("gt"));
    }

    #[test]
    fn test_cutoff_below_keywords() {
        let outcome = apply_cutoff(&[1.0, 5.0, 9.0], "values below the cutoff 4", "");
        assert_eq!(outcome.values, vec![1.0]);
        assert_eq!(outcome.mode, Some("lt"));
    }

    #[test]
    fn test_cutoff_never_yields_empty_set() {
        // 全部被过滤掉时退回未过滤的值
        let outcome = apply_cutoff(&[1.0, 2.0], "values above cutoff 100", "");
        assert_eq!(outcome.values, vec![1.0, 2.0]);
        assert!(outcome.cutoff.is_none());
        assert!(outcome.mode.is_none());
    }

    #[test]
    fn test_cutoff_found_in_raw_text_context() {
        let outcome = apply_cutoff(&[1.0, 5.0], "sum them", "the cutoff is 3");
        assert_eq!(outcome.values, vec![5.0]);
    }

    #[test]
    fn test_no_cutoff_mentioned() {
        let outcome = apply_cutoff(&[1.0, 5.0], "sum them", "");
        assert_eq!(outcome.values, vec![1.0, 5.0]);
        assert!(outcome.cutoff.is_none());
    }
}
