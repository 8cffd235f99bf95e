//! 数值提取与聚合
//!
//! 多个策略共享的纯函数：从文本里抽取数字、按关键词选择聚合方式

use regex::Regex;

use crate::utils::text::contains_word;

/// 聚合方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    Sum,
    Mean,
    Max,
    Min,
    Product,
    /// 有序差：以首个值为起点，依次减去后续值
    Difference,
}

/// 提取文本中的全部带符号整数 / 小数
pub fn extract_numbers(text: &str) -> Vec<f64> {
    let re = Regex::new(r"-?\d+(?:\.\d+)?").expect("固定正则");
    re.find_iter(text)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .collect()
}

/// 基础聚合关键词映射：average/mean → 均值，max 系 → 最大，
/// min 系 → 最小，其余一律求和
pub fn detect_basic_aggregation(instructions: &str) -> Aggregation {
    if contains_word(instructions, &["average", "mean"]) {
        Aggregation::Mean
    } else if contains_word(instructions, &["max", "maximum", "largest"]) {
        Aggregation::Max
    } else if contains_word(instructions, &["min", "minimum", "smallest", "least"]) {
        Aggregation::Min
    } else {
        Aggregation::Sum
    }
}

/// 对非空数值集合执行聚合
pub fn aggregate(values: &[f64], op: Aggregation) -> f64 {
    match op {
        Aggregation::Sum => values.iter().sum(),
        Aggregation::Mean => values.iter().sum::<f64>() / values.len() as f64,
        Aggregation::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        Aggregation::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
        Aggregation::Product => values.iter().product(),
        Aggregation::Difference => values[1..]
            .iter()
            .fold(values[0], |acc, value| acc - value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_numbers_signed_and_decimal() {
        assert_eq!(extract_numbers("sum of 10 and 15"), vec![10.0, 15.0]);
        assert_eq!(extract_numbers("-3.5 then 2"), vec![-3.5, 2.0]);
        assert!(extract_numbers("no digits").is_empty());
    }

    #[test]
    fn test_keyword_mapping_is_deterministic() {
        let values = [2.0, 4.0, 6.0];
        assert_eq!(
            aggregate(&values, detect_basic_aggregation("find the average")),
            4.0
        );
        assert_eq!(
            aggregate(&values, detect_basic_aggregation("the maximum value")),
            6.0
        );
        assert_eq!(
            aggregate(&values, detect_basic_aggregation("just these numbers")),
            12.0
        );
        assert_eq!(
            aggregate(&values, detect_basic_aggregation("the smallest one")),
            2.0
        );
    }

    #[test]
    fn test_product_and_ordered_difference() {
        assert_eq!(aggregate(&[2.0, 3.0, 4.0], Aggregation::Product), 24.0);
        assert_eq!(aggregate(&[10.0, 3.0, 2.0], Aggregation::Difference), 5.0);
        assert_eq!(aggregate(&[7.0], Aggregation::Difference), 7.0);
    }
}
