//! 文本处理工具
//!
//! 提供关键词匹配、空白归一化等与页面文本打交道的基础能力

use regex::Regex;

/// 将连续空白折叠为单个空格并去除首尾空白
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 按字符数截断文本（不追加省略号）
pub fn take_chars(text: &str, max_len: usize) -> String {
    text.chars().take(max_len).collect()
}

/// 截断长文本用于日志显示
pub fn truncate_for_log(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

/// 判断文本中是否出现任一关键词（整词匹配，忽略大小写）
pub fn contains_word(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| {
        let pattern = format!(r"(?i)\b{}\b", regex::escape(keyword));
        Regex::new(&pattern)
            .map(|re| re.is_match(text))
            .unwrap_or(false)
    })
}

/// 取文本的第一行非空白内容
pub fn first_non_blank_line(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}
