//! 兜底策略
//!
//! 永远适用。先找页面上的显式答案标记，再用正则在可见文本里找
//! `answer: ...`；两者都没有则终止失败，等待人工介入

use anyhow::Result;
use regex::Regex;
use serde_json::json;

use crate::error::AppError;
use crate::models::{Answer, AnswerValue, PageSnapshot};
use crate::strategies::StrategyContext;

pub const NAME: &str = "fallback";

const DOM_HINT_SCRIPT: &str = r#"
(() => {
    const marker = document.querySelector('[data-expected-answer]');
    if (marker) {
        const attr = marker.getAttribute('data-expected-answer');
        if (attr) return attr;
    }
    const content = document.querySelector('[data-answer]');
    return content && content.textContent ? content.textContent.trim() : null;
})()
"#;

pub fn can_solve(_snapshot: &PageSnapshot) -> bool {
    true
}

pub async fn solve(ctx: &StrategyContext<'_>) -> Result<Answer> {
    let dom_hint: Option<String> = ctx.executor.eval_as(DOM_HINT_SCRIPT).await?;
    if let Some(hint) = dom_hint.filter(|hint| !hint.is_empty()) {
        return Ok(Answer::new(AnswerValue::Text(hint))
            .with_meta("strategy", json!("dom-fallback")));
    }

    if let Some(answer) = regex_answer(&ctx.snapshot.raw_text) {
        return Ok(Answer::new(AnswerValue::Text(answer))
            .with_meta("strategy", json!("regex-fallback")));
    }

    Err(AppError::unsolvable(NAME, "页面上既无答案标记也匹配不到 answer 正则，需要人工介入").into())
}

pub(crate) fn regex_answer(raw_text: &str) -> Option<String> {
    let re = Regex::new(r"(?i)answer\s*[:=]\s*([^\n]+)").expect("固定正则");
    re.captures(raw_text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}
