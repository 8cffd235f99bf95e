//! 语言模型策略
//!
//! 说明里点名模型关键词（llm / language model / gpt 等）时适用；
//! 截止时间已过则立即失败，不发起调用

use anyhow::Result;
use serde_json::json;

use crate::error::AppError;
use crate::models::{Answer, AnswerValue, PageSnapshot};
use crate::strategies::StrategyContext;
use crate::utils::text::take_chars;

pub const NAME: &str = "llm";

const KEYWORDS: [&str; 6] = [
    "llm",
    "language model",
    "gpt",
    "chatgpt",
    "openai",
    "ai model",
];

/// 系统提示词上限（字符）
const SYSTEM_PROMPT_LIMIT: usize = 900;
/// 传给模型的页面上下文上限（字符）
const CONTEXT_LIMIT: usize = 3500;

pub fn can_solve(snapshot: &PageSnapshot) -> bool {
    let normalized = snapshot.instructions.to_lowercase();
    KEYWORDS.iter().any(|keyword| normalized.contains(keyword))
}

pub async fn solve(ctx: &StrategyContext<'_>) -> Result<Answer> {
    if ctx.deadline.expired() {
        return Err(AppError::deadline("LLM 策略启动").into());
    }
    let remaining = ctx.deadline.remaining_secs();

    let system = take_chars(
        &format!(
            "{} You must finish within {} seconds.",
            ctx.services.config.llm_system_prompt, remaining
        ),
        SYSTEM_PROMPT_LIMIT,
    );
    let user = format!(
        "Question: {}\nInstructions: {}\nContext: {}",
        ctx.snapshot.question,
        ctx.snapshot.instructions,
        take_chars(&ctx.snapshot.raw_text, CONTEXT_LIMIT)
    );

    let answer_text = ctx.services.llm.analyze(&system, &user).await?;
    let tokens = answer_text.chars().count();

    Ok(Answer::new(AnswerValue::Text(answer_text))
        .with_meta("strategy", json!(NAME))
        .with_meta("tokens", json!(tokens)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_is_substring_match() {
        let mut snapshot = PageSnapshot {
            instructions: "Ask the ChatGPT assistant for help".to_string(),
            ..Default::default()
        };
        assert!(can_solve(&snapshot));

        snapshot.instructions = "use a Language Model to answer".to_string();
        assert!(can_solve(&snapshot));

        snapshot.instructions = "just compute it".to_string();
        assert!(!can_solve(&snapshot));
    }
}
