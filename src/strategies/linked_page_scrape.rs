//! 链接页抓取策略
//!
//! 说明带抓取意图（scrape/download/fetch/crawl/lookup/collect）且能推导出
//! 候选链接时适用：访问第一个候选链接，从其可见文本中提取密文

use anyhow::Result;
use regex::Regex;
use serde_json::json;
use tracing::{info, warn};
use url::Url;

use crate::browser::navigate_and_settle;
use crate::error::AppError;
use crate::infrastructure::JsExecutor;
use crate::models::{Answer, AnswerValue, PageSnapshot};
use crate::strategies::StrategyContext;
use crate::utils::text::first_non_blank_line;

pub const NAME: &str = "linked-page-scrape";

const LINK_KEYWORDS: &str = r"(?i)scrape|download|fetch|crawl|lookup|collect";

pub fn can_solve(snapshot: &PageSnapshot) -> bool {
    let re = Regex::new(LINK_KEYWORDS).expect("固定正则");
    let has_keyword = re.is_match(&snapshot.instructions)
        || re.is_match(&snapshot.question)
        || re.is_match(&snapshot.raw_text);
    has_keyword && !collect_candidate_links(snapshot).is_empty()
}

pub async fn solve(ctx: &StrategyContext<'_>) -> Result<Answer> {
    let candidates = collect_candidate_links(ctx.snapshot);
    let Some(target_url) = candidates.first().cloned() else {
        return Err(AppError::unsolvable(NAME, "推导不出可访问的链接").into());
    };

    info!("🔗 访问关联页面: {}", target_url);

    // 抓取用的 page 独立于当前跳的 page，同样要保证释放
    let page = ctx.services.browser.new_page().await?;
    let executor = JsExecutor::new(page);
    let outcome = scrape_secret(&executor, &target_url).await;
    if let Err(e) = executor.close().await {
        warn!("关闭抓取页面失败: {}", e);
    }
    let secret = outcome?;

    Ok(Answer::new(AnswerValue::Text(secret))
        .with_meta("strategy", json!(NAME))
        .with_meta("link", json!(target_url)))
}

async fn scrape_secret(executor: &JsExecutor, url: &str) -> Result<String> {
    navigate_and_settle(executor.page(), url).await?;
    let text = executor.visible_text().await?;
    pick_secret_from_text(&text)
        .ok_or_else(|| AppError::unsolvable(NAME, "关联页面上提取不到密文").into())
}

/// 候选链接：页面链接 + 各文本来源中的 URL，抓取意图关键词命中的优先
pub(crate) fn collect_candidate_links(snapshot: &PageSnapshot) -> Vec<String> {
    let absolute_re = Regex::new(r#"(?i)https?://[^\s"']+"#).expect("固定正则");
    let relative_re =
        Regex::new(r"/[A-Za-z0-9][A-Za-z0-9\-._~/?=&%#]*").expect("固定正则");
    let base = Url::parse(&snapshot.source_url).ok();

    let mut candidates: Vec<String> = Vec::new();
    let mut push = |candidate: String, out: &mut Vec<String>| {
        if !out.contains(&candidate) {
            out.push(candidate);
        }
    };

    for link in &snapshot.link_urls {
        push(link.clone(), &mut candidates);
    }

    let mut sources: Vec<&str> = vec![
        &snapshot.instructions,
        &snapshot.question,
        &snapshot.raw_text,
    ];
    sources.extend(snapshot.text_blocks.iter().map(String::as_str));

    for source in sources {
        for hit in absolute_re.find_iter(source) {
            push(hit.as_str().to_string(), &mut candidates);
        }
        for hit in relative_re.find_iter(source) {
            let relative = hit.as_str();
            if relative.len() > 1 && !relative.starts_with("//") {
                if let Some(base) = &base {
                    if let Ok(resolved) = base.join(relative) {
                        push(resolved.to_string(), &mut candidates);
                    }
                }
            }
        }
    }

    let keyword_re = Regex::new(LINK_KEYWORDS).expect("固定正则");
    let prioritized: Vec<String> = candidates
        .iter()
        .filter(|link| keyword_re.is_match(link))
        .cloned()
        .collect();
    if prioritized.is_empty() {
        candidates
    } else {
        prioritized
    }
}

/// 密文提取顺序：`secret (code|key|token) is/:` 模式 → 首个 ≥3 位数字串 → 首行非空白
pub(crate) fn pick_secret_from_text(text: &str) -> Option<String> {
    let secret_re =
        Regex::new(r"(?i)secret\s+(?:code|key|token)?\s*(?:is|:)?\s*([A-Za-z0-9._-]+)")
            .expect("固定正则");
    if let Some(caps) = secret_re.captures(text) {
        if let Some(m) = caps.get(1) {
            return Some(m.as_str().trim().to_string());
        }
    }

    let digits_re = Regex::new(r"\b\d{3,}\b").expect("固定正则");
    if let Some(m) = digits_re.find(text) {
        return Some(m.as_str().to_string());
    }

    first_non_blank_line(text)
}
