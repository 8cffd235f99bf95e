//! 页面快照提取
//!
//! 一次 JS 求值拿到页面的原始 DOM 转储，其余处理全部在 Rust 侧完成，
//! 纯函数部分可脱离浏览器单独测试
//!
//! 提交地址解析顺序：显式 data 属性 → 表单 action → 页面暴露的全局值
//! → 第一个 href 含 "submit" 的链接 → 可见文本中的 URL 扫描。
//! 解析不到提交地址是致命错误，不重试

use anyhow::Result;
use regex::Regex;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::error::{AppError, AppResult};
use crate::infrastructure::JsExecutor;
use crate::models::PageSnapshot;
use crate::utils::text::{first_non_blank_line, normalize_whitespace, take_chars};

/// rawText 的最大长度（字符）
const RAW_TEXT_LIMIT: usize = 5000;
/// instructions 兜底时取可见文本的前 2000 字符
const INSTRUCTIONS_FALLBACK_LIMIT: usize = 2000;

/// 页面原始转储，由一段 JS 在浏览器内收集
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawPageDump {
    pub body_text: String,
    pub question_marker: Option<String>,
    pub heading: Option<String>,
    pub instructions_marker: Option<String>,
    pub main_text: Option<String>,
    pub submit_candidate: Option<String>,
    pub links: Vec<String>,
    pub tables: Vec<Vec<Vec<String>>>,
    pub text_blocks: Vec<String>,
}

/// 在页面内执行的采集脚本
const DUMP_SCRIPT: &str = r#"
(() => {
    const textOf = (selector) => {
        const el = document.querySelector(selector);
        return el && el.textContent ? el.textContent : null;
    };
    const attrOf = (selector, attr) => {
        const el = document.querySelector(selector);
        return el ? el.getAttribute(attr) : null;
    };
    const bodyText = document.body && document.body.innerText ? document.body.innerText : '';

    const anchorHref = (() => {
        const anchors = Array.from(document.querySelectorAll('a[href]'));
        for (const anchor of anchors) {
            const href = anchor.getAttribute('href');
            if (href && /submit/i.test(href)) return href;
        }
        return null;
    })();

    const textMatch = (() => {
        const match = bodyText.match(/https?:\/\/[^\s"']+submit[^\s"']*/i);
        if (match) return match[0];
        const relative = bodyText.match(/\/[\w\-./?=&]*submit[\w\-./?=&]*/i);
        return relative ? relative[0] : null;
    })();

    const submitCandidate =
        attrOf('[data-submit-url]', 'data-submit-url')
        || attrOf('[data-submit-endpoint]', 'data-submit-endpoint')
        || attrOf('form[action]', 'action')
        || (typeof window.submitUrl === 'string' ? window.submitUrl : null)
        || (window.quizConfig && window.quizConfig.submitUrl ? window.quizConfig.submitUrl : null)
        || anchorHref
        || textMatch;

    const links = Array.from(document.querySelectorAll('a[href]'))
        .map((a) => a.getAttribute('href'))
        .filter((href) => !!href);

    const tables = Array.from(document.querySelectorAll('table'))
        .map((table) => Array.from(table.querySelectorAll('tr'))
            .map((row) => Array.from(row.querySelectorAll('th,td'))
                .map((cell) => cell.textContent || '')));

    const textBlocks = Array.from(document.querySelectorAll('p,li,pre,code'))
        .map((el) => el.textContent || '');

    return {
        bodyText,
        questionMarker: textOf('[data-quiz-question]'),
        heading: textOf('h1, h2'),
        instructionsMarker: textOf('[data-quiz-instructions]'),
        mainText: textOf('main'),
        submitCandidate: submitCandidate || null,
        links,
        tables,
        textBlocks
    };
})()
"#;

/// 提取当前页面的结构化快照
///
/// 任何提取失败都导致本跳失败；本函数对页面只做只读访问
pub async fn extract_snapshot(executor: &JsExecutor, url: &str) -> Result<PageSnapshot> {
    let dump: RawPageDump = executor
        .eval_as(DUMP_SCRIPT)
        .await
        .map_err(|e| AppError::extraction(url, format!("页面转储失败: {}", e)))?;
    let snapshot = build_snapshot(dump, url)?;
    debug!(
        "快照完成: 附件 {} 个, 链接 {} 个, 表格 {} 个",
        snapshot.attachment_urls.len(),
        snapshot.link_urls.len(),
        snapshot.tables.len()
    );
    Ok(snapshot)
}

/// 由原始转储构建快照（纯函数）
pub fn build_snapshot(dump: RawPageDump, url: &str) -> AppResult<PageSnapshot> {
    let base = Url::parse(url)
        .map_err(|e| AppError::extraction(url, format!("页面地址无法解析: {}", e)))?;

    let question = resolve_question(&dump);
    let instructions = resolve_instructions(&dump);
    let submit_url = resolve_submit_url(
        dump.submit_candidate.as_deref(),
        &dump.body_text,
        &base,
    )?;
    let (link_urls, attachment_urls) = classify_links(&dump.links, &base);

    let tables: Vec<Vec<Vec<String>>> = dump
        .tables
        .iter()
        .map(|table| {
            table
                .iter()
                .filter(|row| !row.is_empty())
                .map(|row| row.iter().map(|cell| normalize_whitespace(cell)).collect())
                .collect::<Vec<Vec<String>>>()
        })
        .filter(|table: &Vec<Vec<String>>| !table.is_empty())
        .collect();

    let text_blocks: Vec<String> = dump
        .text_blocks
        .iter()
        .map(|block| normalize_whitespace(block))
        .filter(|block| !block.is_empty())
        .collect();

    Ok(PageSnapshot {
        source_url: url.to_string(),
        question,
        instructions,
        raw_text: take_chars(&normalize_whitespace(&dump.body_text), RAW_TEXT_LIMIT),
        submit_url,
        attachment_urls,
        link_urls,
        tables,
        text_blocks,
    })
}

/// 题目识别：显式标记 → 首个标题 → 首行非空白文本 → 固定占位
fn resolve_question(dump: &RawPageDump) -> String {
    let candidate = dump
        .question_marker
        .as_deref()
        .map(normalize_whitespace)
        .filter(|s| !s.is_empty())
        .or_else(|| {
            dump.heading
                .as_deref()
                .map(normalize_whitespace)
                .filter(|s| !s.is_empty())
        })
        .or_else(|| first_non_blank_line(&dump.body_text).map(|s| normalize_whitespace(&s)));

    match candidate {
        Some(text) if !text.is_empty() => text,
        _ => "Question not detected".to_string(),
    }
}

/// 说明识别：显式标记 → main 区域 → 可见文本前 2000 字符
fn resolve_instructions(dump: &RawPageDump) -> String {
    dump.instructions_marker
        .as_deref()
        .map(normalize_whitespace)
        .filter(|s| !s.is_empty())
        .or_else(|| {
            dump.main_text
                .as_deref()
                .map(normalize_whitespace)
                .filter(|s| !s.is_empty())
        })
        .unwrap_or_else(|| {
            normalize_whitespace(&take_chars(&dump.body_text, INSTRUCTIONS_FALLBACK_LIMIT))
        })
}

/// 解析提交地址；解析不到即为致命的提取错误
fn resolve_submit_url(candidate: Option<&str>, body_text: &str, base: &Url) -> AppResult<String> {
    if let Some(candidate) = candidate {
        return base
            .join(candidate)
            .map(|u| u.to_string())
            .map_err(|e| {
                AppError::extraction(base.as_str(), format!("提交地址 {} 无法解析: {}", candidate, e))
            });
    }

    // 页面内没有显式候选时，扫描可见文本
    let absolute_re = Regex::new(r#"(?i)https?://[^\s"']+"#).expect("固定正则");
    let absolute_matches: Vec<&str> = absolute_re.find_iter(body_text).map(|m| m.as_str()).collect();

    if let Some(hit) = absolute_matches
        .iter()
        .find(|candidate| candidate.to_lowercase().contains("submit"))
    {
        return Ok(hit.to_string());
    }

    let relative_re = Regex::new(r"(?i)/[\w\-./?=&]*submit[\w\-./?=&]*").expect("固定正则");
    if let Some(hit) = relative_re.find(body_text) {
        return base.join(hit.as_str()).map(|u| u.to_string()).map_err(|e| {
            AppError::extraction(base.as_str(), format!("相对提交地址无法解析: {}", e))
        });
    }

    if let Some(first) = absolute_matches.first() {
        return Ok(first.to_string());
    }

    Err(AppError::extraction(
        base.as_str(),
        "页面上找不到提交地址",
    ))
}

/// 收集所有超链接并分类出附件
fn classify_links(raw_links: &[String], base: &Url) -> (Vec<String>, Vec<String>) {
    let attachment_re = Regex::new(r"(?i)\.(csv|json|xlsx?|pdf|txt)$").expect("固定正则");
    let mut links: Vec<String> = Vec::new();
    let mut attachments: Vec<String> = Vec::new();

    for href in raw_links {
        let Ok(absolute) = base.join(href) else {
            continue;
        };
        let absolute = absolute.to_string();
        if !links.contains(&absolute) {
            links.push(absolute.clone());
        }
        if attachment_re.is_match(href) && !attachments.contains(&absolute) {
            attachments.push(absolute);
        }
    }

    (links, attachments)
}
