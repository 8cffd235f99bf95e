//! HTTP 接收端
//!
//! 职责：
//! - POST /api/quiz 校验请求并入队，立即回 200，不等待求解
//! - 字段缺失或格式非法回 400，共享密钥不符回 403
//! - GET /health 探活
//!
//! 接收时刻在这里敲定，整次运行的截止时间都以它为锚点。

use std::sync::Arc;

use anyhow::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use chrono::Utc;
use regex::Regex;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};
use url::Url;

use crate::config::Config;
use crate::models::QuizRequest;
use crate::orchestrator::JobScheduler;
use crate::services::Services;

pub struct AppState {
    pub config: Config,
    pub scheduler: JobScheduler,
}

/// 入站请求体
#[derive(Debug, Deserialize)]
pub struct QuizRequestBody {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub secret: String,
    #[serde(default)]
    pub url: String,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/quiz", post(accept_quiz))
        .with_state(state)
}

/// 启动 HTTP 服务并阻塞运行
pub async fn serve(config: Config) -> Result<()> {
    let port = config.port;
    let services = Arc::new(Services::new(config.clone()));
    let scheduler = JobScheduler::new(services, config.max_concurrent_jobs);
    let state = Arc::new(AppState { config, scheduler });

    let app = router(state);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("🌐 HTTP 服务已启动: http://0.0.0.0:{}", port);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

async fn accept_quiz(
    State(state): State<Arc<AppState>>,
    Json(body): Json<QuizRequestBody>,
) -> (StatusCode, Json<Value>) {
    if !is_valid_email(&body.email) || !is_valid_target_url(&body.url) {
        warn!("⚠️ 拒绝格式非法的测验请求 (email={})", body.email);
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid email or url" })),
        );
    }
    if body.secret != state.config.quiz_secret {
        warn!("⚠️ 拒绝密钥不符的测验请求 (email={})", body.email);
        return (
            StatusCode::FORBIDDEN,
            Json(json!({ "error": "invalid secret" })),
        );
    }

    // 接收时刻在响应前敲定，后续排队不会推迟截止时间
    let received_at = Utc::now();
    let request = QuizRequest {
        email: body.email,
        secret: body.secret,
        target_url: body.url,
        received_at,
    };

    info!("✓ 已接受测验请求: {}", request.target_url);
    state.scheduler.enqueue(request);

    (
        StatusCode::OK,
        Json(json!({
            "status": "accepted",
            "receivedAt": received_at.to_rfc3339(),
        })),
    )
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    let re = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("固定正则");
    re.is_match(email)
}

pub(crate) fn is_valid_target_url(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("a.b+c@sub.domain.org"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("has space@example.com"));
        assert!(!is_valid_email("user@nodot"));
    }

    #[test]
    fn test_target_url_validation() {
        assert!(is_valid_target_url("https://quiz.example.com/q/1"));
        assert!(is_valid_target_url("http://localhost:8080/quiz"));
        assert!(!is_valid_target_url(""));
        assert!(!is_valid_target_url("ftp://example.com/file"));
        assert!(!is_valid_target_url("quiz.example.com/q/1"));
    }
}
