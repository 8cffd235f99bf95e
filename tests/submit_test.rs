//! 提交服务的端到端测试
//!
//! 在本地起一个记录请求体的评分端点，验证线上契约和错误路径

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::post;
use axum::Router;
use serde_json::{json, Value};
use tokio::sync::Mutex;

use auto_quiz_solver::error::AppError;
use auto_quiz_solver::models::{Answer, AnswerValue};
use auto_quiz_solver::services::{SubmitPayload, SubmitService};

type Recorded = Arc<Mutex<Option<Value>>>;

async fn record(
    State((recorded, response)): State<(Recorded, Value)>,
    Json(body): Json<Value>,
) -> Json<Value> {
    *recorded.lock().await = Some(body);
    Json(response)
}

/// 启动本地评分端点，返回提交地址和已记录请求体的句柄
async fn spawn_grading_server(response: Value) -> (String, Recorded) {
    let recorded: Recorded = Arc::new(Mutex::new(None));
    let app = Router::new()
        .route("/submit", post(record))
        .with_state((recorded.clone(), response));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("绑定本地端口失败");
    let addr = listener.local_addr().expect("读取本地地址失败");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("测试服务退出");
    });

    (format!("http://{}/submit", addr), recorded)
}

#[tokio::test]
async fn test_submit_round_trip_records_wire_contract() {
    let (submit_url, recorded) = spawn_grading_server(json!({
        "correct": true,
        "url": "/q/2",
        "reason": null,
    }))
    .await;

    let service = SubmitService::new(reqwest::Client::new(), 950_000);
    let answer =
        Answer::new(AnswerValue::Integer(25)).with_meta("strategy", json!("heuristic-math"));
    let payload = SubmitPayload::new(
        "student@example.com",
        "s3cret",
        "https://quiz.example.com/q/1",
        answer,
    );

    let result = service.submit(&submit_url, &payload).await.expect("提交失败");
    assert!(result.correct);
    assert_eq!(result.url.as_deref(), Some("/q/2"));

    let body = recorded.lock().await.clone().expect("端点未收到请求");
    assert_eq!(body["email"], "student@example.com");
    assert_eq!(body["secret"], "s3cret");
    assert_eq!(body["url"], "https://quiz.example.com/q/1");
    assert_eq!(body["answer"], 25);
    assert_eq!(body["metadata"]["strategy"], "heuristic-math");
}

#[tokio::test]
async fn test_submit_non_success_status_is_an_error() {
    let app = Router::new().route(
        "/submit",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("绑定本地端口失败");
    let addr = listener.local_addr().expect("读取本地地址失败");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("测试服务退出");
    });

    let service = SubmitService::new(reqwest::Client::new(), 950_000);
    let payload = SubmitPayload::new(
        "a@b.cn",
        "x",
        "https://quiz.example.com/q/1",
        Answer::new(AnswerValue::Text("ok".into())),
    );

    let err = service
        .submit(&format!("http://{}/submit", addr), &payload)
        .await
        .unwrap_err();
    match err.downcast_ref::<AppError>() {
        Some(AppError::BadStatus { status, .. }) => assert_eq!(*status, 500),
        other => panic!("意外的错误类型: {:?}", other),
    }
}

#[tokio::test]
async fn test_oversized_payload_rejected_locally() {
    // 上限极小，序列化后必然超出；不应发出任何请求
    let service = SubmitService::new(reqwest::Client::new(), 16);
    let payload = SubmitPayload::new(
        "student@example.com",
        "s3cret",
        "https://quiz.example.com/q/1",
        Answer::new(AnswerValue::Text("x".repeat(100))),
    );

    let err = service
        .submit("http://127.0.0.1:1/submit", &payload)
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<AppError>(),
        Some(AppError::PayloadTooLarge { .. })
    ));
}
