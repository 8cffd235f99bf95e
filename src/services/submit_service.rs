//! 提交服务 - 业务能力层
//!
//! 只负责"提交答案"能力：序列化、字节上限校验、单次 POST、解析评分结果

use anyhow::Result;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use tracing::{debug, info};

use crate::error::AppError;
use crate::models::{Answer, AnswerValue, GradingResult};

/// 提交到评分端点的负载
///
/// 线上契约：POST JSON `{email, secret, url, answer, metadata?}`
#[derive(Debug, Clone, Serialize)]
pub struct SubmitPayload {
    pub email: String,
    pub secret: String,
    /// 本跳题目页面的地址
    pub url: String,
    pub answer: AnswerValue,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, JsonValue>,
}

impl SubmitPayload {
    pub fn new(email: &str, secret: &str, page_url: &str, answer: Answer) -> Self {
        Self {
            email: email.to_string(),
            secret: secret.to_string(),
            url: page_url.to_string(),
            answer: answer.value,
            metadata: answer.metadata,
        }
    }
}

/// 提交服务
///
/// 职责：
/// - 每跳恰好一次提交，失败不重试
/// - 负载超出字节上限时本地拒绝，不发送
/// - 不认识策略，不关心流程
pub struct SubmitService {
    client: reqwest::Client,
    max_payload_bytes: usize,
}

impl SubmitService {
    pub fn new(client: reqwest::Client, max_payload_bytes: usize) -> Self {
        Self {
            client,
            max_payload_bytes,
        }
    }

    /// 提交答案并返回评分结果
    pub async fn submit(&self, submit_url: &str, payload: &SubmitPayload) -> Result<GradingResult> {
        let body = serde_json::to_vec(payload)?;
        if body.len() > self.max_payload_bytes {
            return Err(AppError::PayloadTooLarge {
                size: body.len(),
                limit: self.max_payload_bytes,
            }
            .into());
        }

        info!("📤 正在提交答案到 {}", submit_url);
        debug!("提交负载: {} 字节", body.len());

        let response = self
            .client
            .post(submit_url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| AppError::transport(submit_url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::BadStatus {
                endpoint: submit_url.to_string(),
                status: status.as_u16(),
            }
            .into());
        }

        let result: GradingResult = response
            .json()
            .await
            .map_err(|e| AppError::transport(submit_url, e))?;

        info!(
            "✓ 评分结果: correct={}, next_url={:?}",
            result.correct, result.url
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_serializes_wire_contract_fields() {
        let answer = Answer::new(AnswerValue::Integer(25))
            .with_meta("strategy", json!("heuristic-math"));
        let payload = SubmitPayload::new(
            "student@example.com",
            "s3cret",
            "https://quiz.example.com/q/1",
            answer,
        );

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["email"], "student@example.com");
        assert_eq!(value["secret"], "s3cret");
        assert_eq!(value["url"], "https://quiz.example.com/q/1");
        assert_eq!(value["answer"], 25);
        assert_eq!(value["metadata"]["strategy"], "heuristic-math");
    }

    #[test]
    fn test_empty_metadata_is_omitted() {
        let payload = SubmitPayload::new(
            "a@b.cn",
            "x",
            "https://q/1",
            Answer::new(AnswerValue::Text("ok".into())),
        );
        let value = serde_json::to_value(&payload).unwrap();
        assert!(value.get("metadata").is_none());
    }
}
