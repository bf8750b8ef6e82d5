//! Client for the OpenAI-compatible chat-completion gateway.
//!
//! Both the chat relay and the e-book pipeline go through this client; it
//! owns the upstream error mapping (rate limit, billing, generic failure).

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::core::config::GatewayConfig;
use crate::core::error::{AppError, Result};

/// One message in a chat-completion conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Minimal shape of a non-streaming chat-completion response
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

pub struct GatewayClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl GatewayClient {
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let http = Client::builder()
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url,
            api_key: config.api_key,
            model: config.model,
        })
    }

    fn chat_completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    /// The credential check runs before any upstream call is attempted, so a
    /// misconfigured deployment fails every request with the same error.
    fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                AppError::Configuration("AI_GATEWAY_API_KEY is not configured".to_string())
            })
    }

    /// POST a chat-completion request and map upstream failures into the
    /// shared error taxonomy. 429 and 402 are surfaced distinctly; any other
    /// non-success status is logged with its body and surfaced generically.
    async fn request_chat(
        &self,
        messages: &[ChatMessage],
        stream: bool,
    ) -> Result<reqwest::Response> {
        let api_key = self.require_api_key()?;

        let body = json!({
            "model": self.model,
            "messages": messages,
            "stream": stream,
        });

        let response = self
            .http
            .post(self.chat_completions_url())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("AI gateway request failed: {}", e))
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(AppError::RateLimitExceeded(
                "Rate limit exceeded, please try again later.".to_string(),
            ));
        }
        if status == StatusCode::PAYMENT_REQUIRED {
            return Err(AppError::PaymentRequired(
                "Payment required, please add credits to your AI gateway workspace.".to_string(),
            ));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("AI gateway error: status={}, body={}", status, body);
            return Err(AppError::ExternalServiceError(format!(
                "AI gateway returned status {}",
                status
            )));
        }

        Ok(response)
    }

    /// Streamed completion. The caller relays the response body verbatim;
    /// this method only performs the request and the error mapping.
    pub async fn stream_chat(&self, messages: &[ChatMessage]) -> Result<reqwest::Response> {
        self.request_chat(messages, true).await
    }

    /// Buffered completion: returns the first choice's message content.
    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let response = self.request_chat(messages, false).await?;

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Failed to parse AI gateway response: {}", e))
        })?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| {
                AppError::ExternalServiceError(
                    "AI gateway response contained no choices".to_string(),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode as AxumStatusCode;
    use axum::{routing::post, Json, Router};
    use serde_json::{json, Value};

    use super::*;
    use crate::core::config::GatewayConfig;
    use crate::shared::test_helpers::spawn_mock_upstream;

    fn mock_gateway(status: AxumStatusCode, body: Value) -> Router {
        Router::new().route(
            "/v1/chat/completions",
            post(move || {
                let body = body.clone();
                async move { (status, Json(body)) }
            }),
        )
    }

    fn client_for(base_url: String, api_key: Option<&str>) -> GatewayClient {
        GatewayClient::new(GatewayConfig {
            base_url,
            api_key: api_key.map(|s| s.to_string()),
            model: "gpt-4o-mini".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn missing_api_key_is_a_configuration_error() {
        let client = client_for("http://127.0.0.1:9".to_string(), None);

        // Fails before any I/O, so a plain blocking runtime is enough
        let result = tokio_test::block_on(client.complete(&[ChatMessage::user("hi")]));

        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[tokio::test]
    async fn upstream_429_maps_to_rate_limit() {
        let base = spawn_mock_upstream(mock_gateway(
            AxumStatusCode::TOO_MANY_REQUESTS,
            json!({"error": "slow down"}),
        ))
        .await;
        let client = client_for(base, Some("test-key"));

        let result = client.complete(&[ChatMessage::user("hi")]).await;

        match result {
            Err(AppError::RateLimitExceeded(msg)) => assert!(msg.contains("Rate limit")),
            other => panic!("expected rate limit error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn upstream_402_maps_to_payment_required() {
        let base = spawn_mock_upstream(mock_gateway(
            AxumStatusCode::PAYMENT_REQUIRED,
            json!({"error": "no credits"}),
        ))
        .await;
        let client = client_for(base, Some("test-key"));

        let result = client.complete(&[ChatMessage::user("hi")]).await;

        match result {
            Err(AppError::PaymentRequired(msg)) => assert!(msg.contains("Payment required")),
            other => panic!("expected payment error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn upstream_500_maps_to_external_service_error() {
        let base = spawn_mock_upstream(mock_gateway(
            AxumStatusCode::INTERNAL_SERVER_ERROR,
            json!({"error": "boom"}),
        ))
        .await;
        let client = client_for(base, Some("test-key"));

        let result = client.complete(&[ChatMessage::user("hi")]).await;

        assert!(matches!(result, Err(AppError::ExternalServiceError(_))));
    }

    #[tokio::test]
    async fn complete_returns_first_choice_content() {
        let base = spawn_mock_upstream(mock_gateway(
            AxumStatusCode::OK,
            json!({
                "choices": [
                    {"message": {"role": "assistant", "content": "Welcome to Canada!"}}
                ]
            }),
        ))
        .await;
        let client = client_for(base, Some("test-key"));

        let content = client.complete(&[ChatMessage::user("hi")]).await.unwrap();

        assert_eq!(content, "Welcome to Canada!");
    }
}
