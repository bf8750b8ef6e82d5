use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::Response,
};
use futures::TryStreamExt;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::modules::gateway::{ChatMessage, GatewayClient};

use super::super::dtos::ChatRequestDto;
use super::super::prompts::{system_prompt_for, DEFAULT_AGENT_TYPE};

/// State for the chat relay handler
#[derive(Clone)]
pub struct ChatState {
    pub gateway: Arc<GatewayClient>,
}

/// Relay a conversation to the chat-completion gateway and stream the reply.
///
/// The upstream body is passed through verbatim as `text/event-stream`; chunk
/// boundaries are whatever the gateway produced. The client parses the
/// streamed frames itself.
#[utoipa::path(
    post,
    path = "/api/chat",
    request_body = ChatRequestDto,
    responses(
        (status = 200, description = "Streamed chat-completion chunks", content_type = "text/event-stream"),
        (status = 402, description = "Gateway account requires payment"),
        (status = 429, description = "Gateway rate limit hit"),
        (status = 500, description = "Gateway misconfigured or failed")
    ),
    tag = "chat"
)]
pub async fn relay_chat(
    State(state): State<ChatState>,
    AppJson(dto): AppJson<ChatRequestDto>,
) -> Result<Response> {
    let agent_type = dto.agent_type.as_deref().unwrap_or(DEFAULT_AGENT_TYPE);
    let system_prompt = system_prompt_for(agent_type);

    let mut messages = Vec::with_capacity(dto.messages.len() + 1);
    messages.push(ChatMessage::system(system_prompt));
    messages.extend(dto.messages.into_iter().map(ChatMessage::from));

    let upstream = state.gateway.stream_chat(&messages).await?;

    // Mid-stream failures can't change the already-sent status line; log them
    // so they are at least visible to operators.
    let stream = upstream
        .bytes_stream()
        .inspect_err(|e| tracing::warn!("AI gateway stream error: {}", e));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/event-stream")
        .header(header::CACHE_CONTROL, "no-cache")
        .body(Body::from_stream(stream))
        .map_err(|e| AppError::Internal(format!("Failed to build relay response: {}", e)))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::{routing::post, Json, Router};
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use std::sync::Arc;

    use crate::core::config::GatewayConfig;
    use crate::modules::gateway::GatewayClient;
    use crate::shared::test_helpers::spawn_mock_upstream;

    use super::super::super::routes;

    const STREAM_BODY: &str = "data: {\"choices\":[{\"delta\":{\"content\":\"Hi\"}}]}\n\ndata: [DONE]\n\n";

    async fn app_against(base_url: String) -> Router {
        let gateway = Arc::new(
            GatewayClient::new(GatewayConfig {
                base_url,
                api_key: Some("test-key".to_string()),
                model: "gpt-4o-mini".to_string(),
            })
            .unwrap(),
        );
        routes::routes(gateway)
    }

    /// Upstream that streams a fixed SSE body.
    fn streaming_upstream() -> Router {
        Router::new().route(
            "/v1/chat/completions",
            post(|| async {
                (
                    [("content-type", "text/event-stream")],
                    STREAM_BODY.to_string(),
                )
            }),
        )
    }

    /// Upstream that echoes the first forwarded message's content, so tests
    /// can observe which system prompt was prepended.
    fn echoing_upstream() -> Router {
        Router::new().route(
            "/v1/chat/completions",
            post(|Json(body): Json<Value>| async move {
                body["messages"][0]["content"]
                    .as_str()
                    .unwrap_or_default()
                    .to_string()
            }),
        )
    }

    fn failing_upstream(status: StatusCode) -> Router {
        Router::new().route(
            "/v1/chat/completions",
            post(move || async move { (status, Json(json!({"error": "upstream says no"}))) }),
        )
    }

    #[tokio::test]
    async fn relays_upstream_body_verbatim_as_event_stream() {
        let base = spawn_mock_upstream(streaming_upstream()).await;
        let server = TestServer::new(app_against(base).await).unwrap();

        let response = server
            .post("/api/chat")
            .json(&json!({
                "messages": [{"role": "user", "content": "hello"}],
                "agentType": "immigration"
            }))
            .await;

        assert_eq!(response.status_code(), 200);
        assert_eq!(
            response.header("content-type").to_str().unwrap(),
            "text/event-stream"
        );
        assert_eq!(response.text(), STREAM_BODY);
    }

    #[tokio::test]
    async fn unknown_agent_type_uses_the_immigration_prompt() {
        let base = spawn_mock_upstream(echoing_upstream()).await;
        let server = TestServer::new(app_against(base).await).unwrap();

        let response = server
            .post("/api/chat")
            .json(&json!({
                "messages": [{"role": "user", "content": "hello"}],
                "agentType": "no-such-agent"
            }))
            .await;

        assert_eq!(response.status_code(), 200);
        assert!(response.text().contains("immigration assistant"));
    }

    #[tokio::test]
    async fn missing_agent_type_also_uses_the_default_prompt() {
        let base = spawn_mock_upstream(echoing_upstream()).await;
        let server = TestServer::new(app_against(base).await).unwrap();

        let response = server
            .post("/api/chat")
            .json(&json!({
                "messages": [{"role": "user", "content": "hello"}]
            }))
            .await;

        assert_eq!(response.status_code(), 200);
        assert!(response.text().contains("immigration assistant"));
    }

    #[tokio::test]
    async fn upstream_rate_limit_surfaces_as_429() {
        let base = spawn_mock_upstream(failing_upstream(StatusCode::TOO_MANY_REQUESTS)).await;
        let server = TestServer::new(app_against(base).await).unwrap();

        let response = server
            .post("/api/chat")
            .json(&json!({"messages": [{"role": "user", "content": "hello"}]}))
            .await;

        assert_eq!(response.status_code(), 429);
        let body: Value = response.json();
        assert!(body["message"].as_str().unwrap().contains("Rate limit"));
    }

    #[tokio::test]
    async fn upstream_billing_failure_surfaces_as_402() {
        let base = spawn_mock_upstream(failing_upstream(StatusCode::PAYMENT_REQUIRED)).await;
        let server = TestServer::new(app_against(base).await).unwrap();

        let response = server
            .post("/api/chat")
            .json(&json!({"messages": [{"role": "user", "content": "hello"}]}))
            .await;

        assert_eq!(response.status_code(), 402);
        let body: Value = response.json();
        assert!(body["message"]
            .as_str()
            .unwrap()
            .contains("Payment required"));
    }

    #[tokio::test]
    async fn other_upstream_failures_surface_as_500() {
        let base = spawn_mock_upstream(failing_upstream(StatusCode::BAD_GATEWAY)).await;
        let server = TestServer::new(app_against(base).await).unwrap();

        let response = server
            .post("/api/chat")
            .json(&json!({"messages": [{"role": "user", "content": "hello"}]}))
            .await;

        assert_eq!(response.status_code(), 500);
    }
}
