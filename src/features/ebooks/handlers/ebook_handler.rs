use std::sync::Arc;

use axum::{extract::State, Json};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::ebooks::dtos::{GenerateEbookDto, GenerateEbookResponseDto};
use crate::features::ebooks::services::EbookGenerationService;

/// Generate an e-book for a topic and persist it to the catalog.
///
/// Content upload failures degrade to a record with a placeholder location;
/// the generated text is always returned inline.
#[utoipa::path(
    post,
    path = "/api/ebooks/generate",
    request_body = GenerateEbookDto,
    responses(
        (status = 200, description = "E-book generated and persisted", body = GenerateEbookResponseDto),
        (status = 400, description = "Validation error"),
        (status = 402, description = "Gateway account requires payment"),
        (status = 429, description = "Gateway rate limit hit"),
        (status = 500, description = "Gateway failure, unparseable reply, or database error")
    ),
    tag = "ebooks"
)]
pub async fn generate_ebook(
    State(service): State<Arc<EbookGenerationService>>,
    AppJson(dto): AppJson<GenerateEbookDto>,
) -> Result<Json<GenerateEbookResponseDto>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let ebook = service.generate(dto).await?;

    Ok(Json(GenerateEbookResponseDto {
        success: true,
        ebook,
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::{routing::post, Json, Router};
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use std::sync::Arc;

    use crate::core::config::GatewayConfig;
    use crate::core::database::create_lazy_pool;
    use crate::core::error::AppError;
    use crate::features::ebooks::routes;
    use crate::features::ebooks::services::EbookGenerationService;
    use crate::modules::gateway::GatewayClient;
    use crate::modules::storage::ObjectStore;
    use crate::shared::test_helpers::spawn_mock_upstream;

    struct NullStore;

    #[async_trait::async_trait]
    impl ObjectStore for NullStore {
        async fn upload(
            &self,
            key: &str,
            _data: Vec<u8>,
            _content_type: &str,
        ) -> Result<String, AppError> {
            Ok(key.to_string())
        }

        fn public_url(&self, key: &str) -> String {
            format!("http://storage.local/ebook-files/{}", key)
        }
    }

    fn app_against(gateway_base: String) -> Router {
        let pool = create_lazy_pool("postgres://postgres@localhost/northstart_test").unwrap();
        let gateway = Arc::new(
            GatewayClient::new(GatewayConfig {
                base_url: gateway_base,
                api_key: Some("test-key".to_string()),
                model: "gpt-4o-mini".to_string(),
            })
            .unwrap(),
        );
        let service = Arc::new(EbookGenerationService::new(pool, gateway, Arc::new(NullStore)));
        routes::routes(service)
    }

    fn gateway_replying_with(content: &'static str) -> Router {
        Router::new().route(
            "/v1/chat/completions",
            post(move || async move {
                Json(json!({
                    "choices": [{"message": {"role": "assistant", "content": content}}]
                }))
            }),
        )
    }

    fn failing_gateway(status: StatusCode) -> Router {
        Router::new().route(
            "/v1/chat/completions",
            post(move || async move { (status, Json(json!({"error": "nope"}))) }),
        )
    }

    #[tokio::test]
    async fn unparseable_model_reply_is_a_500_parse_error() {
        let base =
            spawn_mock_upstream(gateway_replying_with("Sorry, I can only answer questions."))
                .await;
        let server = TestServer::new(app_against(base)).unwrap();

        let response = server
            .post("/api/ebooks/generate")
            .json(&json!({"topic": "opening a bank account"}))
            .await;

        assert_eq!(response.status_code(), 500);
        let body: Value = response.json();
        assert!(body["message"]
            .as_str()
            .unwrap()
            .contains("Failed to parse AI response"));
    }

    #[tokio::test]
    async fn gateway_rate_limit_surfaces_as_429() {
        let base = spawn_mock_upstream(failing_gateway(StatusCode::TOO_MANY_REQUESTS)).await;
        let server = TestServer::new(app_against(base)).unwrap();

        let response = server
            .post("/api/ebooks/generate")
            .json(&json!({"topic": "opening a bank account"}))
            .await;

        assert_eq!(response.status_code(), 429);
        let body: Value = response.json();
        assert!(body["message"].as_str().unwrap().contains("Rate limit"));
    }

    #[tokio::test]
    async fn gateway_billing_failure_surfaces_as_402() {
        let base = spawn_mock_upstream(failing_gateway(StatusCode::PAYMENT_REQUIRED)).await;
        let server = TestServer::new(app_against(base)).unwrap();

        let response = server
            .post("/api/ebooks/generate")
            .json(&json!({"topic": "opening a bank account"}))
            .await;

        assert_eq!(response.status_code(), 402);
        let body: Value = response.json();
        assert!(body["message"]
            .as_str()
            .unwrap()
            .contains("Payment required"));
    }

    #[tokio::test]
    async fn empty_topic_fails_validation() {
        let base = spawn_mock_upstream(gateway_replying_with("unused")).await;
        let server = TestServer::new(app_against(base)).unwrap();

        let response = server
            .post("/api/ebooks/generate")
            .json(&json!({"topic": ""}))
            .await;

        assert_eq!(response.status_code(), 400);
    }

    #[tokio::test]
    async fn missing_topic_is_a_bad_request() {
        let base = spawn_mock_upstream(gateway_replying_with("unused")).await;
        let server = TestServer::new(app_against(base)).unwrap();

        let response = server
            .post("/api/ebooks/generate")
            .json(&json!({}))
            .await;

        assert_eq!(response.status_code(), 400);
    }
}
