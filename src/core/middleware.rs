use axum::{
    body::Body,
    extract::Request,
    http::{header, HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};
use base64::prelude::*;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestId, RequestId};
use tracing::Span;
use uuid::Uuid;

/// Request ID generator using UUID v7 (time-ordered)
#[derive(Clone, Copy)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string();
        Some(RequestId::new(HeaderValue::from_str(&id).unwrap()))
    }
}

/// Custom MakeSpan that includes request_id in the tracing span
#[derive(Clone, Debug)]
pub struct MakeSpanWithRequestId;

impl<B> tower_http::trace::MakeSpan<B> for MakeSpanWithRequestId {
    fn make_span(&mut self, request: &axum::http::Request<B>) -> Span {
        let request_id = request
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");

        tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
        )
    }
}

/// Request headers browser clients are allowed to send on any route.
///
/// The storefront sends its auth token and client metadata alongside JSON
/// bodies, so the allow-list must cover all four even on public routes.
pub const CORS_ALLOWED_HEADERS: [HeaderName; 4] = [
    header::AUTHORIZATION,
    header::CONTENT_TYPE,
    HeaderName::from_static("x-client-info"),
    HeaderName::from_static("apikey"),
];

pub fn cors_layer(allowed_origins: Vec<String>) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(AllowHeaders::list(CORS_ALLOWED_HEADERS));

    // If origins list contains "*", allow any origin
    if allowed_origins.iter().any(|o| o == "*") {
        cors.allow_origin(Any)
    } else {
        // Parse origins into HeaderValue
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(AllowOrigin::list(origins))
    }
}

pub fn basic_auth_middleware(
    valid_credentials: Arc<String>,
) -> impl Fn(
    Request,
    Next,
)
    -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, Response>> + Send>>
       + Clone {
    move |req: Request, next: Next| {
        let credentials = valid_credentials.clone();
        Box::pin(async move {
            let auth_header = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|header| header.to_str().ok());

            if let Some(auth_header) = auth_header {
                if let Some(encoded) = auth_header.strip_prefix("Basic ") {
                    if let Ok(decoded) = BASE64_STANDARD.decode(encoded) {
                        if let Ok(creds) = String::from_utf8(decoded) {
                            if creds == *credentials {
                                return Ok(next.run(req).await);
                            }
                        }
                    }
                }
            }

            let response = Response::builder()
                .status(StatusCode::UNAUTHORIZED)
                .header(header::WWW_AUTHENTICATE, "Basic realm=\"Swagger UI\"")
                .body(Body::from("Unauthorized"))
                .unwrap();

            Err(response)
        })
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderName, HeaderValue, Method};
    use axum::{routing::post, Json, Router};
    use axum_test::TestServer;
    use serde_json::{json, Value};

    use super::cors_layer;

    async fn echo(Json(body): Json<Value>) -> Json<Value> {
        Json(body)
    }

    fn app() -> Router {
        Router::new()
            .route("/api/echo", post(echo))
            .layer(cors_layer(vec!["*".to_string()]))
    }

    #[tokio::test]
    async fn preflight_returns_200_with_cors_headers() {
        let server = TestServer::new(app()).unwrap();

        let response = server
            .method(Method::OPTIONS, "/api/echo")
            .add_header(
                HeaderName::from_static("origin"),
                HeaderValue::from_static("https://app.northstart.ca"),
            )
            .add_header(
                HeaderName::from_static("access-control-request-method"),
                HeaderValue::from_static("POST"),
            )
            .add_header(
                HeaderName::from_static("access-control-request-headers"),
                HeaderValue::from_static("authorization"),
            )
            .await;

        assert_eq!(response.status_code(), 200);
        assert_eq!(response.text(), "");
        assert_eq!(
            response.header("access-control-allow-origin").to_str().unwrap(),
            "*"
        );
        let allowed = response
            .header("access-control-allow-headers")
            .to_str()
            .unwrap()
            .to_ascii_lowercase();
        assert!(allowed.contains("authorization"));
        assert!(allowed.contains("content-type"));
        assert!(allowed.contains("x-client-info"));
        assert!(allowed.contains("apikey"));
    }

    #[tokio::test]
    async fn cors_headers_attached_to_non_preflight_responses() {
        let server = TestServer::new(app()).unwrap();

        let response = server
            .post("/api/echo")
            .add_header(
                HeaderName::from_static("origin"),
                HeaderValue::from_static("https://app.northstart.ca"),
            )
            .json(&json!({"ping": true}))
            .await;

        assert_eq!(response.status_code(), 200);
        assert_eq!(
            response.header("access-control-allow-origin").to_str().unwrap(),
            "*"
        );
    }
}
