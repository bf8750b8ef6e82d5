use std::sync::Arc;

use axum::{routing::post, Router};

use crate::features::ebooks::handlers::ebook_handler::generate_ebook;
use crate::features::ebooks::services::EbookGenerationService;

/// Create routes for the e-book generation feature
pub fn routes(service: Arc<EbookGenerationService>) -> Router {
    Router::new()
        .route("/api/ebooks/generate", post(generate_ebook))
        .with_state(service)
}
