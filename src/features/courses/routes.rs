use std::sync::Arc;

use axum::{routing::post, Router};

use crate::features::courses::handlers::course_handler::recommend_courses;
use crate::features::courses::services::CourseRecommendationService;

/// Create routes for the course recommendation feature
///
/// Public endpoint: the storefront calls it before users sign up.
pub fn routes(service: Arc<CourseRecommendationService>) -> Router {
    Router::new()
        .route("/api/courses/recommendations", post(recommend_courses))
        .with_state(service)
}
