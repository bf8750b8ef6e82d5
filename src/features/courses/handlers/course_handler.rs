use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::extractor::AppJson;
use crate::features::courses::dtos::{CourseListResponseDto, CourseQueryDto};
use crate::features::courses::services::CourseRecommendationService;

/// Recommend courses for a newcomer profile.
///
/// This endpoint never fails: catalog outages and parse errors are absorbed
/// into a static fallback set so the storefront always gets a 200 with
/// something to render.
#[utoipa::path(
    post,
    path = "/api/courses/recommendations",
    request_body = CourseQueryDto,
    responses(
        (status = 200, description = "Up to six recommended courses", body = CourseListResponseDto)
    ),
    tag = "courses"
)]
pub async fn recommend_courses(
    State(service): State<Arc<CourseRecommendationService>>,
    AppJson(dto): AppJson<CourseQueryDto>,
) -> Json<CourseListResponseDto> {
    let courses = service.recommend(&dto).await;
    Json(CourseListResponseDto { courses })
}
