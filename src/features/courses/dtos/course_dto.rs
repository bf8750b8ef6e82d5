use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request DTO for course recommendations.
///
/// Every field is optional; absent or empty fields degrade into generic
/// search keywords instead of erroring.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseQueryDto {
    /// The user's profession or field (e.g. "it", "healthcare")
    #[serde(default)]
    pub profession: Option<String>,

    /// Destination province code (e.g. "ON")
    #[serde(default)]
    pub province: Option<String>,

    /// Immigration pathway ("study", "express", ...)
    #[serde(default)]
    pub pathway: Option<String>,
}

/// One recommended course
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseDto {
    pub title: String,
    pub provider: String,
    pub description: String,
    pub link: String,
    pub tags: Vec<String>,
}

/// Response DTO for course recommendations
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseListResponseDto {
    pub courses: Vec<CourseDto>,
}
