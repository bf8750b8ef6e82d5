use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Request DTO for e-book generation
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct GenerateEbookDto {
    /// Topic the e-book should cover
    #[validate(length(min = 1, max = 500, message = "Topic must be 1-500 characters"))]
    pub topic: String,
}

/// The persisted e-book record plus the generated text inlined.
///
/// Field names mirror the catalog row so the storefront can reuse its
/// existing e-book card rendering.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GeneratedEbookDto {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// Stored content key, or the placeholder when the upload failed
    pub pdf_url: String,
    pub is_free: bool,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    /// Full generated text, returned regardless of the upload outcome
    pub content: String,
}

/// Response DTO for e-book generation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GenerateEbookResponseDto {
    pub success: bool,
    pub ebook: GeneratedEbookDto,
}
