use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

use crate::features::ebooks::dtos::GeneratedEbookDto;

/// Database model for an e-book catalog record
#[derive(Debug, Clone, FromRow)]
pub struct Ebook {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub pdf_url: String,
    pub is_free: bool,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Ebook {
    /// Build the response DTO, inlining the generated text so the caller
    /// does not need a second round trip to read it.
    pub fn into_generated_dto(self, content: String) -> GeneratedEbookDto {
        GeneratedEbookDto {
            id: self.id,
            title: self.title,
            description: self.description,
            pdf_url: self.pdf_url,
            is_free: self.is_free,
            price: self.price,
            created_at: self.created_at,
            content,
        }
    }
}

/// Content location lifecycle for an e-book record.
///
/// A row is created with a timestamp-derived placeholder and transitions to
/// `Stored` at most once, after a successful upload. A record can legally
/// stay in `Placeholder` forever (the upload is best-effort), which keeps
/// title and description usable even when body storage failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentLocation {
    Placeholder(String),
    Stored(String),
}

impl ContentLocation {
    /// New placeholder derived from the current timestamp
    pub fn placeholder_now() -> Self {
        Self::Placeholder(format!("placeholder-{}", Utc::now().timestamp_millis()))
    }

    /// The only legal transition: placeholder -> stored object key.
    pub fn store(self, key: impl Into<String>) -> Self {
        Self::Stored(key.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Placeholder(s) | Self::Stored(s) => s,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_is_timestamp_derived() {
        let location = ContentLocation::placeholder_now();

        assert!(location.is_placeholder());
        assert!(location.as_str().starts_with("placeholder-"));
    }

    #[test]
    fn storing_transitions_to_the_real_key() {
        let location = ContentLocation::placeholder_now();

        let stored = location.store("1f6e1c9e.txt");

        assert!(!stored.is_placeholder());
        assert_eq!(stored.as_str(), "1f6e1c9e.txt");
    }
}
