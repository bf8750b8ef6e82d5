use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::ebooks::dtos::{GenerateEbookDto, GeneratedEbookDto};
use crate::features::ebooks::models::{ContentLocation, Ebook};
use crate::modules::gateway::{ChatMessage, GatewayClient};
use crate::modules::storage::ObjectStore;
use crate::shared::llm::{parse_llm_json, LlmExtract};
use crate::shared::prompts::{render_ebook_system_prompt, render_ebook_user_prompt};

/// Structured draft extracted from the model's reply
#[derive(Debug, Clone, Serialize, Deserialize, Default, JsonSchema)]
#[schemars(title = "EbookDraft")]
pub struct EbookDraft {
    #[schemars(description = "Engaging title for the e-book")]
    pub title: String,

    #[schemars(description = "2-3 sentence summary of what the reader will learn")]
    pub description: String,

    #[schemars(description = "Full e-book text with chapter headings")]
    pub content: String,
}

impl LlmExtract for EbookDraft {}

/// Service driving the generate -> persist -> upload -> reconcile pipeline.
///
/// The metadata insert and the content upload are two sequential network
/// calls with no transactional coupling: a crash between them leaves a row
/// with its placeholder location, which is valid (if incomplete) state.
pub struct EbookGenerationService {
    pool: PgPool,
    gateway: Arc<GatewayClient>,
    storage: Arc<dyn ObjectStore>,
}

impl EbookGenerationService {
    pub fn new(pool: PgPool, gateway: Arc<GatewayClient>, storage: Arc<dyn ObjectStore>) -> Self {
        Self {
            pool,
            gateway,
            storage,
        }
    }

    /// Generate an e-book for the topic and persist it.
    ///
    /// The returned DTO always carries the full generated text; `pdf_url` is
    /// the stored key when the upload succeeded and the placeholder when it
    /// did not.
    pub async fn generate(&self, dto: GenerateEbookDto) -> Result<GeneratedEbookDto> {
        let draft = self.generate_draft(&dto.topic).await?;

        let location = ContentLocation::placeholder_now();
        let mut record = self.insert_record(&draft, &location).await?;

        let location = self.store_content(record.id, location, &draft.content).await;
        if !location.is_placeholder() {
            self.update_location(record.id, location.as_str()).await?;
            record.pdf_url = location.as_str().to_string();
        }

        tracing::info!(
            "Ebook generated: id={}, title={:?}, stored={}",
            record.id,
            record.title,
            !location.is_placeholder()
        );

        Ok(record.into_generated_dto(draft.content))
    }

    /// One non-streaming gateway call, parsed into a draft.
    ///
    /// Parse failures are surfaced to the caller and never retried - the
    /// caller resubmits if it wants another attempt.
    async fn generate_draft(&self, topic: &str) -> Result<EbookDraft> {
        let system = render_ebook_system_prompt()
            .map_err(|e| AppError::Internal(format!("Failed to render system prompt: {}", e)))?;
        let user = render_ebook_user_prompt(topic, &EbookDraft::json_schema_string())
            .map_err(|e| AppError::Internal(format!("Failed to render user prompt: {}", e)))?;

        let reply = self
            .gateway
            .complete(&[ChatMessage::system(system), ChatMessage::user(user)])
            .await?;

        parse_llm_json::<EbookDraft>(&reply).map_err(|e| AppError::LlmResponseParse(e.to_string()))
    }

    /// Insert the catalog row in its provisional state. Failure here aborts
    /// the whole request.
    async fn insert_record(&self, draft: &EbookDraft, location: &ContentLocation) -> Result<Ebook> {
        let ebook = sqlx::query_as::<_, Ebook>(
            r#"
            INSERT INTO ebooks (title, description, pdf_url, is_free, price)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, description, pdf_url, is_free, price, created_at
            "#,
        )
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(location.as_str())
        .bind(true)
        .bind(Decimal::ZERO)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert ebook record: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(ebook)
    }

    /// Upload the draft content under a key derived from the record id.
    ///
    /// Best-effort: on failure the placeholder location is kept and the
    /// request still succeeds with the title/description usable.
    async fn store_content(
        &self,
        id: Uuid,
        location: ContentLocation,
        content: &str,
    ) -> ContentLocation {
        let key = format!("{}.txt", id);

        match self
            .storage
            .upload(&key, content.as_bytes().to_vec(), "text/plain")
            .await
        {
            Ok(stored_key) => location.store(stored_key),
            Err(e) => {
                tracing::warn!(
                    "Failed to upload ebook content for {} (keeping placeholder): {}",
                    id,
                    e
                );
                location
            }
        }
    }

    /// Point the catalog row at the stored content key.
    async fn update_location(&self, id: Uuid, key: &str) -> Result<()> {
        sqlx::query("UPDATE ebooks SET pdf_url = $1 WHERE id = $2")
            .bind(key)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update ebook content location: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;

    use super::*;
    use crate::core::config::GatewayConfig;
    use crate::core::database::create_lazy_pool;

    /// Store that accepts every upload and records the keys it saw.
    #[derive(Default)]
    struct RecordingStore {
        uploads: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ObjectStore for RecordingStore {
        async fn upload(
            &self,
            key: &str,
            _data: Vec<u8>,
            _content_type: &str,
        ) -> std::result::Result<String, AppError> {
            self.uploads.lock().unwrap().push(key.to_string());
            Ok(key.to_string())
        }

        fn public_url(&self, key: &str) -> String {
            format!("http://storage.local/ebook-files/{}", key)
        }
    }

    /// Store whose uploads always fail.
    struct FailingStore;

    #[async_trait]
    impl ObjectStore for FailingStore {
        async fn upload(
            &self,
            _key: &str,
            _data: Vec<u8>,
            _content_type: &str,
        ) -> std::result::Result<String, AppError> {
            Err(AppError::Internal("storage offline".to_string()))
        }

        fn public_url(&self, key: &str) -> String {
            format!("http://storage.local/ebook-files/{}", key)
        }
    }

    fn service_with(storage: Arc<dyn ObjectStore>) -> EbookGenerationService {
        let pool = create_lazy_pool("postgres://postgres@localhost/northstart_test").unwrap();
        let gateway = Arc::new(
            GatewayClient::new(GatewayConfig {
                base_url: "http://127.0.0.1:9".to_string(),
                api_key: Some("test-key".to_string()),
                model: "gpt-4o-mini".to_string(),
            })
            .unwrap(),
        );
        EbookGenerationService::new(pool, gateway, storage)
    }

    #[test]
    fn draft_parses_from_prose_wrapped_json() {
        let reply = concat!(
            "Of course! Here's the requested e-book:\n",
            r#"{"title":"T","description":"D","content":"C"}"#,
            "\nHope that helps."
        );

        let draft: EbookDraft = parse_llm_json(reply).unwrap();

        assert_eq!(draft.title, "T");
        assert_eq!(draft.description, "D");
        assert_eq!(draft.content, "C");
    }

    #[test]
    fn draft_schema_lists_the_three_fields() {
        let schema = EbookDraft::json_schema_string();

        assert!(schema.contains("title"));
        assert!(schema.contains("description"));
        assert!(schema.contains("content"));
    }

    #[tokio::test]
    async fn upload_failure_keeps_the_placeholder_location() {
        let service = service_with(Arc::new(FailingStore));
        let id = Uuid::new_v4();
        let location = ContentLocation::placeholder_now();
        let placeholder = location.as_str().to_string();

        let after = service.store_content(id, location, "chapter one").await;

        assert!(after.is_placeholder());
        assert_eq!(after.as_str(), placeholder);
    }

    #[tokio::test]
    async fn upload_success_transitions_to_the_record_key() {
        let store = Arc::new(RecordingStore::default());
        let service = service_with(store.clone());
        let id = Uuid::new_v4();

        let after = service
            .store_content(id, ContentLocation::placeholder_now(), "chapter one")
            .await;

        assert!(!after.is_placeholder());
        assert_eq!(after.as_str(), format!("{}.txt", id));
        assert_eq!(*store.uploads.lock().unwrap(), vec![format!("{}.txt", id)]);
    }

    #[test]
    fn response_dto_inlines_content_regardless_of_location() {
        let record = Ebook {
            id: Uuid::new_v4(),
            title: "T".to_string(),
            description: "D".to_string(),
            pdf_url: "placeholder-1722867600000".to_string(),
            is_free: true,
            price: Decimal::ZERO,
            created_at: Utc::now(),
        };

        let dto = record.into_generated_dto("C".to_string());

        assert_eq!(dto.content, "C");
        assert!(dto.pdf_url.starts_with("placeholder-"));
        assert!(dto.is_free);
        assert_eq!(dto.price, Decimal::ZERO);
    }
}
