mod generation_service;

pub use generation_service::{EbookDraft, EbookGenerationService};
