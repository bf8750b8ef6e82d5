//! AI-generated e-book pipeline.
//!
//! One gateway call produces a structured draft, which is persisted in two
//! phases: a provisional catalog row first, then a best-effort content upload
//! that reconciles the row's content location on success.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | POST | `/api/ebooks/generate` | No | Generate and persist an e-book |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::EbookGenerationService;
