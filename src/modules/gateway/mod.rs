//! Chat-completion gateway module
//!
//! Client for the OpenAI-compatible upstream used by the chat relay and the
//! e-book generation pipeline.

mod openai_client;

pub use openai_client::{ChatMessage, GatewayClient};
