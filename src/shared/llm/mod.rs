//! Shared plumbing for talking to the chat-completion gateway: structured
//! output schemas and the layered response parser.

pub mod extract;
pub mod parser;

pub use extract::LlmExtract;
pub use parser::{parse_llm_json, LlmParseError};
