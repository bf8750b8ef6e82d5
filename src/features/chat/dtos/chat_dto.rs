use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::modules::gateway::ChatMessage;

/// One conversation turn as sent by the storefront
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatMessageDto {
    /// Message role ("user" or "assistant")
    pub role: String,
    pub content: String,
}

impl From<ChatMessageDto> for ChatMessage {
    fn from(dto: ChatMessageDto) -> Self {
        Self {
            role: dto.role,
            content: dto.content,
        }
    }
}

/// Request DTO for the chat relay
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequestDto {
    /// Ordered conversation history, oldest first
    pub messages: Vec<ChatMessageDto>,

    /// Which assistant persona should answer. Unknown or missing values use
    /// the default persona.
    #[serde(default)]
    pub agent_type: Option<String>,
}
