use std::sync::Arc;

use axum::{routing::post, Router};

use crate::features::chat::handlers::chat_handler::{relay_chat, ChatState};
use crate::modules::gateway::GatewayClient;

/// Create routes for the chat relay feature
pub fn routes(gateway: Arc<GatewayClient>) -> Router {
    Router::new()
        .route("/api/chat", post(relay_chat))
        .with_state(ChatState { gateway })
}
