use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::ChatMessage;

/// Request body for `POST /api/chat/message`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct SendMessageRequest {
    /// Message text. Missing is treated as empty.
    #[serde(default)]
    pub content: String,
}

/// A conversation entry as the client sees it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatMessageResponse {
    pub id: String,
    /// `"user"` or `"lyra"`.
    pub sender: String,
    pub content: String,
    /// RFC 3339 creation time.
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatHistoryResponse {
    pub messages: Vec<ChatMessageResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
}

impl ChatMessage {
    pub fn to_response(&self) -> ChatMessageResponse {
        ChatMessageResponse {
            id: self.id.clone(),
            sender: self.sender.to_string(),
            content: self.content.clone(),
            timestamp: self.timestamp.to_rfc3339(),
        }
    }
}
