use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::MemoryItem;
use crate::services::NewMemory;

/// Request body for `POST /api/memory`. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateMemoryRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    /// Free-form tag, `"conversation"` when omitted.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MemoryResponse {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// RFC 3339 creation time.
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MemoryListResponse {
    pub memories: Vec<MemoryResponse>,
}

impl From<CreateMemoryRequest> for NewMemory {
    fn from(req: CreateMemoryRequest) -> Self {
        NewMemory {
            title: req.title,
            content: req.content,
            kind: req.kind,
        }
    }
}

impl MemoryItem {
    pub fn to_response(&self) -> MemoryResponse {
        MemoryResponse {
            id: self.id.clone(),
            title: self.title.clone(),
            content: self.content.clone(),
            kind: self.kind.clone(),
            timestamp: self.timestamp.to_rfc3339(),
        }
    }
}
