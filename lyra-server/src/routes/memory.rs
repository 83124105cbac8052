//! Memory catalog routes.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::error::ServerError;
use crate::schemas::api::memory::{CreateMemoryRequest, MemoryListResponse, MemoryResponse};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(list_memories, create_memory),
    components(schemas(CreateMemoryRequest, MemoryResponse, MemoryListResponse))
)]
pub struct MemoryApi;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/memory", get(list_memories).post(create_memory))
}

#[utoipa::path(
    get,
    path = "/api/memory",
    tag = "memory",
    responses(
        (status = 200, description = "All memories, oldest first", body = MemoryListResponse),
        (status = 500, description = "Storage error"),
    )
)]
pub async fn list_memories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MemoryListResponse>, ServerError> {
    let memories = state.memory.list().await?;
    Ok(Json(MemoryListResponse {
        memories: memories.iter().map(|m| m.to_response()).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/memory",
    tag = "memory",
    request_body = CreateMemoryRequest,
    responses(
        (status = 200, description = "Memory created", body = MemoryResponse),
        (status = 500, description = "Storage error"),
    )
)]
pub async fn create_memory(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateMemoryRequest>,
) -> Result<Json<MemoryResponse>, ServerError> {
    let item = state.memory.create(req.into()).await?;
    Ok(Json(item.to_response()))
}
