//! Chat routes: send a message, read or clear the conversation history.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::error::ServerError;
use crate::schemas::api::chat::{
    ChatHistoryResponse, ChatMessageResponse, SendMessageRequest, StatusResponse,
};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(send_message, get_history, clear_history),
    components(schemas(
        SendMessageRequest,
        ChatMessageResponse,
        ChatHistoryResponse,
        StatusResponse
    ))
)]
pub struct ChatApi;

/// Register chat routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/chat/message", post(send_message))
        .route("/chat/history", get(get_history).delete(clear_history))
}

/// Store the user's message and return the assistant's reply.
#[utoipa::path(
    post,
    path = "/api/chat/message",
    tag = "chat",
    request_body = SendMessageRequest,
    responses(
        (status = 200, description = "Assistant reply", body = ChatMessageResponse),
        (status = 500, description = "Storage error"),
    )
)]
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SendMessageRequest>,
) -> Result<Json<ChatMessageResponse>, ServerError> {
    let reply = state.chat.submit(req.content).await?;
    Ok(Json(reply.to_response()))
}

#[utoipa::path(
    get,
    path = "/api/chat/history",
    tag = "chat",
    responses(
        (status = 200, description = "Full conversation history", body = ChatHistoryResponse),
        (status = 500, description = "Storage error"),
    )
)]
pub async fn get_history(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ChatHistoryResponse>, ServerError> {
    let messages = state.chat.history().await?;
    Ok(Json(ChatHistoryResponse {
        messages: messages.iter().map(|m| m.to_response()).collect(),
    }))
}

#[utoipa::path(
    delete,
    path = "/api/chat/history",
    tag = "chat",
    responses(
        (status = 200, description = "History cleared", body = StatusResponse),
        (status = 500, description = "Storage error"),
    )
)]
pub async fn clear_history(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, ServerError> {
    state.chat.clear().await?;
    Ok(Json(StatusResponse {
        status: "success".to_owned(),
        message: "Chat history cleared".to_owned(),
    }))
}
