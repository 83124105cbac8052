//! Health / heartbeat and public configuration endpoints.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::schemas::api::system::{ConfigResponse, HealthResponse};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(get_root, get_liveness, get_health, get_config),
    components(schemas(HealthResponse, ConfigResponse))
)]
pub struct HealthApi;

/// Routes served outside the `/api` prefix.
pub fn root_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(get_root))
        .route("/health", get(get_liveness))
}

/// Routes nested under `/api`.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(get_health))
        .route("/config", get(get_config))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses((status = 200, description = "Banner", body = Value))
)]
pub async fn get_root() -> Json<Value> {
    Json(json!({ "message": "Lyra AI API is running!" }))
}

/// Bare liveness check for load-balancers.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Server is up", body = Value))
)]
pub async fn get_liveness() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

/// Heartbeat endpoint.
///
/// Returns `{"status": "healthy", "environment": "..."}` with HTTP 200.
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses((status = 200, description = "Server is healthy", body = HealthResponse))
)]
pub async fn get_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_owned(),
        environment: state.config.environment.clone(),
    })
}

/// Non-sensitive deployment information.
#[utoipa::path(
    get,
    path = "/api/config",
    tag = "health",
    responses((status = 200, description = "Deployment information", body = ConfigResponse))
)]
pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<ConfigResponse> {
    Json(ConfigResponse {
        version: state.config.app_version.clone(),
        is_production: state.config.is_production,
        deployment_region: state.config.deployment_region.clone(),
    })
}

// ── Tests ──────────────────────────────────────────────────────────────────────
