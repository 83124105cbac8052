use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::schemas::api::skills::{SkillListResponse, SkillResponse};
use crate::services::skills;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(paths(list_skills), components(schemas(SkillResponse, SkillListResponse)))]
pub struct SkillsApi;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/skills", get(list_skills))
}

#[utoipa::path(
    get,
    path = "/api/skills",
    tag = "skills",
    responses((status = 200, description = "The fixed skills catalog", body = SkillListResponse))
)]
pub async fn list_skills() -> Json<SkillListResponse> {
    Json(SkillListResponse {
        skills: skills::list().iter().map(SkillResponse::from).collect(),
    })
}
