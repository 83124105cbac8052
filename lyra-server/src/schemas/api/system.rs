use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of `GET /api/health`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Always `"healthy"`.
    pub status: String,
    /// Deployment label, e.g. `"vercel"`.
    pub environment: String,
}

/// Body of `GET /api/config`. Only non-sensitive values are exposed.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConfigResponse {
    pub version: String,
    pub is_production: bool,
    pub deployment_region: String,
}
