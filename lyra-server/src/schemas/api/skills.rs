use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::services::skills::Skill;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SkillResponse {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SkillListResponse {
    pub skills: Vec<SkillResponse>,
}

impl From<&Skill> for SkillResponse {
    fn from(skill: &Skill) -> Self {
        SkillResponse {
            id: skill.id.to_owned(),
            name: skill.name.to_owned(),
            icon: skill.icon.to_owned(),
            active: skill.active,
        }
    }
}
