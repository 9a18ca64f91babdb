use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::location::LocationRef;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Player {
    pub id: Uuid,
    pub user_id: Uuid,
    pub screen_name: String,
    pub real_name: Option<String>,
    pub hide_real_name: Option<bool>,
    pub skill_level: Option<String>,
    pub paddle_brand: Option<String>,
    pub paddle_preference: Option<String>,
    pub plays: Option<String>,
    pub home_court: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePlayerRequest {
    #[serde(rename = "screenName")]
    pub screen_name: String,
    #[serde(rename = "realName")]
    pub real_name: Option<String>,
    #[serde(rename = "hideRealName")]
    pub hide_real_name: Option<bool>,
    #[serde(rename = "skillLevel")]
    pub skill_level: Option<String>,
    #[serde(rename = "paddleBrand")]
    pub paddle_brand: Option<String>,
    #[serde(rename = "paddlePreference")]
    pub paddle_preference: Option<String>,
    pub plays: Option<String>,
    #[serde(rename = "homeCourt")]
    pub home_court: Option<LocationRef>,
}

#[derive(Debug, Serialize)]
pub struct PlayerPublic {
    pub id: Uuid,
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    #[serde(rename = "screenName")]
    pub screen_name: String,
    #[serde(rename = "realName")]
    pub real_name: Option<String>,
    #[serde(rename = "hideRealName")]
    pub hide_real_name: Option<bool>,
    #[serde(rename = "skillLevel")]
    pub skill_level: Option<String>,
    #[serde(rename = "paddleBrand")]
    pub paddle_brand: Option<String>,
    #[serde(rename = "paddlePreference")]
    pub paddle_preference: Option<String>,
    pub plays: Option<String>,
    #[serde(rename = "homeCourt")]
    pub home_court: Option<serde_json::Value>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl From<&Player> for PlayerPublic {
    fn from(p: &Player) -> Self {
        Self {
            id: p.id,
            user_id: p.user_id,
            screen_name: p.screen_name.clone(),
            real_name: p.real_name.clone(),
            hide_real_name: p.hide_real_name,
            skill_level: p.skill_level.clone(),
            paddle_brand: p.paddle_brand.clone(),
            paddle_preference: p.paddle_preference.clone(),
            plays: p.plays.clone(),
            home_court: p.home_court.clone(),
            created_at: p.created_at,
        }
    }
}
