use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::location::LocationRef;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Match {
    pub id: Uuid,
    pub game_type: String,
    pub date: DateTime<Utc>,
    pub time: Option<String>,
    pub location: serde_json::Value,
    pub outcome: String,
    pub scores: serde_json::Value,
    pub participants: serde_json::Value,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

/// One participant as submitted at match creation. Team assignment is
/// fixed here and never recomputed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantEntry {
    #[serde(rename = "playerId")]
    pub player_id: String,
    #[serde(rename = "playerName")]
    pub player_name: String,
    pub team: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundScore {
    pub round: i32,
    pub home: i32,
    pub away: i32,
}

#[derive(Debug, Deserialize)]
pub struct CreateMatchRequest {
    #[serde(rename = "gameType")]
    pub game_type: String,
    pub date: DateTime<Utc>,
    pub time: Option<String>,
    pub location: LocationRef,
    pub outcome: String,
    pub scores: Option<Vec<RoundScore>>,
    pub participants: Vec<ParticipantEntry>,
}

#[derive(Debug, Deserialize)]
pub struct VerifyMatchRequest {
    #[serde(rename = "matchId")]
    pub match_id: String,
}

#[derive(Debug, Serialize)]
pub struct MatchPublic {
    pub id: Uuid,
    #[serde(rename = "gameType")]
    pub game_type: String,
    pub date: DateTime<Utc>,
    pub time: Option<String>,
    pub location: serde_json::Value,
    pub outcome: String,
    pub scores: serde_json::Value,
    pub participants: serde_json::Value,
    pub verified: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl From<&Match> for MatchPublic {
    fn from(m: &Match) -> Self {
        Self {
            id: m.id,
            game_type: m.game_type.clone(),
            date: m.date,
            time: m.time.clone(),
            location: m.location.clone(),
            outcome: m.outcome.clone(),
            scores: m.scores.clone(),
            participants: m.participants.clone(),
            verified: m.verified,
            created_at: m.created_at,
        }
    }
}
