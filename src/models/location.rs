use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Location {
    pub id: Uuid,
    pub name: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Denormalized venue reference stored inside match and player rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateLocationRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct LocationPublic {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "createdBy")]
    pub created_by: Uuid,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl From<&Location> for LocationPublic {
    fn from(l: &Location) -> Self {
        Self {
            id: l.id,
            name: l.name.clone(),
            created_by: l.created_by,
            created_at: l.created_at,
        }
    }
}
