use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::models::location::*;
use crate::AppState;

pub async fn create_location(
    State(state): State<AppState>,
    user: axum::Extension<AuthUser>,
    Json(body): Json<CreateLocationRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Location name is required".into()));
    }

    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM locations WHERE name = $1)")
        .bind(name)
        .fetch_one(&state.db)
        .await?;

    if exists {
        return Err(AppError::Conflict("Location already exists".into()));
    }

    let location: Location = sqlx::query_as(
        "INSERT INTO locations (id, name, created_by) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(user.id)
    .fetch_one(&state.db)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!(LocationPublic::from(&location))),
    ))
}

pub async fn list_locations(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let locations: Vec<Location> = sqlx::query_as("SELECT * FROM locations ORDER BY name")
        .fetch_all(&state.db)
        .await?;

    let locations: Vec<LocationPublic> = locations.iter().map(LocationPublic::from).collect();
    Ok(Json(json!(locations)))
}
