use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::models::matches::{Match, MatchPublic};
use crate::models::player::*;
use crate::services::stats;
use crate::AppState;

pub async fn list_players(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let rows: Vec<(Uuid, String)> = sqlx::query_as("SELECT id, screen_name FROM players")
        .fetch_all(&state.db)
        .await?;

    let players: Vec<Value> = rows
        .iter()
        .map(|(id, screen_name)| json!({"id": id, "screenName": screen_name}))
        .collect();

    Ok(Json(json!(players)))
}

pub async fn create_player(
    State(state): State<AppState>,
    user: axum::Extension<AuthUser>,
    Json(body): Json<CreatePlayerRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    if body.screen_name.trim().is_empty() {
        return Err(AppError::BadRequest("Username is required".into()));
    }

    // One profile per user, enforced here rather than by a constraint.
    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM players WHERE user_id = $1)")
            .bind(user.id)
            .fetch_one(&state.db)
            .await?;

    if exists {
        return Err(AppError::Conflict("Player profile already exists".into()));
    }

    let home_court = body
        .home_court
        .as_ref()
        .map(serde_json::to_value)
        .transpose()
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let player: Player = sqlx::query_as(
        r#"INSERT INTO players
            (id, user_id, screen_name, real_name, hide_real_name, skill_level,
             paddle_brand, paddle_preference, plays, home_court)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING *"#,
    )
    .bind(Uuid::new_v4())
    .bind(user.id)
    .bind(body.screen_name.trim())
    .bind(&body.real_name)
    .bind(body.hide_real_name)
    .bind(&body.skill_level)
    .bind(&body.paddle_brand)
    .bind(&body.paddle_preference)
    .bind(&body.plays)
    .bind(home_court)
    .fetch_one(&state.db)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!(PlayerPublic::from(&player))),
    ))
}

pub async fn check_profile(
    State(state): State<AppState>,
    user: axum::Extension<AuthUser>,
) -> AppResult<Json<Value>> {
    let player: Option<Player> = sqlx::query_as("SELECT * FROM players WHERE user_id = $1")
        .bind(user.id)
        .fetch_optional(&state.db)
        .await?;

    match player {
        Some(p) => Ok(Json(json!({
            "hasProfile": true,
            "playerData": PlayerPublic::from(&p),
        }))),
        None => Ok(Json(json!({ "hasProfile": false }))),
    }
}

pub async fn get_player(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> AppResult<Json<Value>> {
    let id = Uuid::parse_str(&player_id)
        .map_err(|_| AppError::BadRequest("Invalid player ID".into()))?;

    let player: Player = sqlx::query_as("SELECT * FROM players WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Player not found".into()))?;

    let matches: Vec<Match> = sqlx::query_as(
        "SELECT * FROM matches WHERE participants::text LIKE '%' || $1 || '%' ORDER BY date DESC",
    )
    .bind(&player_id)
    .fetch_all(&state.db)
    .await?;

    let matches: Vec<MatchPublic> = matches.iter().map(MatchPublic::from).collect();

    Ok(Json(json!({
        "playerProfile": PlayerPublic::from(&player),
        "matches": matches,
    })))
}

pub async fn get_player_stats(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> AppResult<Json<Value>> {
    let record = stats::player_stats(&state.db, &player_id).await?;

    Ok(Json(json!({
        "wins": record.wins,
        "losses": record.losses,
        "totalMatches": record.total_matches(),
        "winPercentage": record.win_percentage(),
    })))
}
