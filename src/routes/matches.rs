use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::matches::*;
use crate::AppState;

const TEAMS: [&str; 2] = ["home", "away"];

fn validate_match(body: &CreateMatchRequest) -> Result<(), AppError> {
    if body.participants.is_empty() {
        return Err(AppError::BadRequest(
            "At least one participant is required".into(),
        ));
    }

    for p in &body.participants {
        if !TEAMS.contains(&p.team.as_str()) {
            return Err(AppError::BadRequest(format!(
                "Invalid team '{}' for participant {}",
                p.team, p.player_id
            )));
        }
    }

    if !TEAMS.contains(&body.outcome.as_str()) {
        return Err(AppError::BadRequest(format!(
            "Invalid outcome '{}'",
            body.outcome
        )));
    }

    // Win/loss attribution is meaningless if nobody played on the winning
    // side.
    if !body.participants.iter().any(|p| p.team == body.outcome) {
        return Err(AppError::BadRequest(
            "Outcome must match a participating team".into(),
        ));
    }

    Ok(())
}

pub async fn create_match(
    State(state): State<AppState>,
    Json(body): Json<CreateMatchRequest>,
) -> AppResult<Json<Value>> {
    validate_match(&body)?;

    let location =
        serde_json::to_value(&body.location).map_err(|e| AppError::Internal(e.to_string()))?;
    let scores = serde_json::to_value(body.scores.as_deref().unwrap_or(&[]))
        .map_err(|e| AppError::Internal(e.to_string()))?;
    let participants =
        serde_json::to_value(&body.participants).map_err(|e| AppError::Internal(e.to_string()))?;

    let created: Match = sqlx::query_as(
        r#"INSERT INTO matches
            (id, game_type, date, time, location, outcome, scores, participants, verified)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, false)
        RETURNING *"#,
    )
    .bind(Uuid::new_v4())
    .bind(&body.game_type)
    .bind(body.date)
    .bind(&body.time)
    .bind(location)
    .bind(&body.outcome)
    .bind(scores)
    .bind(participants)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(json!(MatchPublic::from(&created))))
}

pub async fn list_matches(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let matches: Vec<Match> = sqlx::query_as("SELECT * FROM matches ORDER BY date DESC")
        .fetch_all(&state.db)
        .await?;

    let matches: Vec<MatchPublic> = matches.iter().map(MatchPublic::from).collect();
    Ok(Json(json!(matches)))
}

pub async fn player_matches(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> AppResult<Json<Value>> {
    let matches: Vec<Match> = sqlx::query_as(
        "SELECT * FROM matches WHERE participants::text LIKE '%' || $1 || '%' ORDER BY date DESC",
    )
    .bind(&player_id)
    .fetch_all(&state.db)
    .await?;

    let matches: Vec<MatchPublic> = matches.iter().map(MatchPublic::from).collect();
    Ok(Json(json!(matches)))
}

pub async fn verify_match(
    State(state): State<AppState>,
    Json(body): Json<VerifyMatchRequest>,
) -> AppResult<Json<Value>> {
    let match_id = Uuid::parse_str(&body.match_id)
        .map_err(|_| AppError::BadRequest("Invalid match ID".into()))?;

    // One-way flip; re-verifying an already verified match is a no-op.
    let updated: Match =
        sqlx::query_as("UPDATE matches SET verified = true WHERE id = $1 RETURNING *")
            .bind(match_id)
            .fetch_optional(&state.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Match not found".into()))?;

    Ok(Json(json!(MatchPublic::from(&updated))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::location::LocationRef;
    use chrono::Utc;

    fn participant(id: &str, team: &str) -> ParticipantEntry {
        ParticipantEntry {
            player_id: id.to_string(),
            player_name: id.to_string(),
            team: team.to_string(),
        }
    }

    fn request(outcome: &str, participants: Vec<ParticipantEntry>) -> CreateMatchRequest {
        CreateMatchRequest {
            game_type: "Casual".to_string(),
            date: Utc::now(),
            time: Some("18:00".to_string()),
            location: LocationRef {
                id: "loc-1".to_string(),
                name: "Main Court".to_string(),
            },
            outcome: outcome.to_string(),
            scores: None,
            participants,
        }
    }

    #[test]
    fn test_valid_doubles_match() {
        let body = request(
            "home",
            vec![
                participant("p1", "home"),
                participant("p2", "home"),
                participant("p3", "away"),
                participant("p4", "away"),
            ],
        );
        assert!(validate_match(&body).is_ok());
    }

    #[test]
    fn test_rejects_empty_participants() {
        assert!(validate_match(&request("home", vec![])).is_err());
    }

    #[test]
    fn test_rejects_unknown_team_label() {
        let body = request("home", vec![participant("p1", "left")]);
        assert!(validate_match(&body).is_err());
    }

    #[test]
    fn test_rejects_unknown_outcome() {
        let body = request("draw", vec![participant("p1", "home")]);
        assert!(validate_match(&body).is_err());
    }

    #[test]
    fn test_rejects_outcome_without_matching_team() {
        // Everyone played on home; away cannot have won.
        let body = request(
            "away",
            vec![participant("p1", "home"), participant("p2", "home")],
        );
        assert!(validate_match(&body).is_err());
    }
}
