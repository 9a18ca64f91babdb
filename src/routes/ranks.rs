use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::services::stats::{self, RankedPlayer};
use crate::AppState;

pub async fn get_rankings(State(state): State<AppState>) -> AppResult<Json<Vec<RankedPlayer>>> {
    let rankings = stats::rankings(&state.db).await?;
    Ok(Json(rankings))
}
