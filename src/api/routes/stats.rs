use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::api::state::AppState;
use crate::api::{mask_internal, ApiError};
use crate::store::{BatsmanLeader, BowlerLeader, StandingEntry, Summary, TeamPerformance};

const DEFAULT_LEADERBOARD: u32 = 10;

#[derive(Debug, Deserialize)]
pub struct StandingsParams {
    pub round: Option<String>,
}

pub async fn standings(
    State(state): State<AppState>,
    Query(params): Query<StandingsParams>,
) -> Result<Json<Vec<StandingEntry>>, ApiError> {
    let entries = state
        .db
        .standings_view(params.round.as_deref())
        .map_err(mask_internal("fetch standings"))?;
    Ok(Json(entries))
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardParams {
    pub limit: Option<u32>,
}

pub async fn top_batsmen(
    State(state): State<AppState>,
    Query(params): Query<LeaderboardParams>,
) -> Result<Json<Vec<BatsmanLeader>>, ApiError> {
    let limit = params.limit.unwrap_or(DEFAULT_LEADERBOARD).clamp(1, 100);
    let leaders = state
        .db
        .top_batsmen(limit)
        .map_err(mask_internal("fetch top batsmen"))?;
    Ok(Json(leaders))
}

pub async fn top_bowlers(
    State(state): State<AppState>,
    Query(params): Query<LeaderboardParams>,
) -> Result<Json<Vec<BowlerLeader>>, ApiError> {
    let limit = params.limit.unwrap_or(DEFAULT_LEADERBOARD).clamp(1, 100);
    let leaders = state
        .db
        .top_bowlers(limit)
        .map_err(mask_internal("fetch top bowlers"))?;
    Ok(Json(leaders))
}

pub async fn summary(State(state): State<AppState>) -> Result<Json<Summary>, ApiError> {
    let summary = state
        .db
        .summary()
        .map_err(mask_internal("fetch summary"))?;
    Ok(Json(summary))
}

pub async fn team_performance(
    State(state): State<AppState>,
) -> Result<Json<Vec<TeamPerformance>>, ApiError> {
    let performance = state
        .db
        .team_performance()
        .map_err(mask_internal("fetch team performance"))?;
    Ok(Json(performance))
}
