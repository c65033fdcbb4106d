use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::api::state::AppState;
use crate::api::{mask_internal, ApiError, Paginated, Pagination, PaginationMeta};
use crate::models::Team;
use crate::store::{MatchFilter, MatchSummary, SquadMember, TeamDetail};

const DEFAULT_LIMIT: u32 = 10;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

pub async fn list_teams(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Paginated<Team>>, ApiError> {
    let pagination = Pagination::new(params.page, params.limit, DEFAULT_LIMIT);

    let total = state
        .db
        .count_teams()
        .map_err(mask_internal("fetch teams"))? as u32;
    let teams = state
        .db
        .list_teams(pagination.limit, pagination.offset())
        .map_err(mask_internal("fetch teams"))?;

    Ok(Json(Paginated {
        data: teams,
        pagination: PaginationMeta::new(&pagination, total),
    }))
}

pub async fn team_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<TeamDetail>, ApiError> {
    let detail = state
        .db
        .team_detail(id)
        .map_err(mask_internal("fetch team"))?
        .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))?;
    Ok(Json(detail))
}

pub async fn team_matches(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<ListParams>,
) -> Result<Json<Paginated<MatchSummary>>, ApiError> {
    let pagination = Pagination::new(params.page, params.limit, DEFAULT_LIMIT);
    let filter = MatchFilter {
        team_id: Some(id),
        venue_id: None,
    };

    let total = state
        .db
        .count_matches(&filter)
        .map_err(mask_internal("fetch team matches"))? as u32;
    let matches = state
        .db
        .list_matches(&filter, pagination.limit, pagination.offset())
        .map_err(mask_internal("fetch team matches"))?;

    let mut data = Vec::with_capacity(matches.len());
    for m in matches {
        data.push(
            state
                .db
                .match_summary(m)
                .map_err(mask_internal("fetch team matches"))?,
        );
    }

    Ok(Json(Paginated {
        data,
        pagination: PaginationMeta::new(&pagination, total),
    }))
}

pub async fn team_players(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<SquadMember>>, ApiError> {
    let members = state
        .db
        .squad_for_team(id)
        .map_err(mask_internal("fetch team players"))?;
    Ok(Json(members))
}
