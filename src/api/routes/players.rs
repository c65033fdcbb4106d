use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::{mask_internal, ApiError, Paginated, Pagination, PaginationMeta};
use crate::models::Player;
use crate::store::{
    BattingLogEntry, BattingTotals, BowlingLogEntry, BowlingTotals, PlayerFilter, TeamMembership,
};

const DEFAULT_LIMIT: u32 = 20;

/// How many recent performances the detail endpoint inlines.
const RECENT_PERFORMANCES: u32 = 10;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub role: Option<String>,
    pub country: Option<String>,
    pub search: Option<String>,
}

pub async fn list_players(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Paginated<Player>>, ApiError> {
    let pagination = Pagination::new(params.page, params.limit, DEFAULT_LIMIT);
    let filter = PlayerFilter {
        role: params.role.filter(|s| !s.is_empty()),
        country: params.country.filter(|s| !s.is_empty()),
        search: params.search.filter(|s| !s.is_empty()),
    };

    let total = state
        .db
        .count_players(&filter)
        .map_err(mask_internal("fetch players"))? as u32;
    let players = state
        .db
        .list_players(&filter, pagination.limit, pagination.offset())
        .map_err(mask_internal("fetch players"))?;

    Ok(Json(Paginated {
        data: players,
        pagination: PaginationMeta::new(&pagination, total),
    }))
}

/// Aggregated career stats inlined in the player detail response.
#[derive(Debug, Serialize)]
pub struct AggregatedStats {
    pub batting: BattingTotals,
    pub bowling: BowlingTotals,
}

#[derive(Debug, Serialize)]
pub struct PlayerDetailResponse {
    #[serde(flatten)]
    pub player: Player,
    pub teams: Vec<TeamMembership>,
    pub batting_performances: Vec<BattingLogEntry>,
    pub bowling_performances: Vec<BowlingLogEntry>,
    pub aggregated_stats: AggregatedStats,
}

pub async fn player_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PlayerDetailResponse>, ApiError> {
    let player = state
        .db
        .player_by_id(id)
        .map_err(mask_internal("fetch player"))?
        .ok_or_else(|| ApiError::NotFound("Player not found".to_string()))?;

    let teams = state
        .db
        .memberships_for_player(id)
        .map_err(mask_internal("fetch player"))?;
    let batting_performances = state
        .db
        .batting_log(id, RECENT_PERFORMANCES, 0)
        .map_err(mask_internal("fetch player"))?;
    let bowling_performances = state
        .db
        .bowling_log(id, RECENT_PERFORMANCES, 0)
        .map_err(mask_internal("fetch player"))?;
    let batting = state
        .db
        .batting_totals(id)
        .map_err(mask_internal("fetch player"))?;
    let bowling = state
        .db
        .bowling_totals(id)
        .map_err(mask_internal("fetch player"))?;

    Ok(Json(PlayerDetailResponse {
        player,
        teams,
        batting_performances,
        bowling_performances,
        aggregated_stats: AggregatedStats { batting, bowling },
    }))
}

#[derive(Debug, Deserialize)]
pub struct LogParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

pub async fn batting_log(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<LogParams>,
) -> Result<Json<Paginated<BattingLogEntry>>, ApiError> {
    let pagination = Pagination::new(params.page, params.limit, DEFAULT_LIMIT);

    let total = state
        .db
        .count_batting_for_player(id)
        .map_err(mask_internal("fetch batting performances"))? as u32;
    let entries = state
        .db
        .batting_log(id, pagination.limit, pagination.offset())
        .map_err(mask_internal("fetch batting performances"))?;

    Ok(Json(Paginated {
        data: entries,
        pagination: PaginationMeta::new(&pagination, total),
    }))
}

pub async fn bowling_log(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<LogParams>,
) -> Result<Json<Paginated<BowlingLogEntry>>, ApiError> {
    let pagination = Pagination::new(params.page, params.limit, DEFAULT_LIMIT);

    let total = state
        .db
        .count_bowling_for_player(id)
        .map_err(mask_internal("fetch bowling performances"))? as u32;
    let entries = state
        .db
        .bowling_log(id, pagination.limit, pagination.offset())
        .map_err(mask_internal("fetch bowling performances"))?;

    Ok(Json(Paginated {
        data: entries,
        pagination: PaginationMeta::new(&pagination, total),
    }))
}

#[cfg(test)]
mod tests {
    use super::super::teams::tests::{get_json, test_state};
    use crate::api::build_router;
    use crate::store::tests::{sample_batting, sample_innings, sample_match, sample_player};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_players_list_with_filters() {
        let state = test_state();
        let mut p1 = sample_player(1, "Jasprit Bumrah");
        p1.playing_role = Some("bowl".to_string());
        let p2 = sample_player(2, "Shubman Gill");
        state.db.upsert_player(&p1).unwrap();
        state.db.upsert_player(&p2).unwrap();

        let app = build_router(state);
        let (status, json) = get_json(app, "/api/players?role=bowl").await;

        assert_eq!(status, StatusCode::OK);
        let data = json["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["title"], "Jasprit Bumrah");
    }

    #[tokio::test]
    async fn test_players_search_case_insensitive() {
        let state = test_state();
        state.db.upsert_player(&sample_player(1, "Jasprit Bumrah")).unwrap();
        state.db.upsert_player(&sample_player(2, "Shubman Gill")).unwrap();

        let app = build_router(state);
        let (status, json) = get_json(app, "/api/players?search=bumRAH").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"].as_array().unwrap().len(), 1);
        assert_eq!(json["pagination"]["total"], 1);
    }

    #[tokio::test]
    async fn test_player_detail_aggregates() {
        let state = test_state();
        let match_id = state.db.upsert_match(&sample_match(9001, None, None)).unwrap();
        let i1 = state.db.upsert_innings(&sample_innings(1, match_id, 1)).unwrap();
        let i2 = state.db.upsert_innings(&sample_innings(2, match_id, 2)).unwrap();
        let player_id = state.db.upsert_player(&sample_player(1, "Run Machine")).unwrap();
        state
            .db
            .upsert_batting_performance(&sample_batting(i1, player_id, 40))
            .unwrap();
        state
            .db
            .upsert_batting_performance(&sample_batting(i2, player_id, 70))
            .unwrap();

        let app = build_router(state);
        let (status, json) = get_json(app, &format!("/api/players/{player_id}")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["title"], "Run Machine");
        let batting = &json["aggregated_stats"]["batting"];
        assert_eq!(batting["innings"], 2);
        assert_eq!(batting["runs"], 110);
        assert_eq!(batting["highest_score"], 70);
        // Never bowled: zero innings and an undefined (null) average.
        let bowling = &json["aggregated_stats"]["bowling"];
        assert_eq!(bowling["innings"], 0);
        assert!(bowling["average"].is_null());
        assert_eq!(json["batting_performances"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_player_detail_not_found() {
        let app = build_router(test_state());
        let (status, json) = get_json(app, "/api/players/42").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["message"], "Player not found");
    }

    #[tokio::test]
    async fn test_batting_log_pagination_invariant() {
        let state = test_state();
        let match_id = state.db.upsert_match(&sample_match(9001, None, None)).unwrap();
        let player_id = state.db.upsert_player(&sample_player(1, "Busy Batsman")).unwrap();
        for n in 1..=5 {
            let innings_id = state
                .db
                .upsert_innings(&sample_innings(n, match_id, n))
                .unwrap();
            state
                .db
                .upsert_batting_performance(&sample_batting(innings_id, player_id, 20))
                .unwrap();
        }

        let app = build_router(state);
        let (status, json) = get_json(app, &format!("/api/players/{player_id}/batting?limit=2&page=3")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["pagination"]["total"], 5);
        assert_eq!(json["pagination"]["totalPages"], 3); // ceil(5 / 2)
        assert_eq!(json["data"].as_array().unwrap().len(), 1); // last page remainder
    }
}
