use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::api::state::AppState;
use crate::api::{mask_internal, ApiError, Paginated, Pagination, PaginationMeta};
use crate::store::{InningsDetail, MatchDetail, MatchFilter, MatchSummary, VenueWithCount};

const DEFAULT_LIMIT: u32 = 10;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub team_id: Option<i64>,
    pub venue_id: Option<i64>,
}

pub async fn list_matches(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Paginated<MatchSummary>>, ApiError> {
    let pagination = Pagination::new(params.page, params.limit, DEFAULT_LIMIT);
    let filter = MatchFilter {
        team_id: params.team_id,
        venue_id: params.venue_id,
    };

    let total = state
        .db
        .count_matches(&filter)
        .map_err(mask_internal("fetch matches"))? as u32;
    let matches = state
        .db
        .list_matches(&filter, pagination.limit, pagination.offset())
        .map_err(mask_internal("fetch matches"))?;

    let mut data = Vec::with_capacity(matches.len());
    for m in matches {
        data.push(
            state
                .db
                .match_summary(m)
                .map_err(mask_internal("fetch matches"))?,
        );
    }

    Ok(Json(Paginated {
        data,
        pagination: PaginationMeta::new(&pagination, total),
    }))
}

pub async fn match_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MatchDetail>, ApiError> {
    let detail = state
        .db
        .match_detail(id)
        .map_err(mask_internal("fetch match"))?
        .ok_or_else(|| ApiError::NotFound("Match not found".to_string()))?;
    Ok(Json(detail))
}

/// The scorecard alone: the match's innings with performances, bowlers
/// ordered by wickets taken.
pub async fn scorecard(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<InningsDetail>>, ApiError> {
    let innings = state
        .db
        .innings_for_match(id)
        .map_err(mask_internal("fetch scorecard"))?;
    if innings.is_empty() {
        return Err(ApiError::NotFound("Scorecard not found".to_string()));
    }

    let mut details = Vec::with_capacity(innings.len());
    for row in innings {
        details.push(
            state
                .db
                .innings_detail(row, true)
                .map_err(mask_internal("fetch scorecard"))?,
        );
    }
    Ok(Json(details))
}

pub async fn list_venues(
    State(state): State<AppState>,
) -> Result<Json<Vec<VenueWithCount>>, ApiError> {
    let venues = state
        .db
        .venues_with_counts()
        .map_err(mask_internal("fetch venues"))?;
    Ok(Json(venues))
}

#[cfg(test)]
mod tests {
    use super::super::teams::tests::{get_json, test_state};
    use crate::api::build_router;
    use crate::models::NewVenue;
    use crate::store::tests::{
        sample_batting, sample_bowling, sample_innings, sample_match, sample_player, sample_team,
    };
    use axum::http::StatusCode;

    /// 2 teams, 1 match, 1 innings with 2 batsmen and 2 bowlers.
    fn seed_one_match(state: &crate::api::state::AppState) -> i64 {
        let db = &state.db;
        let team_a = db.upsert_team(&sample_team(101, "Chennai Super Kings")).unwrap();
        let team_b = db.upsert_team(&sample_team(102, "Mumbai Indians")).unwrap();
        let match_id = db
            .upsert_match(&sample_match(9001, Some(team_a), Some(team_b)))
            .unwrap();
        let innings_id = db.upsert_innings(&sample_innings(1, match_id, 1)).unwrap();

        let bat1 = db.upsert_player(&sample_player(1, "Opener One")).unwrap();
        let bat2 = db.upsert_player(&sample_player(2, "Opener Two")).unwrap();
        let bowl1 = db.upsert_player(&sample_player(3, "Quick One")).unwrap();
        let bowl2 = db.upsert_player(&sample_player(4, "Spinner Two")).unwrap();

        db.upsert_batting_performance(&sample_batting(innings_id, bat1, 50)).unwrap();
        let mut second = sample_batting(innings_id, bat2, 30);
        second.position = 2;
        db.upsert_batting_performance(&second).unwrap();
        db.upsert_bowling_performance(&sample_bowling(innings_id, bowl1, 2)).unwrap();
        db.upsert_bowling_performance(&sample_bowling(innings_id, bowl2, 1)).unwrap();
        match_id
    }

    #[tokio::test]
    async fn test_match_detail_full_scorecard() {
        let state = test_state();
        let match_id = seed_one_match(&state);

        let app = build_router(state);
        let (status, json) = get_json(app, &format!("/api/matches/{match_id}")).await;

        assert_eq!(status, StatusCode::OK);
        let innings = json["innings"].as_array().unwrap();
        assert_eq!(innings.len(), 1);
        assert_eq!(innings[0]["batting_performances"].as_array().unwrap().len(), 2);
        assert_eq!(innings[0]["bowling_performances"].as_array().unwrap().len(), 2);
        assert_eq!(json["team_a"]["title"], "Chennai Super Kings");
    }

    #[tokio::test]
    async fn test_match_detail_not_found() {
        let app = build_router(test_state());
        let (status, json) = get_json(app, "/api/matches/42").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["message"], "Match not found");
    }

    #[tokio::test]
    async fn test_scorecard_not_found_without_innings() {
        let state = test_state();
        let match_id = state
            .db
            .upsert_match(&sample_match(9001, None, None))
            .unwrap();

        let app = build_router(state);
        let (status, json) = get_json(app, &format!("/api/matches/{match_id}/scorecard")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["message"], "Scorecard not found");
    }

    #[tokio::test]
    async fn test_scorecard_orders_bowlers_by_wickets() {
        let state = test_state();
        let match_id = seed_one_match(&state);

        let app = build_router(state);
        let (status, json) = get_json(app, &format!("/api/matches/{match_id}/scorecard")).await;

        assert_eq!(status, StatusCode::OK);
        let bowlers = json[0]["bowling_performances"].as_array().unwrap();
        assert_eq!(bowlers[0]["wickets"], 2);
        assert_eq!(bowlers[1]["wickets"], 1);
    }

    #[tokio::test]
    async fn test_matches_list_with_venue_filter() {
        let state = test_state();
        let venue_id = state
            .db
            .upsert_venue(&NewVenue {
                venue_id: "v1".to_string(),
                name: "Wankhede Stadium".to_string(),
                location: None,
                country: None,
                timezone: None,
            })
            .unwrap();
        let mut at_venue = sample_match(9001, None, None);
        at_venue.venue_id = Some(venue_id);
        state.db.upsert_match(&at_venue).unwrap();
        state.db.upsert_match(&sample_match(9002, None, None)).unwrap();

        let app = build_router(state);
        let (status, json) = get_json(app, &format!("/api/matches?venue_id={venue_id}")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"].as_array().unwrap().len(), 1);
        assert_eq!(json["data"][0]["venue"]["name"], "Wankhede Stadium");
    }

    #[tokio::test]
    async fn test_venues_list_with_counts() {
        let state = test_state();
        let venue_id = state
            .db
            .upsert_venue(&NewVenue {
                venue_id: "v1".to_string(),
                name: "Eden Gardens".to_string(),
                location: Some("Kolkata".to_string()),
                country: Some("in".to_string()),
                timezone: None,
            })
            .unwrap();
        let mut m = sample_match(9001, None, None);
        m.venue_id = Some(venue_id);
        state.db.upsert_match(&m).unwrap();

        let app = build_router(state);
        let (status, json) = get_json(app, "/api/venues").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json[0]["name"], "Eden Gardens");
        assert_eq!(json[0]["match_count"], 1);
    }
}
