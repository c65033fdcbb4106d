//! REST API endpoints.
//!
//! Axum-based HTTP API over the read-only store: resource routes for teams,
//! players, matches, and venues, plus derived statistics under `/stats`.
//! List endpoints wrap results in a `{data, pagination}` envelope; errors
//! are `{error, message}` with the matching status code.

pub mod routes;
pub mod state;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "Not Found"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
        };

        let body = ErrorResponse {
            error: error.to_string(),
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Log a failure server-side and surface only a generic message.
pub(crate) fn mask_internal<E: std::fmt::Display>(what: &'static str) -> impl Fn(E) -> ApiError {
    move |err| {
        tracing::error!("failed to {what}: {err}");
        ApiError::Internal(format!("Failed to {what}"))
    }
}

/// Pagination parameters.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Pagination {
    pub fn new(page: Option<u32>, limit: Option<u32>, default_limit: u32) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(default_limit).clamp(1, 100),
        }
    }

    pub fn offset(&self) -> u32 {
        (self.page - 1) * self.limit
    }
}

/// Pagination metadata in list responses.
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub limit: u32,
    pub total: u32,
    #[serde(rename = "totalPages")]
    pub total_pages: u32,
}

impl PaginationMeta {
    pub fn new(pagination: &Pagination, total: u32) -> Self {
        Self {
            page: pagination.page,
            limit: pagination.limit,
            total,
            total_pages: total.div_ceil(pagination.limit),
        }
    }
}

/// The `{data, pagination}` envelope for list endpoints.
#[derive(Debug, Serialize)]
pub struct Paginated<T: Serialize> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

/// Build the full API router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(routes::health))
        .route("/api/teams", get(routes::teams::list_teams))
        .route("/api/teams/:id", get(routes::teams::team_detail))
        .route("/api/teams/:id/matches", get(routes::teams::team_matches))
        .route("/api/teams/:id/players", get(routes::teams::team_players))
        .route("/api/players", get(routes::players::list_players))
        .route("/api/players/:id", get(routes::players::player_detail))
        .route("/api/players/:id/batting", get(routes::players::batting_log))
        .route("/api/players/:id/bowling", get(routes::players::bowling_log))
        .route("/api/matches", get(routes::matches::list_matches))
        .route("/api/matches/:id", get(routes::matches::match_detail))
        .route("/api/matches/:id/scorecard", get(routes::matches::scorecard))
        .route("/api/venues", get(routes::matches::list_venues))
        .route("/api/stats/standings", get(routes::stats::standings))
        .route("/api/stats/top-batsmen", get(routes::stats::top_batsmen))
        .route("/api/stats/top-bowlers", get(routes::stats::top_bowlers))
        .route("/api/stats/summary", get(routes::stats::summary))
        .route(
            "/api/stats/team-performance",
            get(routes::stats::team_performance),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        let p = Pagination::new(None, None, 10);
        assert_eq!(p.page, 1);
        assert_eq!(p.limit, 10);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn test_pagination_offset() {
        let p = Pagination::new(Some(3), Some(25), 10);
        assert_eq!(p.page, 3);
        assert_eq!(p.limit, 25);
        assert_eq!(p.offset(), 50);
    }

    #[test]
    fn test_pagination_bounds() {
        // Page can't be 0
        let p = Pagination::new(Some(0), Some(50), 10);
        assert_eq!(p.page, 1);

        // Limit max is 100
        let p = Pagination::new(Some(1), Some(500), 10);
        assert_eq!(p.limit, 100);

        // Limit can't be 0
        let p = Pagination::new(Some(1), Some(0), 10);
        assert_eq!(p.limit, 1);
    }

    #[test]
    fn test_pagination_meta_total_pages() {
        let p = Pagination::new(Some(2), Some(10), 10);
        let meta = PaginationMeta::new(&p, 25);

        assert_eq!(meta.page, 2);
        assert_eq!(meta.total, 25);
        assert_eq!(meta.total_pages, 3);
    }

    #[test]
    fn test_pagination_meta_empty() {
        let p = Pagination::new(None, None, 10);
        let meta = PaginationMeta::new(&p, 0);
        assert_eq!(meta.total_pages, 0);
    }

    #[test]
    fn test_error_body_shape() {
        let err = ApiError::NotFound("Team not found".to_string());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
