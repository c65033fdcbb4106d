use serde::Serialize;

/// A team's points-table row for one tournament round.
///
/// Unique per (team, round); re-ingestion updates the row in place as the
/// round progresses.
#[derive(Debug, Clone, Serialize)]
pub struct Standing {
    pub id: i64,
    pub team_id: i64,
    pub round: String,
    pub played: i64,
    pub wins: i64,
    pub losses: i64,
    pub ties: i64,
    pub no_result: i64,
    pub points: i64,
    pub net_run_rate: Option<f64>,
    pub position: Option<i64>,
}

/// Insert payload for a standings upsert.
#[derive(Debug, Clone)]
pub struct NewStanding {
    pub team_id: i64,
    pub round: String,
    pub played: i64,
    pub wins: i64,
    pub losses: i64,
    pub ties: i64,
    pub no_result: i64,
    pub points: i64,
    pub net_run_rate: Option<f64>,
    pub position: Option<i64>,
}
