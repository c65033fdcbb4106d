use serde::Serialize;

/// One team's batting turn within a match.
///
/// `total_runs`/`total_wickets` are split out of the combined
/// `"runs/wickets"` score notation at ingestion time. Counting fields
/// default to zero; `run_rate` stays NULL when the source never computed it.
#[derive(Debug, Clone, Serialize)]
pub struct Innings {
    pub id: i64,
    pub iid: i64,
    pub match_id: i64,
    pub innings_number: i64,
    pub name: Option<String>,
    pub short_name: Option<String>,
    pub status: Option<String>,
    pub total_runs: i64,
    pub total_wickets: i64,
    pub total_overs: Option<String>,
    pub run_rate: Option<f64>,
    pub target: Option<i64>,
    pub extras_byes: i64,
    pub extras_legbyes: i64,
    pub extras_wides: i64,
    pub extras_noballs: i64,
    pub extras_total: i64,
    pub batting_team_id: Option<i64>,
    pub fielding_team_id: Option<i64>,
}

/// Insert payload for an innings upsert.
#[derive(Debug, Clone)]
pub struct NewInnings {
    pub iid: i64,
    pub match_id: i64,
    pub innings_number: i64,
    pub name: Option<String>,
    pub short_name: Option<String>,
    pub status: Option<String>,
    pub total_runs: i64,
    pub total_wickets: i64,
    pub total_overs: Option<String>,
    pub run_rate: Option<f64>,
    pub target: Option<i64>,
    pub extras_byes: i64,
    pub extras_legbyes: i64,
    pub extras_wides: i64,
    pub extras_noballs: i64,
    pub extras_total: i64,
    pub batting_team_id: Option<i64>,
    pub fielding_team_id: Option<i64>,
}
