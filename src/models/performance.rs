use serde::Serialize;

/// A single batsman's line in an innings scorecard.
///
/// Unique per (innings, player). Counting stats default to zero;
/// `strike_rate` is NULL when the source never supplied one. Zero and
/// "not computed" are different facts.
#[derive(Debug, Clone, Serialize)]
pub struct BattingPerformance {
    pub id: i64,
    pub innings_id: i64,
    pub player_id: i64,
    pub runs: i64,
    pub balls_faced: i64,
    pub fours: i64,
    pub sixes: i64,
    pub strike_rate: Option<f64>,
    pub how_out: Option<String>,
    pub dismissal: Option<String>,
    pub position: i64,
    pub bowler_id: Option<i64>,
}

/// Insert payload for a batting performance upsert.
#[derive(Debug, Clone)]
pub struct NewBattingPerformance {
    pub innings_id: i64,
    pub player_id: i64,
    pub runs: i64,
    pub balls_faced: i64,
    pub fours: i64,
    pub sixes: i64,
    pub strike_rate: Option<f64>,
    pub how_out: Option<String>,
    pub dismissal: Option<String>,
    pub position: i64,
    pub bowler_id: Option<i64>,
}

/// A single bowler's line in an innings scorecard. Unique per
/// (innings, player); `economy` follows the same NULL convention as
/// `strike_rate`.
#[derive(Debug, Clone, Serialize)]
pub struct BowlingPerformance {
    pub id: i64,
    pub innings_id: i64,
    pub player_id: i64,
    pub overs: Option<String>,
    pub maidens: i64,
    pub runs_conceded: i64,
    pub wickets: i64,
    pub economy: Option<f64>,
    pub no_balls: i64,
    pub wides: i64,
    pub dot_balls: i64,
}

/// Insert payload for a bowling performance upsert.
#[derive(Debug, Clone)]
pub struct NewBowlingPerformance {
    pub innings_id: i64,
    pub player_id: i64,
    pub overs: Option<String>,
    pub maidens: i64,
    pub runs_conceded: i64,
    pub wickets: i64,
    pub economy: Option<f64>,
    pub no_balls: i64,
    pub wides: i64,
    pub dot_balls: i64,
}
