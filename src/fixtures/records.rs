//! Raw fixture record types.
//!
//! These mirror the external snake_case JSON verbatim. Fields whose type
//! varies between files (numbers vs numeric strings) are kept as
//! [`serde_json::Value`] and coerced by the loader helpers at ingestion
//! time.

use serde::Deserialize;
use serde_json::Value;

/// One entry of `teams/teams.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTeam {
    pub tid: i64,
    pub title: String,
    #[serde(default)]
    pub abbr: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub thumb_url: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub sex: Option<String>,
}

/// One entry of `squads/squads.json`: a team's roster.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSquad {
    pub team_id: i64,
    #[serde(default)]
    pub players: Vec<RawSquadPlayer>,
}

/// A player as listed inside a squad record.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSquadPlayer {
    pub pid: i64,
    pub title: String,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub middle_name: Option<String>,
    #[serde(default)]
    pub birthdate: Option<String>,
    #[serde(default)]
    pub birthplace: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub playing_role: Option<String>,
    #[serde(default)]
    pub batting_style: Option<String>,
    #[serde(default)]
    pub bowling_style: Option<String>,
    #[serde(default)]
    pub fielding_position: Option<String>,
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(default)]
    pub fantasy_player_rating: Option<Value>,
    #[serde(default)]
    pub role_str: Option<String>,
}

/// Reference to a team by its external id, as nested in match records.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTeamRef {
    pub team_id: i64,
}

/// Venue block nested in a match record.
#[derive(Debug, Clone, Deserialize)]
pub struct RawVenueRef {
    #[serde(default)]
    pub venue_id: Option<Value>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
}

/// Toss block nested in a match record. `decision` is a numeric code:
/// 1 = bat, 2 = bowl.
#[derive(Debug, Clone, Deserialize)]
pub struct RawToss {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub winner: Option<Value>,
    #[serde(default)]
    pub decision: Option<Value>,
}

/// Man-of-the-match block nested in a match record.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPlayerRef {
    #[serde(default)]
    pub pid: Option<Value>,
}

/// One entry of `matches/matches.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMatch {
    pub match_id: i64,
    pub title: String,
    #[serde(default)]
    pub short_title: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub match_number: Option<Value>,
    #[serde(default)]
    pub format_str: Option<String>,
    #[serde(default)]
    pub status_str: Option<String>,
    #[serde(default)]
    pub status_note: Option<String>,
    #[serde(default)]
    pub date_start: Option<String>,
    #[serde(default)]
    pub date_end: Option<String>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub win_margin: Option<Value>,
    #[serde(default)]
    pub umpires: Option<String>,
    #[serde(default)]
    pub referee: Option<String>,
    #[serde(default)]
    pub teama: Option<RawTeamRef>,
    #[serde(default)]
    pub teamb: Option<RawTeamRef>,
    #[serde(default)]
    pub venue: Option<RawVenueRef>,
    #[serde(default)]
    pub winning_team_id: Option<Value>,
    #[serde(default)]
    pub toss: Option<RawToss>,
    #[serde(default)]
    pub man_of_the_match: Option<RawPlayerRef>,
}

/// A per-match scorecard file (`scorecards/*.json`).
#[derive(Debug, Clone, Deserialize)]
pub struct RawScorecard {
    pub match_id: i64,
    #[serde(default)]
    pub innings: Vec<RawInnings>,
}

/// Run-rate / overs equations nested in an innings record.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEquations {
    #[serde(default)]
    pub overs: Option<Value>,
    #[serde(default)]
    pub runrate: Option<Value>,
}

/// Extras breakdown nested in an innings record.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawExtras {
    #[serde(default)]
    pub byes: Option<Value>,
    #[serde(default)]
    pub legbyes: Option<Value>,
    #[serde(default)]
    pub wides: Option<Value>,
    #[serde(default)]
    pub noballs: Option<Value>,
    #[serde(default)]
    pub total: Option<Value>,
}

/// One innings inside a scorecard file. `scores` carries the combined
/// `"runs/wickets"` notation.
#[derive(Debug, Clone, Deserialize)]
pub struct RawInnings {
    pub iid: i64,
    pub number: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub status: Option<Value>,
    #[serde(default)]
    pub scores: Option<String>,
    #[serde(default)]
    pub equations: Option<RawEquations>,
    #[serde(default)]
    pub overs: Option<Value>,
    #[serde(default)]
    pub target: Option<Value>,
    #[serde(default)]
    pub extra_runs: Option<RawExtras>,
    #[serde(default)]
    pub batting_team_id: Option<Value>,
    #[serde(default)]
    pub fielding_team_id: Option<Value>,
    #[serde(default)]
    pub batsmen: Vec<RawBatsman>,
    #[serde(default)]
    pub bowlers: Vec<RawBowler>,
}

/// A batsman's line inside an innings record.
#[derive(Debug, Clone, Deserialize)]
pub struct RawBatsman {
    #[serde(default)]
    pub batsman_id: Option<Value>,
    #[serde(default)]
    pub runs: Option<Value>,
    #[serde(default)]
    pub balls_faced: Option<Value>,
    #[serde(default)]
    pub fours: Option<Value>,
    #[serde(default)]
    pub sixes: Option<Value>,
    #[serde(default)]
    pub strike_rate: Option<Value>,
    #[serde(default)]
    pub how_out: Option<String>,
    #[serde(default)]
    pub dismissal: Option<String>,
    #[serde(default)]
    pub bowler_id: Option<Value>,
}

/// A bowler's line inside an innings record. `run0` is the source's name
/// for dot balls.
#[derive(Debug, Clone, Deserialize)]
pub struct RawBowler {
    #[serde(default)]
    pub bowler_id: Option<Value>,
    #[serde(default)]
    pub overs: Option<Value>,
    #[serde(default)]
    pub maidens: Option<Value>,
    #[serde(default)]
    pub runs_conceded: Option<Value>,
    #[serde(default)]
    pub wickets: Option<Value>,
    #[serde(default)]
    pub econ: Option<Value>,
    #[serde(default)]
    pub noballs: Option<Value>,
    #[serde(default)]
    pub wides: Option<Value>,
    #[serde(default)]
    pub run0: Option<Value>,
}

/// Top-level shape of `standings/standings.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawStandingsFile {
    #[serde(default)]
    pub standings: Vec<RawRoundStandings>,
}

/// Round label block.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRoundName {
    #[serde(default)]
    pub name: Option<String>,
}

/// Standings for one tournament round.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRoundStandings {
    #[serde(default)]
    pub round: Option<RawRoundName>,
    #[serde(default)]
    pub standings: Vec<RawStanding>,
}

/// One team's row inside a round's standings.
#[derive(Debug, Clone, Deserialize)]
pub struct RawStanding {
    #[serde(default)]
    pub team_id: Option<Value>,
    #[serde(default)]
    pub played: Option<Value>,
    #[serde(default)]
    pub win: Option<Value>,
    #[serde(default)]
    pub loss: Option<Value>,
    #[serde(default)]
    pub tied: Option<Value>,
    #[serde(default)]
    pub nr: Option<Value>,
    #[serde(default)]
    pub points: Option<Value>,
    #[serde(default)]
    pub netrr: Option<Value>,
    #[serde(default)]
    pub position: Option<Value>,
}
