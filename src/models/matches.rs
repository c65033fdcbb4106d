use chrono::NaiveDateTime;
use serde::Serialize;

/// A scheduled or completed match between two teams.
///
/// All entity references are nullable: the fixture files were authored
/// independently, so a match may name a team or player the squad files never
/// delivered. Unresolved references are stored as NULL rather than rejecting
/// the match.
#[derive(Debug, Clone, Serialize)]
pub struct Match {
    pub id: i64,
    pub match_id: i64,
    pub title: String,
    pub short_title: Option<String>,
    pub subtitle: Option<String>,
    pub match_number: Option<String>,
    pub format: String,
    pub status: Option<String>,
    pub status_note: Option<String>,
    pub date_start: Option<NaiveDateTime>,
    pub date_end: Option<NaiveDateTime>,
    pub result: Option<String>,
    pub win_margin: Option<String>,
    pub toss_text: Option<String>,
    pub toss_decision: Option<String>,
    pub umpires: Option<String>,
    pub referee: Option<String>,
    pub team_a_id: Option<i64>,
    pub team_b_id: Option<i64>,
    pub venue_id: Option<i64>,
    pub winning_team_id: Option<i64>,
    pub toss_winner_id: Option<i64>,
    pub man_of_the_match_id: Option<i64>,
}

/// Insert payload for a match upsert.
#[derive(Debug, Clone)]
pub struct NewMatch {
    pub match_id: i64,
    pub title: String,
    pub short_title: Option<String>,
    pub subtitle: Option<String>,
    pub match_number: Option<String>,
    pub format: String,
    pub status: Option<String>,
    pub status_note: Option<String>,
    pub date_start: Option<NaiveDateTime>,
    pub date_end: Option<NaiveDateTime>,
    pub result: Option<String>,
    pub win_margin: Option<String>,
    pub toss_text: Option<String>,
    pub toss_decision: Option<String>,
    pub umpires: Option<String>,
    pub referee: Option<String>,
    pub team_a_id: Option<i64>,
    pub team_b_id: Option<i64>,
    pub venue_id: Option<i64>,
    pub winning_team_id: Option<i64>,
    pub toss_winner_id: Option<i64>,
    pub man_of_the_match_id: Option<i64>,
}
