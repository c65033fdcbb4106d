use serde::Serialize;

/// A player, canonical across all squads that mention them.
///
/// `pid` is the natural key from the fixture source. Biographical fields are
/// nullable because squad records frequently omit them.
#[derive(Debug, Clone, Serialize)]
pub struct Player {
    pub id: i64,
    pub pid: i64,
    pub title: String,
    pub short_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub middle_name: Option<String>,
    pub birthdate: Option<String>,
    pub birthplace: Option<String>,
    pub country: Option<String>,
    pub playing_role: Option<String>,
    pub batting_style: Option<String>,
    pub bowling_style: Option<String>,
    pub fielding_position: Option<String>,
    pub nationality: Option<String>,
    pub fantasy_rating: Option<f64>,
}

/// Insert payload for a player upsert.
#[derive(Debug, Clone)]
pub struct NewPlayer {
    pub pid: i64,
    pub title: String,
    pub short_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub middle_name: Option<String>,
    pub birthdate: Option<String>,
    pub birthplace: Option<String>,
    pub country: Option<String>,
    pub playing_role: Option<String>,
    pub batting_style: Option<String>,
    pub bowling_style: Option<String>,
    pub fielding_position: Option<String>,
    pub nationality: Option<String>,
    pub fantasy_rating: Option<f64>,
}
