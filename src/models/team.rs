use serde::Serialize;

/// A tournament team.
///
/// `tid` is the natural key carried over from the fixture source; `id` is
/// the store-assigned row id used by foreign keys.
#[derive(Debug, Clone, Serialize)]
pub struct Team {
    pub id: i64,
    pub tid: i64,
    pub title: String,
    pub abbreviation: String,
    pub logo_url: Option<String>,
    pub thumb_url: Option<String>,
    pub country: String,
    pub sex: String,
}

/// Insert payload for a team upsert.
#[derive(Debug, Clone)]
pub struct NewTeam {
    pub tid: i64,
    pub title: String,
    pub abbreviation: String,
    pub logo_url: Option<String>,
    pub thumb_url: Option<String>,
    pub country: String,
    pub sex: String,
}
