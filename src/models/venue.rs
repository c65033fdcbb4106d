use serde::Serialize;

/// A match venue, deduplicated by its external `venue_id`.
#[derive(Debug, Clone, Serialize)]
pub struct Venue {
    pub id: i64,
    pub venue_id: String,
    pub name: String,
    pub location: Option<String>,
    pub country: Option<String>,
    pub timezone: Option<String>,
}

/// Insert payload for a venue upsert.
#[derive(Debug, Clone)]
pub struct NewVenue {
    pub venue_id: String,
    pub name: String,
    pub location: Option<String>,
    pub country: Option<String>,
    pub timezone: Option<String>,
}
