//! Filtered, paginated finds and joined shaping over the store.
//!
//! List queries take a limit/offset pair computed by the API layer; detail
//! queries return `None` for unknown ids so routes can map that to 404.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::{params, OptionalExtension, Row};
use serde::Serialize;

use crate::models::{
    BattingPerformance, BowlingPerformance, Innings, Match, Player, Standing, Team, Venue,
};

use super::Database;

const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";

const TEAM_COLS: &str = "id, tid, title, abbreviation, logo_url, thumb_url, country, sex";

const PLAYER_COLS: &str = "id, pid, title, short_name, first_name, last_name, middle_name, \
                           birthdate, birthplace, country, playing_role, batting_style, \
                           bowling_style, fielding_position, nationality, fantasy_rating";

const VENUE_COLS: &str = "id, venue_id, name, location, country, timezone";

const MATCH_COLS: &str = "id, match_id, title, short_title, subtitle, match_number, format, \
                          status, status_note, date_start, date_end, result, win_margin, \
                          toss_text, toss_decision, umpires, referee, team_a_id, team_b_id, \
                          venue_id, winning_team_id, toss_winner_id, man_of_the_match_id";

const INNINGS_COLS: &str = "id, iid, match_id, innings_number, name, short_name, status, \
                            total_runs, total_wickets, total_overs, run_rate, target, \
                            extras_byes, extras_legbyes, extras_wides, extras_noballs, \
                            extras_total, batting_team_id, fielding_team_id";

const BATTING_COLS: &str = "id, innings_id, player_id, runs, balls_faced, fours, sixes, \
                            strike_rate, how_out, dismissal, position, bowler_id";

const BOWLING_COLS: &str = "id, innings_id, player_id, overs, maidens, runs_conceded, wickets, \
                            economy, no_balls, wides, dot_balls";

const STANDING_COLS: &str = "id, team_id, round, played, wins, losses, ties, no_result, points, \
                             net_run_rate, position";

pub(crate) fn map_team(row: &Row) -> rusqlite::Result<Team> {
    Ok(Team {
        id: row.get(0)?,
        tid: row.get(1)?,
        title: row.get(2)?,
        abbreviation: row.get(3)?,
        logo_url: row.get(4)?,
        thumb_url: row.get(5)?,
        country: row.get(6)?,
        sex: row.get(7)?,
    })
}

pub(crate) fn map_player(row: &Row) -> rusqlite::Result<Player> {
    Ok(Player {
        id: row.get(0)?,
        pid: row.get(1)?,
        title: row.get(2)?,
        short_name: row.get(3)?,
        first_name: row.get(4)?,
        last_name: row.get(5)?,
        middle_name: row.get(6)?,
        birthdate: row.get(7)?,
        birthplace: row.get(8)?,
        country: row.get(9)?,
        playing_role: row.get(10)?,
        batting_style: row.get(11)?,
        bowling_style: row.get(12)?,
        fielding_position: row.get(13)?,
        nationality: row.get(14)?,
        fantasy_rating: row.get(15)?,
    })
}

pub(crate) fn map_venue(row: &Row) -> rusqlite::Result<Venue> {
    Ok(Venue {
        id: row.get(0)?,
        venue_id: row.get(1)?,
        name: row.get(2)?,
        location: row.get(3)?,
        country: row.get(4)?,
        timezone: row.get(5)?,
    })
}

fn parse_datetime(text: Option<String>) -> Option<NaiveDateTime> {
    text.and_then(|s| NaiveDateTime::parse_from_str(&s, DATETIME_FMT).ok())
}

pub(crate) fn map_match(row: &Row) -> rusqlite::Result<Match> {
    Ok(Match {
        id: row.get(0)?,
        match_id: row.get(1)?,
        title: row.get(2)?,
        short_title: row.get(3)?,
        subtitle: row.get(4)?,
        match_number: row.get(5)?,
        format: row.get(6)?,
        status: row.get(7)?,
        status_note: row.get(8)?,
        date_start: parse_datetime(row.get(9)?),
        date_end: parse_datetime(row.get(10)?),
        result: row.get(11)?,
        win_margin: row.get(12)?,
        toss_text: row.get(13)?,
        toss_decision: row.get(14)?,
        umpires: row.get(15)?,
        referee: row.get(16)?,
        team_a_id: row.get(17)?,
        team_b_id: row.get(18)?,
        venue_id: row.get(19)?,
        winning_team_id: row.get(20)?,
        toss_winner_id: row.get(21)?,
        man_of_the_match_id: row.get(22)?,
    })
}

pub(crate) fn map_innings(row: &Row) -> rusqlite::Result<Innings> {
    Ok(Innings {
        id: row.get(0)?,
        iid: row.get(1)?,
        match_id: row.get(2)?,
        innings_number: row.get(3)?,
        name: row.get(4)?,
        short_name: row.get(5)?,
        status: row.get(6)?,
        total_runs: row.get(7)?,
        total_wickets: row.get(8)?,
        total_overs: row.get(9)?,
        run_rate: row.get(10)?,
        target: row.get(11)?,
        extras_byes: row.get(12)?,
        extras_legbyes: row.get(13)?,
        extras_wides: row.get(14)?,
        extras_noballs: row.get(15)?,
        extras_total: row.get(16)?,
        batting_team_id: row.get(17)?,
        fielding_team_id: row.get(18)?,
    })
}

pub(crate) fn map_batting(row: &Row) -> rusqlite::Result<BattingPerformance> {
    Ok(BattingPerformance {
        id: row.get(0)?,
        innings_id: row.get(1)?,
        player_id: row.get(2)?,
        runs: row.get(3)?,
        balls_faced: row.get(4)?,
        fours: row.get(5)?,
        sixes: row.get(6)?,
        strike_rate: row.get(7)?,
        how_out: row.get(8)?,
        dismissal: row.get(9)?,
        position: row.get(10)?,
        bowler_id: row.get(11)?,
    })
}

pub(crate) fn map_bowling(row: &Row) -> rusqlite::Result<BowlingPerformance> {
    Ok(BowlingPerformance {
        id: row.get(0)?,
        innings_id: row.get(1)?,
        player_id: row.get(2)?,
        overs: row.get(3)?,
        maidens: row.get(4)?,
        runs_conceded: row.get(5)?,
        wickets: row.get(6)?,
        economy: row.get(7)?,
        no_balls: row.get(8)?,
        wides: row.get(9)?,
        dot_balls: row.get(10)?,
    })
}

pub(crate) fn map_standing(row: &Row) -> rusqlite::Result<Standing> {
    Ok(Standing {
        id: row.get(0)?,
        team_id: row.get(1)?,
        round: row.get(2)?,
        played: row.get(3)?,
        wins: row.get(4)?,
        losses: row.get(5)?,
        ties: row.get(6)?,
        no_result: row.get(7)?,
        points: row.get(8)?,
        net_run_rate: row.get(9)?,
        position: row.get(10)?,
    })
}

// ── Shaped results ──────────────────────────────────────────────

/// A player flattened with their join-table role annotations.
#[derive(Debug, Serialize)]
pub struct SquadMember {
    #[serde(flatten)]
    pub player: Player,
    pub role: Option<String>,
    pub role_str: Option<String>,
}

/// A team flattened with its join-table role annotations, from a player's
/// point of view.
#[derive(Debug, Serialize)]
pub struct TeamMembership {
    pub team: Team,
    pub role: Option<String>,
    pub role_str: Option<String>,
}

/// Team detail: squad and latest standing inlined.
#[derive(Debug, Serialize)]
pub struct TeamDetail {
    #[serde(flatten)]
    pub team: Team,
    pub players: Vec<SquadMember>,
    pub standing: Option<Standing>,
}

/// A match with its entity references resolved, for list endpoints.
#[derive(Debug, Serialize)]
pub struct MatchSummary {
    #[serde(flatten)]
    pub match_row: Match,
    pub team_a: Option<Team>,
    pub team_b: Option<Team>,
    pub venue: Option<Venue>,
    pub winning_team: Option<Team>,
    pub man_of_the_match: Option<Player>,
}

/// A batting line with its player (and the credited bowler) joined in.
#[derive(Debug, Serialize)]
pub struct BattingEntry {
    #[serde(flatten)]
    pub performance: BattingPerformance,
    pub player: Player,
    pub bowler: Option<Player>,
}

/// A bowling line with its player joined in.
#[derive(Debug, Serialize)]
pub struct BowlingEntry {
    #[serde(flatten)]
    pub performance: BowlingPerformance,
    pub player: Player,
}

/// An innings with teams and both performance lists inlined.
#[derive(Debug, Serialize)]
pub struct InningsDetail {
    #[serde(flatten)]
    pub innings: Innings,
    pub batting_team: Option<Team>,
    pub fielding_team: Option<Team>,
    pub batting_performances: Vec<BattingEntry>,
    pub bowling_performances: Vec<BowlingEntry>,
}

/// Full match detail: every reference resolved plus the complete scorecard.
#[derive(Debug, Serialize)]
pub struct MatchDetail {
    #[serde(flatten)]
    pub match_row: Match,
    pub team_a: Option<Team>,
    pub team_b: Option<Team>,
    pub venue: Option<Venue>,
    pub winning_team: Option<Team>,
    pub toss_winner: Option<Team>,
    pub man_of_the_match: Option<Player>,
    pub innings: Vec<InningsDetail>,
}

/// A performance with its innings and match context, for player logs.
#[derive(Debug, Serialize)]
pub struct BattingLogEntry {
    #[serde(flatten)]
    pub performance: BattingPerformance,
    pub innings: Innings,
    #[serde(rename = "match")]
    pub match_row: Match,
}

/// Bowling counterpart of [`BattingLogEntry`].
#[derive(Debug, Serialize)]
pub struct BowlingLogEntry {
    #[serde(flatten)]
    pub performance: BowlingPerformance,
    pub innings: Innings,
    #[serde(rename = "match")]
    pub match_row: Match,
}

/// A venue with the number of matches hosted there.
#[derive(Debug, Serialize)]
pub struct VenueWithCount {
    #[serde(flatten)]
    pub venue: Venue,
    pub match_count: i64,
}

/// Filters accepted by the players list endpoint.
#[derive(Debug, Default, Clone)]
pub struct PlayerFilter {
    pub role: Option<String>,
    pub country: Option<String>,
    pub search: Option<String>,
}

/// Filters accepted by the matches list endpoint.
#[derive(Debug, Default, Clone)]
pub struct MatchFilter {
    pub team_id: Option<i64>,
    pub venue_id: Option<i64>,
}

impl Database {
    // ── Teams ───────────────────────────────────────────────────

    pub fn count_teams(&self) -> Result<i64> {
        self.count_rows("teams")
    }

    pub fn list_teams(&self, limit: u32, offset: u32) -> Result<Vec<Team>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {TEAM_COLS} FROM teams ORDER BY title LIMIT ?1 OFFSET ?2"
            ))
            .context("failed to prepare teams query")?;
        let teams = stmt
            .query_map(params![limit, offset], map_team)
            .context("failed to query teams")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map team rows")?;
        Ok(teams)
    }

    pub fn team_by_id(&self, id: i64) -> Result<Option<Team>> {
        let conn = self.conn();
        let team = conn
            .query_row(
                &format!("SELECT {TEAM_COLS} FROM teams WHERE id = ?1"),
                params![id],
                map_team,
            )
            .optional()
            .context("failed to fetch team")?;
        Ok(team)
    }

    fn maybe_team(&self, id: Option<i64>) -> Result<Option<Team>> {
        match id {
            Some(id) => self.team_by_id(id),
            None => Ok(None),
        }
    }

    fn maybe_player(&self, id: Option<i64>) -> Result<Option<Player>> {
        match id {
            Some(id) => self.player_by_id(id),
            None => Ok(None),
        }
    }

    fn maybe_venue(&self, id: Option<i64>) -> Result<Option<Venue>> {
        match id {
            Some(id) => self.venue_by_id(id),
            None => Ok(None),
        }
    }

    /// Squad members of a team, players flattened with their join roles.
    pub fn squad_for_team(&self, team_id: i64) -> Result<Vec<SquadMember>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {cols}, tp.role, tp.role_str
                 FROM team_players tp
                 JOIN players p ON p.id = tp.player_id
                 WHERE tp.team_id = ?1
                 ORDER BY p.title",
                cols = prefixed(PLAYER_COLS, "p"),
            ))
            .context("failed to prepare squad query")?;
        let members = stmt
            .query_map(params![team_id], |row| {
                Ok(SquadMember {
                    player: map_player(row)?,
                    role: row.get(16)?,
                    role_str: row.get(17)?,
                })
            })
            .context("failed to query squad")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map squad rows")?;
        Ok(members)
    }

    /// Team memberships of a player.
    pub fn memberships_for_player(&self, player_id: i64) -> Result<Vec<TeamMembership>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {cols}, tp.role, tp.role_str
                 FROM team_players tp
                 JOIN teams t ON t.id = tp.team_id
                 WHERE tp.player_id = ?1
                 ORDER BY t.title",
                cols = prefixed(TEAM_COLS, "t"),
            ))
            .context("failed to prepare memberships query")?;
        let memberships = stmt
            .query_map(params![player_id], |row| {
                Ok(TeamMembership {
                    team: map_team(row)?,
                    role: row.get(8)?,
                    role_str: row.get(9)?,
                })
            })
            .context("failed to query memberships")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map membership rows")?;
        Ok(memberships)
    }

    /// A team's most recent standings row (rounds sort lexicographically,
    /// which is what the source data expects).
    pub fn latest_standing_for_team(&self, team_id: i64) -> Result<Option<Standing>> {
        let conn = self.conn();
        let standing = conn
            .query_row(
                &format!(
                    "SELECT {STANDING_COLS} FROM standings
                     WHERE team_id = ?1 ORDER BY round DESC LIMIT 1"
                ),
                params![team_id],
                map_standing,
            )
            .optional()
            .context("failed to fetch latest standing")?;
        Ok(standing)
    }

    /// Team detail with squad and latest standing; `None` for unknown ids.
    pub fn team_detail(&self, id: i64) -> Result<Option<TeamDetail>> {
        let Some(team) = self.team_by_id(id)? else {
            return Ok(None);
        };
        let players = self.squad_for_team(id)?;
        let standing = self.latest_standing_for_team(id)?;
        Ok(Some(TeamDetail {
            team,
            players,
            standing,
        }))
    }

    // ── Players ─────────────────────────────────────────────────

    pub fn count_players(&self, filter: &PlayerFilter) -> Result<i64> {
        let conn = self.conn();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM players
                 WHERE (?1 IS NULL OR playing_role = ?1)
                   AND (?2 IS NULL OR country = ?2)
                   AND (?3 IS NULL
                        OR instr(lower(title), lower(?3)) > 0
                        OR instr(lower(coalesce(short_name, '')), lower(?3)) > 0)",
                params![filter.role, filter.country, filter.search],
                |row| row.get(0),
            )
            .context("failed to count players")?;
        Ok(count)
    }

    pub fn list_players(
        &self,
        filter: &PlayerFilter,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Player>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {PLAYER_COLS} FROM players
                 WHERE (?1 IS NULL OR playing_role = ?1)
                   AND (?2 IS NULL OR country = ?2)
                   AND (?3 IS NULL
                        OR instr(lower(title), lower(?3)) > 0
                        OR instr(lower(coalesce(short_name, '')), lower(?3)) > 0)
                 ORDER BY title LIMIT ?4 OFFSET ?5"
            ))
            .context("failed to prepare players query")?;
        let players = stmt
            .query_map(
                params![filter.role, filter.country, filter.search, limit, offset],
                map_player,
            )
            .context("failed to query players")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map player rows")?;
        Ok(players)
    }

    pub fn player_by_id(&self, id: i64) -> Result<Option<Player>> {
        let conn = self.conn();
        let player = conn
            .query_row(
                &format!("SELECT {PLAYER_COLS} FROM players WHERE id = ?1"),
                params![id],
                map_player,
            )
            .optional()
            .context("failed to fetch player")?;
        Ok(player)
    }

    // ── Performance logs ────────────────────────────────────────

    pub fn count_batting_for_player(&self, player_id: i64) -> Result<i64> {
        let conn = self.conn();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM batting_performances WHERE player_id = ?1",
                params![player_id],
                |row| row.get(0),
            )
            .context("failed to count batting performances")?;
        Ok(count)
    }

    pub fn count_bowling_for_player(&self, player_id: i64) -> Result<i64> {
        let conn = self.conn();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM bowling_performances WHERE player_id = ?1",
                params![player_id],
                |row| row.get(0),
            )
            .context("failed to count bowling performances")?;
        Ok(count)
    }

    /// A player's batting lines with innings and match context, newest
    /// match first.
    pub fn batting_log(
        &self,
        player_id: i64,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<BattingLogEntry>> {
        let performances = {
            let conn = self.conn();
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {cols} FROM batting_performances bp
                     JOIN innings i ON i.id = bp.innings_id
                     JOIN matches m ON m.id = i.match_id
                     WHERE bp.player_id = ?1
                     ORDER BY m.date_start DESC
                     LIMIT ?2 OFFSET ?3",
                    cols = prefixed(BATTING_COLS, "bp"),
                ))
                .context("failed to prepare batting log query")?;
            let rows = stmt
                .query_map(params![player_id, limit, offset], map_batting)
                .context("failed to query batting log")?
                .collect::<std::result::Result<Vec<_>, _>>()
                .context("failed to map batting log rows")?;
            rows
        };
        self.attach_performance_context(performances, |p| p.innings_id, |p, i, m| BattingLogEntry {
            performance: p,
            innings: i,
            match_row: m,
        })
    }

    /// A player's bowling lines with innings and match context, newest
    /// match first.
    pub fn bowling_log(
        &self,
        player_id: i64,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<BowlingLogEntry>> {
        let performances = {
            let conn = self.conn();
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {cols} FROM bowling_performances bp
                     JOIN innings i ON i.id = bp.innings_id
                     JOIN matches m ON m.id = i.match_id
                     WHERE bp.player_id = ?1
                     ORDER BY m.date_start DESC
                     LIMIT ?2 OFFSET ?3",
                    cols = prefixed(BOWLING_COLS, "bp"),
                ))
                .context("failed to prepare bowling log query")?;
            let rows = stmt
                .query_map(params![player_id, limit, offset], map_bowling)
                .context("failed to query bowling log")?
                .collect::<std::result::Result<Vec<_>, _>>()
                .context("failed to map bowling log rows")?;
            rows
        };
        self.attach_performance_context(performances, |p| p.innings_id, |p, i, m| BowlingLogEntry {
            performance: p,
            innings: i,
            match_row: m,
        })
    }

    fn attach_performance_context<P, E>(
        &self,
        performances: Vec<P>,
        innings_id: impl Fn(&P) -> i64,
        build: impl Fn(P, Innings, Match) -> E,
    ) -> Result<Vec<E>> {
        let mut entries = Vec::with_capacity(performances.len());
        for perf in performances {
            let Some(innings) = self.innings_by_id(innings_id(&perf))? else {
                continue;
            };
            let Some(match_row) = self.match_by_id(innings.match_id)? else {
                continue;
            };
            entries.push(build(perf, innings, match_row));
        }
        Ok(entries)
    }

    // ── Matches ─────────────────────────────────────────────────

    pub fn count_matches(&self, filter: &MatchFilter) -> Result<i64> {
        let conn = self.conn();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM matches
                 WHERE (?1 IS NULL OR team_a_id = ?1 OR team_b_id = ?1)
                   AND (?2 IS NULL OR venue_id = ?2)",
                params![filter.team_id, filter.venue_id],
                |row| row.get(0),
            )
            .context("failed to count matches")?;
        Ok(count)
    }

    pub fn list_matches(
        &self,
        filter: &MatchFilter,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Match>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {MATCH_COLS} FROM matches
                 WHERE (?1 IS NULL OR team_a_id = ?1 OR team_b_id = ?1)
                   AND (?2 IS NULL OR venue_id = ?2)
                 ORDER BY date_start DESC
                 LIMIT ?3 OFFSET ?4"
            ))
            .context("failed to prepare matches query")?;
        let matches = stmt
            .query_map(
                params![filter.team_id, filter.venue_id, limit, offset],
                map_match,
            )
            .context("failed to query matches")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map match rows")?;
        Ok(matches)
    }

    pub fn match_by_id(&self, id: i64) -> Result<Option<Match>> {
        let conn = self.conn();
        let m = conn
            .query_row(
                &format!("SELECT {MATCH_COLS} FROM matches WHERE id = ?1"),
                params![id],
                map_match,
            )
            .optional()
            .context("failed to fetch match")?;
        Ok(m)
    }

    /// Resolve a match row's entity references for list responses.
    pub fn match_summary(&self, match_row: Match) -> Result<MatchSummary> {
        let team_a = self.maybe_team(match_row.team_a_id)?;
        let team_b = self.maybe_team(match_row.team_b_id)?;
        let venue = self.maybe_venue(match_row.venue_id)?;
        let winning_team = self.maybe_team(match_row.winning_team_id)?;
        let man_of_the_match = self.maybe_player(match_row.man_of_the_match_id)?;
        Ok(MatchSummary {
            match_row,
            team_a,
            team_b,
            venue,
            winning_team,
            man_of_the_match,
        })
    }

    /// Full match detail with the complete scorecard; `None` for unknown
    /// ids.
    pub fn match_detail(&self, id: i64) -> Result<Option<MatchDetail>> {
        let Some(match_row) = self.match_by_id(id)? else {
            return Ok(None);
        };
        let team_a = self.maybe_team(match_row.team_a_id)?;
        let team_b = self.maybe_team(match_row.team_b_id)?;
        let venue = self.maybe_venue(match_row.venue_id)?;
        let winning_team = self.maybe_team(match_row.winning_team_id)?;
        let toss_winner = self.maybe_team(match_row.toss_winner_id)?;
        let man_of_the_match = self.maybe_player(match_row.man_of_the_match_id)?;

        let mut innings = Vec::new();
        for row in self.innings_for_match(id)? {
            innings.push(self.innings_detail(row, false)?);
        }

        Ok(Some(MatchDetail {
            match_row,
            team_a,
            team_b,
            venue,
            winning_team,
            toss_winner,
            man_of_the_match,
            innings,
        }))
    }

    // ── Innings & scorecards ────────────────────────────────────

    pub fn innings_by_id(&self, id: i64) -> Result<Option<Innings>> {
        let conn = self.conn();
        let innings = conn
            .query_row(
                &format!("SELECT {INNINGS_COLS} FROM innings WHERE id = ?1"),
                params![id],
                map_innings,
            )
            .optional()
            .context("failed to fetch innings")?;
        Ok(innings)
    }

    /// All innings of a match, ordered by innings number.
    pub fn innings_for_match(&self, match_row_id: i64) -> Result<Vec<Innings>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {INNINGS_COLS} FROM innings
                 WHERE match_id = ?1 ORDER BY innings_number"
            ))
            .context("failed to prepare innings query")?;
        let innings = stmt
            .query_map(params![match_row_id], map_innings)
            .context("failed to query innings")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map innings rows")?;
        Ok(innings)
    }

    /// Shape one innings with teams and both performance lists. The
    /// scorecard endpoint orders bowlers by wickets; the match detail keeps
    /// insertion order.
    pub fn innings_detail(&self, innings: Innings, bowling_by_wickets: bool) -> Result<InningsDetail> {
        let batting_team = self.maybe_team(innings.batting_team_id)?;
        let fielding_team = self.maybe_team(innings.fielding_team_id)?;
        let batting_performances = self.batting_entries(innings.id)?;
        let bowling_performances = self.bowling_entries(innings.id, bowling_by_wickets)?;
        Ok(InningsDetail {
            innings,
            batting_team,
            fielding_team,
            batting_performances,
            bowling_performances,
        })
    }

    /// Batting lines of an innings in batting-order position, players
    /// joined in.
    pub fn batting_entries(&self, innings_id: i64) -> Result<Vec<BattingEntry>> {
        let performances = {
            let conn = self.conn();
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {BATTING_COLS} FROM batting_performances
                     WHERE innings_id = ?1 ORDER BY position"
                ))
                .context("failed to prepare batting entries query")?;
            let rows = stmt
                .query_map(params![innings_id], map_batting)
                .context("failed to query batting entries")?
                .collect::<std::result::Result<Vec<_>, _>>()
                .context("failed to map batting entry rows")?;
            rows
        };
        let mut entries = Vec::with_capacity(performances.len());
        for perf in performances {
            let Some(player) = self.player_by_id(perf.player_id)? else {
                continue;
            };
            let bowler = self.maybe_player(perf.bowler_id)?;
            entries.push(BattingEntry {
                performance: perf,
                player,
                bowler,
            });
        }
        Ok(entries)
    }

    /// Bowling lines of an innings, players joined in.
    pub fn bowling_entries(&self, innings_id: i64, by_wickets: bool) -> Result<Vec<BowlingEntry>> {
        let order = if by_wickets { "wickets DESC" } else { "id" };
        let performances = {
            let conn = self.conn();
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {BOWLING_COLS} FROM bowling_performances
                     WHERE innings_id = ?1 ORDER BY {order}"
                ))
                .context("failed to prepare bowling entries query")?;
            let rows = stmt
                .query_map(params![innings_id], map_bowling)
                .context("failed to query bowling entries")?
                .collect::<std::result::Result<Vec<_>, _>>()
                .context("failed to map bowling entry rows")?;
            rows
        };
        let mut entries = Vec::with_capacity(performances.len());
        for perf in performances {
            let Some(player) = self.player_by_id(perf.player_id)? else {
                continue;
            };
            entries.push(BowlingEntry {
                performance: perf,
                player,
            });
        }
        Ok(entries)
    }

    // ── Venues ──────────────────────────────────────────────────

    pub fn venue_by_id(&self, id: i64) -> Result<Option<Venue>> {
        let conn = self.conn();
        let venue = conn
            .query_row(
                &format!("SELECT {VENUE_COLS} FROM venues WHERE id = ?1"),
                params![id],
                map_venue,
            )
            .optional()
            .context("failed to fetch venue")?;
        Ok(venue)
    }

    /// All venues ordered by name, each with its hosted-match count.
    pub fn venues_with_counts(&self) -> Result<Vec<VenueWithCount>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {cols}, COUNT(m.id)
                 FROM venues v
                 LEFT JOIN matches m ON m.venue_id = v.id
                 GROUP BY v.id
                 ORDER BY v.name",
                cols = prefixed(VENUE_COLS, "v"),
            ))
            .context("failed to prepare venues query")?;
        let venues = stmt
            .query_map([], |row| {
                Ok(VenueWithCount {
                    venue: map_venue(row)?,
                    match_count: row.get(6)?,
                })
            })
            .context("failed to query venues")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map venue rows")?;
        Ok(venues)
    }
}

/// Prefix every column in a column list with a table alias.
fn prefixed(cols: &str, alias: &str) -> String {
    cols.split(',')
        .map(|c| format!("{alias}.{}", c.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::super::tests::*;
    use super::*;
    use crate::models::NewVenue;

    #[test]
    fn list_teams_ordered_and_paginated() {
        let db = test_db();
        db.upsert_team(&sample_team(103, "Royal Challengers")).unwrap();
        db.upsert_team(&sample_team(101, "Chennai Super Kings")).unwrap();
        db.upsert_team(&sample_team(102, "Mumbai Indians")).unwrap();

        let page = db.list_teams(2, 0).unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].title, "Chennai Super Kings");
        assert_eq!(page[1].title, "Mumbai Indians");

        let rest = db.list_teams(2, 2).unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].title, "Royal Challengers");
    }

    #[test]
    fn player_filters_compose() {
        let db = test_db();
        let mut p1 = sample_player(1, "Jasprit Bumrah");
        p1.playing_role = Some("bowl".to_string());
        let mut p2 = sample_player(2, "Jos Buttler");
        p2.country = Some("en".to_string());
        let p3 = sample_player(3, "Shubman Gill");
        db.upsert_player(&p1).unwrap();
        db.upsert_player(&p2).unwrap();
        db.upsert_player(&p3).unwrap();

        let bowlers = PlayerFilter {
            role: Some("bowl".to_string()),
            ..Default::default()
        };
        assert_eq!(db.count_players(&bowlers).unwrap(), 1);

        let english = PlayerFilter {
            country: Some("en".to_string()),
            ..Default::default()
        };
        assert_eq!(db.count_players(&english).unwrap(), 1);

        // Case-insensitive substring over title and short name.
        let search = PlayerFilter {
            search: Some("BU".to_string()),
            ..Default::default()
        };
        let found = db.list_players(&search, 10, 0).unwrap();
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn match_filter_covers_both_sides() {
        let db = test_db();
        let team_a = db.upsert_team(&sample_team(101, "Chennai Super Kings")).unwrap();
        let team_b = db.upsert_team(&sample_team(102, "Mumbai Indians")).unwrap();
        db.upsert_match(&sample_match(9001, Some(team_a), Some(team_b))).unwrap();
        db.upsert_match(&sample_match(9002, Some(team_b), None)).unwrap();

        let filter = MatchFilter {
            team_id: Some(team_a),
            venue_id: None,
        };
        assert_eq!(db.count_matches(&filter).unwrap(), 1);

        let filter_b = MatchFilter {
            team_id: Some(team_b),
            venue_id: None,
        };
        assert_eq!(db.count_matches(&filter_b).unwrap(), 2);
    }

    #[test]
    fn match_detail_resolves_references_and_scorecard() {
        let db = test_db();
        let team_a = db.upsert_team(&sample_team(101, "Chennai Super Kings")).unwrap();
        let team_b = db.upsert_team(&sample_team(102, "Mumbai Indians")).unwrap();
        let match_id = db.upsert_match(&sample_match(9001, Some(team_a), Some(team_b))).unwrap();
        let innings_id = db.upsert_innings(&sample_innings(1, match_id, 1)).unwrap();

        let bat1 = db.upsert_player(&sample_player(1, "Ruturaj Gaikwad")).unwrap();
        let bat2 = db.upsert_player(&sample_player(2, "Devon Conway")).unwrap();
        let bowl1 = db.upsert_player(&sample_player(3, "Jasprit Bumrah")).unwrap();
        let bowl2 = db.upsert_player(&sample_player(4, "Trent Boult")).unwrap();

        db.upsert_batting_performance(&sample_batting(innings_id, bat1, 50)).unwrap();
        let mut second = sample_batting(innings_id, bat2, 30);
        second.position = 2;
        db.upsert_batting_performance(&second).unwrap();
        db.upsert_bowling_performance(&sample_bowling(innings_id, bowl1, 2)).unwrap();
        db.upsert_bowling_performance(&sample_bowling(innings_id, bowl2, 1)).unwrap();

        let detail = db.match_detail(match_id).unwrap().unwrap();
        assert_eq!(detail.team_a.as_ref().unwrap().title, "Chennai Super Kings");
        assert_eq!(detail.innings.len(), 1);
        assert_eq!(detail.innings[0].batting_performances.len(), 2);
        assert_eq!(detail.innings[0].bowling_performances.len(), 2);
        // Batting order follows position.
        assert_eq!(detail.innings[0].batting_performances[0].player.title, "Ruturaj Gaikwad");
    }

    #[test]
    fn match_detail_unknown_id_is_none() {
        let db = test_db();
        assert!(db.match_detail(42).unwrap().is_none());
    }

    #[test]
    fn venues_carry_match_counts() {
        let db = test_db();
        let venue_id = db
            .upsert_venue(&NewVenue {
                venue_id: "v1".to_string(),
                name: "Wankhede Stadium".to_string(),
                location: Some("Mumbai".to_string()),
                country: Some("in".to_string()),
                timezone: None,
            })
            .unwrap();
        let mut m = sample_match(9001, None, None);
        m.venue_id = Some(venue_id);
        db.upsert_match(&m).unwrap();

        let venues = db.venues_with_counts().unwrap();
        assert_eq!(venues.len(), 1);
        assert_eq!(venues[0].match_count, 1);
    }

    #[test]
    fn scorecard_orders_bowlers_by_wickets() {
        let db = test_db();
        let match_id = db.upsert_match(&sample_match(9001, None, None)).unwrap();
        let innings_id = db.upsert_innings(&sample_innings(1, match_id, 1)).unwrap();
        let b1 = db.upsert_player(&sample_player(1, "Bowler One")).unwrap();
        let b2 = db.upsert_player(&sample_player(2, "Bowler Two")).unwrap();
        db.upsert_bowling_performance(&sample_bowling(innings_id, b1, 1)).unwrap();
        db.upsert_bowling_performance(&sample_bowling(innings_id, b2, 3)).unwrap();

        let entries = db.bowling_entries(innings_id, true).unwrap();
        assert_eq!(entries[0].performance.wickets, 3);
        assert_eq!(entries[1].performance.wickets, 1);
    }
}
