//! SQLite-backed relational store.
//!
//! Every entity carries a UNIQUE natural key from the fixture source, and
//! every write is an upsert keyed on it, so re-running ingestion against
//! unchanged fixtures leaves the store byte-for-byte identical. The API
//! layer only ever reads.

mod queries;
mod stats;

pub use queries::*;
pub use stats::*;

use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use crate::models::{
    NewBattingPerformance, NewBowlingPerformance, NewInnings, NewMatch, NewPlayer, NewStanding,
    NewTeam, NewVenue,
};

/// SQLite-backed store for teams, players, matches, innings, performances,
/// and standings.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) a SQLite database at `path` and ensure all tables
    /// exist. Pass `":memory:"` for an ephemeral in-memory database (useful
    /// for tests).
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;
             PRAGMA foreign_keys = ON;",
        )
        .context("failed to set database pragmas")?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS teams (
                id           INTEGER PRIMARY KEY AUTOINCREMENT,
                tid          INTEGER NOT NULL UNIQUE,
                title        TEXT NOT NULL,
                abbreviation TEXT NOT NULL,
                logo_url     TEXT,
                thumb_url    TEXT,
                country      TEXT NOT NULL DEFAULT 'in',
                sex          TEXT NOT NULL DEFAULT 'male'
            );

            CREATE TABLE IF NOT EXISTS players (
                id                INTEGER PRIMARY KEY AUTOINCREMENT,
                pid               INTEGER NOT NULL UNIQUE,
                title             TEXT NOT NULL,
                short_name        TEXT,
                first_name        TEXT,
                last_name         TEXT,
                middle_name       TEXT,
                birthdate         TEXT,
                birthplace        TEXT,
                country           TEXT,
                playing_role      TEXT,
                batting_style     TEXT,
                bowling_style     TEXT,
                fielding_position TEXT,
                nationality       TEXT,
                fantasy_rating    REAL
            );

            CREATE TABLE IF NOT EXISTS team_players (
                team_id   INTEGER NOT NULL REFERENCES teams(id),
                player_id INTEGER NOT NULL REFERENCES players(id),
                role      TEXT,
                role_str  TEXT,
                PRIMARY KEY (team_id, player_id)
            );

            CREATE TABLE IF NOT EXISTS venues (
                id       INTEGER PRIMARY KEY AUTOINCREMENT,
                venue_id TEXT NOT NULL UNIQUE,
                name     TEXT NOT NULL,
                location TEXT,
                country  TEXT,
                timezone TEXT
            );

            CREATE TABLE IF NOT EXISTS matches (
                id                  INTEGER PRIMARY KEY AUTOINCREMENT,
                match_id            INTEGER NOT NULL UNIQUE,
                title               TEXT NOT NULL,
                short_title         TEXT,
                subtitle            TEXT,
                match_number        TEXT,
                format              TEXT NOT NULL DEFAULT 'T20',
                status              TEXT,
                status_note         TEXT,
                date_start          TEXT,
                date_end            TEXT,
                result              TEXT,
                win_margin          TEXT,
                toss_text           TEXT,
                toss_decision       TEXT,
                umpires             TEXT,
                referee             TEXT,
                team_a_id           INTEGER REFERENCES teams(id),
                team_b_id           INTEGER REFERENCES teams(id),
                venue_id            INTEGER REFERENCES venues(id),
                winning_team_id     INTEGER REFERENCES teams(id),
                toss_winner_id      INTEGER REFERENCES teams(id),
                man_of_the_match_id INTEGER REFERENCES players(id)
            );

            CREATE TABLE IF NOT EXISTS innings (
                id               INTEGER PRIMARY KEY AUTOINCREMENT,
                iid              INTEGER NOT NULL UNIQUE,
                match_id         INTEGER NOT NULL REFERENCES matches(id),
                innings_number   INTEGER NOT NULL,
                name             TEXT,
                short_name       TEXT,
                status           TEXT,
                total_runs       INTEGER NOT NULL DEFAULT 0,
                total_wickets    INTEGER NOT NULL DEFAULT 0,
                total_overs      TEXT,
                run_rate         REAL,
                target           INTEGER,
                extras_byes      INTEGER NOT NULL DEFAULT 0,
                extras_legbyes   INTEGER NOT NULL DEFAULT 0,
                extras_wides     INTEGER NOT NULL DEFAULT 0,
                extras_noballs   INTEGER NOT NULL DEFAULT 0,
                extras_total     INTEGER NOT NULL DEFAULT 0,
                batting_team_id  INTEGER REFERENCES teams(id),
                fielding_team_id INTEGER REFERENCES teams(id)
            );

            CREATE TABLE IF NOT EXISTS batting_performances (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                innings_id  INTEGER NOT NULL REFERENCES innings(id),
                player_id   INTEGER NOT NULL REFERENCES players(id),
                runs        INTEGER NOT NULL DEFAULT 0,
                balls_faced INTEGER NOT NULL DEFAULT 0,
                fours       INTEGER NOT NULL DEFAULT 0,
                sixes       INTEGER NOT NULL DEFAULT 0,
                strike_rate REAL,
                how_out     TEXT,
                dismissal   TEXT,
                position    INTEGER NOT NULL,
                bowler_id   INTEGER REFERENCES players(id),
                UNIQUE (innings_id, player_id)
            );

            CREATE TABLE IF NOT EXISTS bowling_performances (
                id            INTEGER PRIMARY KEY AUTOINCREMENT,
                innings_id    INTEGER NOT NULL REFERENCES innings(id),
                player_id     INTEGER NOT NULL REFERENCES players(id),
                overs         TEXT,
                maidens       INTEGER NOT NULL DEFAULT 0,
                runs_conceded INTEGER NOT NULL DEFAULT 0,
                wickets       INTEGER NOT NULL DEFAULT 0,
                economy       REAL,
                no_balls      INTEGER NOT NULL DEFAULT 0,
                wides         INTEGER NOT NULL DEFAULT 0,
                dot_balls     INTEGER NOT NULL DEFAULT 0,
                UNIQUE (innings_id, player_id)
            );

            CREATE TABLE IF NOT EXISTS standings (
                id           INTEGER PRIMARY KEY AUTOINCREMENT,
                team_id      INTEGER NOT NULL REFERENCES teams(id),
                round        TEXT NOT NULL,
                played       INTEGER NOT NULL DEFAULT 0,
                wins         INTEGER NOT NULL DEFAULT 0,
                losses       INTEGER NOT NULL DEFAULT 0,
                ties         INTEGER NOT NULL DEFAULT 0,
                no_result    INTEGER NOT NULL DEFAULT 0,
                points       INTEGER NOT NULL DEFAULT 0,
                net_run_rate REAL,
                position     INTEGER,
                UNIQUE (team_id, round)
            );
            ",
        )
        .context("failed to create database schema")?;

        // Leaderboards group performance rows by player; the UNIQUE index on
        // (innings_id, player_id) is ordered innings-first so it cannot serve
        // player-keyed scans.
        conn.execute_batch(
            "CREATE INDEX IF NOT EXISTS idx_batting_player ON batting_performances(player_id);
             CREATE INDEX IF NOT EXISTS idx_bowling_player ON bowling_performances(player_id);",
        )
        .context("failed to create performance indexes")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the database connection.
    ///
    /// Panics if the mutex is poisoned (another thread panicked while
    /// holding the lock). This should never happen in normal operation.
    pub(crate) fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("database mutex poisoned")
    }

    // ------------------------------------------------------------------
    // Natural-key upserts
    // ------------------------------------------------------------------

    /// Insert a team or update the existing row for the same `tid`.
    /// Returns the team's row id in a single atomic statement.
    pub fn upsert_team(&self, team: &NewTeam) -> Result<i64> {
        let conn = self.conn();
        let id: i64 = conn
            .query_row(
                "INSERT INTO teams (tid, title, abbreviation, logo_url, thumb_url, country, sex)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(tid) DO UPDATE SET
                    title        = excluded.title,
                    abbreviation = excluded.abbreviation,
                    logo_url     = excluded.logo_url,
                    thumb_url    = excluded.thumb_url,
                    country      = excluded.country,
                    sex          = excluded.sex
                 RETURNING id",
                params![
                    team.tid,
                    team.title,
                    team.abbreviation,
                    team.logo_url,
                    team.thumb_url,
                    team.country,
                    team.sex,
                ],
                |row| row.get(0),
            )
            .context("failed to upsert team")?;
        Ok(id)
    }

    /// Insert a player or update the existing row for the same `pid`.
    pub fn upsert_player(&self, player: &NewPlayer) -> Result<i64> {
        let conn = self.conn();
        let id: i64 = conn
            .query_row(
                "INSERT INTO players (pid, title, short_name, first_name, last_name, middle_name,
                                      birthdate, birthplace, country, playing_role, batting_style,
                                      bowling_style, fielding_position, nationality, fantasy_rating)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
                 ON CONFLICT(pid) DO UPDATE SET
                    title             = excluded.title,
                    short_name        = excluded.short_name,
                    first_name        = excluded.first_name,
                    last_name         = excluded.last_name,
                    middle_name       = excluded.middle_name,
                    birthdate         = excluded.birthdate,
                    birthplace        = excluded.birthplace,
                    country           = excluded.country,
                    playing_role      = excluded.playing_role,
                    batting_style     = excluded.batting_style,
                    bowling_style     = excluded.bowling_style,
                    fielding_position = excluded.fielding_position,
                    nationality       = excluded.nationality,
                    fantasy_rating    = excluded.fantasy_rating
                 RETURNING id",
                params![
                    player.pid,
                    player.title,
                    player.short_name,
                    player.first_name,
                    player.last_name,
                    player.middle_name,
                    player.birthdate,
                    player.birthplace,
                    player.country,
                    player.playing_role,
                    player.batting_style,
                    player.bowling_style,
                    player.fielding_position,
                    player.nationality,
                    player.fantasy_rating,
                ],
                |row| row.get(0),
            )
            .context("failed to upsert player")?;
        Ok(id)
    }

    /// Record a team/player membership. Uses INSERT OR IGNORE so a repeated
    /// sighting of the same (team, player) pair is already-satisfied, not an
    /// error.
    pub fn upsert_team_player(
        &self,
        team_id: i64,
        player_id: i64,
        role: Option<&str>,
        role_str: Option<&str>,
    ) -> Result<()> {
        let conn = self.conn();
        conn.execute(
            "INSERT OR IGNORE INTO team_players (team_id, player_id, role, role_str)
             VALUES (?1, ?2, ?3, ?4)",
            params![team_id, player_id, role, role_str],
        )
        .context("failed to upsert team membership")?;
        Ok(())
    }

    /// Insert a venue or update the existing row for the same `venue_id`.
    pub fn upsert_venue(&self, venue: &NewVenue) -> Result<i64> {
        let conn = self.conn();
        let id: i64 = conn
            .query_row(
                "INSERT INTO venues (venue_id, name, location, country, timezone)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(venue_id) DO UPDATE SET
                    name     = excluded.name,
                    location = excluded.location,
                    country  = excluded.country,
                    timezone = excluded.timezone
                 RETURNING id",
                params![
                    venue.venue_id,
                    venue.name,
                    venue.location,
                    venue.country,
                    venue.timezone,
                ],
                |row| row.get(0),
            )
            .context("failed to upsert venue")?;
        Ok(id)
    }

    /// Insert a match or update the existing row for the same `match_id`.
    pub fn upsert_match(&self, m: &NewMatch) -> Result<i64> {
        let conn = self.conn();
        let id: i64 = conn
            .query_row(
                "INSERT INTO matches (match_id, title, short_title, subtitle, match_number, format,
                                      status, status_note, date_start, date_end, result, win_margin,
                                      toss_text, toss_decision, umpires, referee, team_a_id,
                                      team_b_id, venue_id, winning_team_id, toss_winner_id,
                                      man_of_the_match_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16,
                         ?17, ?18, ?19, ?20, ?21, ?22)
                 ON CONFLICT(match_id) DO UPDATE SET
                    title               = excluded.title,
                    short_title         = excluded.short_title,
                    subtitle            = excluded.subtitle,
                    match_number        = excluded.match_number,
                    format              = excluded.format,
                    status              = excluded.status,
                    status_note         = excluded.status_note,
                    date_start          = excluded.date_start,
                    date_end            = excluded.date_end,
                    result              = excluded.result,
                    win_margin          = excluded.win_margin,
                    toss_text           = excluded.toss_text,
                    toss_decision       = excluded.toss_decision,
                    umpires             = excluded.umpires,
                    referee             = excluded.referee,
                    team_a_id           = excluded.team_a_id,
                    team_b_id           = excluded.team_b_id,
                    venue_id            = excluded.venue_id,
                    winning_team_id     = excluded.winning_team_id,
                    toss_winner_id      = excluded.toss_winner_id,
                    man_of_the_match_id = excluded.man_of_the_match_id
                 RETURNING id",
                params![
                    m.match_id,
                    m.title,
                    m.short_title,
                    m.subtitle,
                    m.match_number,
                    m.format,
                    m.status,
                    m.status_note,
                    m.date_start.map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string()),
                    m.date_end.map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string()),
                    m.result,
                    m.win_margin,
                    m.toss_text,
                    m.toss_decision,
                    m.umpires,
                    m.referee,
                    m.team_a_id,
                    m.team_b_id,
                    m.venue_id,
                    m.winning_team_id,
                    m.toss_winner_id,
                    m.man_of_the_match_id,
                ],
                |row| row.get(0),
            )
            .context("failed to upsert match")?;
        Ok(id)
    }

    /// Insert an innings or update the existing row for the same `iid`.
    pub fn upsert_innings(&self, innings: &NewInnings) -> Result<i64> {
        let conn = self.conn();
        let id: i64 = conn
            .query_row(
                "INSERT INTO innings (iid, match_id, innings_number, name, short_name, status,
                                      total_runs, total_wickets, total_overs, run_rate, target,
                                      extras_byes, extras_legbyes, extras_wides, extras_noballs,
                                      extras_total, batting_team_id, fielding_team_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16,
                         ?17, ?18)
                 ON CONFLICT(iid) DO UPDATE SET
                    match_id         = excluded.match_id,
                    innings_number   = excluded.innings_number,
                    name             = excluded.name,
                    short_name       = excluded.short_name,
                    status           = excluded.status,
                    total_runs       = excluded.total_runs,
                    total_wickets    = excluded.total_wickets,
                    total_overs      = excluded.total_overs,
                    run_rate         = excluded.run_rate,
                    target           = excluded.target,
                    extras_byes      = excluded.extras_byes,
                    extras_legbyes   = excluded.extras_legbyes,
                    extras_wides     = excluded.extras_wides,
                    extras_noballs   = excluded.extras_noballs,
                    extras_total     = excluded.extras_total,
                    batting_team_id  = excluded.batting_team_id,
                    fielding_team_id = excluded.fielding_team_id
                 RETURNING id",
                params![
                    innings.iid,
                    innings.match_id,
                    innings.innings_number,
                    innings.name,
                    innings.short_name,
                    innings.status,
                    innings.total_runs,
                    innings.total_wickets,
                    innings.total_overs,
                    innings.run_rate,
                    innings.target,
                    innings.extras_byes,
                    innings.extras_legbyes,
                    innings.extras_wides,
                    innings.extras_noballs,
                    innings.extras_total,
                    innings.batting_team_id,
                    innings.fielding_team_id,
                ],
                |row| row.get(0),
            )
            .context("failed to upsert innings")?;
        Ok(id)
    }

    /// Insert a batting performance or update the existing row for the same
    /// (innings, player) pair. A batsman bats at most once per innings.
    pub fn upsert_batting_performance(&self, perf: &NewBattingPerformance) -> Result<i64> {
        let conn = self.conn();
        let id: i64 = conn
            .query_row(
                "INSERT INTO batting_performances (innings_id, player_id, runs, balls_faced, fours,
                                                   sixes, strike_rate, how_out, dismissal, position,
                                                   bowler_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                 ON CONFLICT(innings_id, player_id) DO UPDATE SET
                    runs        = excluded.runs,
                    balls_faced = excluded.balls_faced,
                    fours       = excluded.fours,
                    sixes       = excluded.sixes,
                    strike_rate = excluded.strike_rate,
                    how_out     = excluded.how_out,
                    dismissal   = excluded.dismissal,
                    position    = excluded.position,
                    bowler_id   = excluded.bowler_id
                 RETURNING id",
                params![
                    perf.innings_id,
                    perf.player_id,
                    perf.runs,
                    perf.balls_faced,
                    perf.fours,
                    perf.sixes,
                    perf.strike_rate,
                    perf.how_out,
                    perf.dismissal,
                    perf.position,
                    perf.bowler_id,
                ],
                |row| row.get(0),
            )
            .context("failed to upsert batting performance")?;
        Ok(id)
    }

    /// Insert a bowling performance or update the existing row for the same
    /// (innings, player) pair.
    pub fn upsert_bowling_performance(&self, perf: &NewBowlingPerformance) -> Result<i64> {
        let conn = self.conn();
        let id: i64 = conn
            .query_row(
                "INSERT INTO bowling_performances (innings_id, player_id, overs, maidens,
                                                   runs_conceded, wickets, economy, no_balls, wides,
                                                   dot_balls)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                 ON CONFLICT(innings_id, player_id) DO UPDATE SET
                    overs         = excluded.overs,
                    maidens       = excluded.maidens,
                    runs_conceded = excluded.runs_conceded,
                    wickets       = excluded.wickets,
                    economy       = excluded.economy,
                    no_balls      = excluded.no_balls,
                    wides         = excluded.wides,
                    dot_balls     = excluded.dot_balls
                 RETURNING id",
                params![
                    perf.innings_id,
                    perf.player_id,
                    perf.overs,
                    perf.maidens,
                    perf.runs_conceded,
                    perf.wickets,
                    perf.economy,
                    perf.no_balls,
                    perf.wides,
                    perf.dot_balls,
                ],
                |row| row.get(0),
            )
            .context("failed to upsert bowling performance")?;
        Ok(id)
    }

    /// Insert a standings row or update the existing (team, round) row in
    /// place; the later call's values win as the round progresses.
    pub fn upsert_standing(&self, standing: &NewStanding) -> Result<i64> {
        let conn = self.conn();
        let id: i64 = conn
            .query_row(
                "INSERT INTO standings (team_id, round, played, wins, losses, ties, no_result,
                                        points, net_run_rate, position)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                 ON CONFLICT(team_id, round) DO UPDATE SET
                    played       = excluded.played,
                    wins         = excluded.wins,
                    losses       = excluded.losses,
                    ties         = excluded.ties,
                    no_result    = excluded.no_result,
                    points       = excluded.points,
                    net_run_rate = excluded.net_run_rate,
                    position     = excluded.position
                 RETURNING id",
                params![
                    standing.team_id,
                    standing.round,
                    standing.played,
                    standing.wins,
                    standing.losses,
                    standing.ties,
                    standing.no_result,
                    standing.points,
                    standing.net_run_rate,
                    standing.position,
                ],
                |row| row.get(0),
            )
            .context("failed to upsert standing")?;
        Ok(id)
    }

    // ------------------------------------------------------------------
    // Natural-key resolution
    // ------------------------------------------------------------------

    /// Resolve a team's row id from its external `tid`.
    pub fn team_id_by_tid(&self, tid: i64) -> Result<Option<i64>> {
        let conn = self.conn();
        conn.query_row("SELECT id FROM teams WHERE tid = ?1", params![tid], |row| {
            row.get(0)
        })
        .optional()
        .context("failed to resolve team by tid")
    }

    /// Resolve a player's row id from its external `pid`.
    pub fn player_id_by_pid(&self, pid: i64) -> Result<Option<i64>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id FROM players WHERE pid = ?1",
            params![pid],
            |row| row.get(0),
        )
        .optional()
        .context("failed to resolve player by pid")
    }

    /// Resolve a venue's row id from its external `venue_id`.
    pub fn venue_id_by_key(&self, venue_id: &str) -> Result<Option<i64>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id FROM venues WHERE venue_id = ?1",
            params![venue_id],
            |row| row.get(0),
        )
        .optional()
        .context("failed to resolve venue by venue_id")
    }

    /// Resolve a match's row id from its external `match_id`.
    pub fn match_row_id_by_key(&self, match_id: i64) -> Result<Option<i64>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id FROM matches WHERE match_id = ?1",
            params![match_id],
            |row| row.get(0),
        )
        .optional()
        .context("failed to resolve match by match_id")
    }

    // ------------------------------------------------------------------
    // Row counts (summary + idempotency checks)
    // ------------------------------------------------------------------

    /// Count all rows of the named table. Restricted to the fixed schema
    /// table set so the name can be interpolated safely.
    pub(crate) fn count_rows(&self, table: &str) -> Result<i64> {
        debug_assert!([
            "teams",
            "players",
            "team_players",
            "venues",
            "matches",
            "innings",
            "batting_performances",
            "bowling_performances",
            "standings",
        ]
        .contains(&table));
        let conn = self.conn();
        let count: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                row.get(0)
            })
            .with_context(|| format!("failed to count rows in {table}"))?;
        Ok(count)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::*;

    /// Helper: create a fresh in-memory database for each test.
    pub(crate) fn test_db() -> Database {
        Database::open(":memory:").expect("in-memory database should open")
    }

    pub(crate) fn sample_team(tid: i64, title: &str) -> NewTeam {
        NewTeam {
            tid,
            title: title.to_string(),
            abbreviation: title[..title.len().min(3)].to_uppercase(),
            logo_url: None,
            thumb_url: None,
            country: "in".to_string(),
            sex: "male".to_string(),
        }
    }

    pub(crate) fn sample_player(pid: i64, title: &str) -> NewPlayer {
        NewPlayer {
            pid,
            title: title.to_string(),
            short_name: Some(title.to_string()),
            first_name: None,
            last_name: None,
            middle_name: None,
            birthdate: None,
            birthplace: None,
            country: Some("in".to_string()),
            playing_role: Some("bat".to_string()),
            batting_style: None,
            bowling_style: None,
            fielding_position: None,
            nationality: None,
            fantasy_rating: None,
        }
    }

    pub(crate) fn sample_match(match_id: i64, team_a: Option<i64>, team_b: Option<i64>) -> NewMatch {
        NewMatch {
            match_id,
            title: format!("Match {match_id}"),
            short_title: Some(format!("M{match_id}")),
            subtitle: None,
            match_number: None,
            format: "T20".to_string(),
            status: Some("Completed".to_string()),
            status_note: None,
            date_start: chrono::NaiveDateTime::parse_from_str(
                "2022-03-26 19:30:00",
                "%Y-%m-%d %H:%M:%S",
            )
            .ok(),
            date_end: None,
            result: None,
            win_margin: None,
            toss_text: None,
            toss_decision: None,
            umpires: None,
            referee: None,
            team_a_id: team_a,
            team_b_id: team_b,
            venue_id: None,
            winning_team_id: None,
            toss_winner_id: None,
            man_of_the_match_id: None,
        }
    }

    pub(crate) fn sample_innings(iid: i64, match_id: i64, number: i64) -> NewInnings {
        NewInnings {
            iid,
            match_id,
            innings_number: number,
            name: None,
            short_name: None,
            status: None,
            total_runs: 160,
            total_wickets: 6,
            total_overs: Some("20".to_string()),
            run_rate: Some(8.0),
            target: None,
            extras_byes: 1,
            extras_legbyes: 2,
            extras_wides: 5,
            extras_noballs: 0,
            extras_total: 8,
            batting_team_id: None,
            fielding_team_id: None,
        }
    }

    pub(crate) fn sample_batting(innings_id: i64, player_id: i64, runs: i64) -> NewBattingPerformance {
        NewBattingPerformance {
            innings_id,
            player_id,
            runs,
            balls_faced: runs, // a run a ball keeps the arithmetic simple
            fours: 0,
            sixes: 0,
            strike_rate: Some(100.0),
            how_out: Some("caught".to_string()),
            dismissal: None,
            position: 1,
            bowler_id: None,
        }
    }

    pub(crate) fn sample_bowling(innings_id: i64, player_id: i64, wickets: i64) -> NewBowlingPerformance {
        NewBowlingPerformance {
            innings_id,
            player_id,
            overs: Some("4".to_string()),
            maidens: 0,
            runs_conceded: 30,
            wickets,
            economy: Some(7.5),
            no_balls: 0,
            wides: 1,
            dot_balls: 10,
        }
    }

    #[test]
    fn open_creates_tables() {
        let db = test_db();
        let conn = db.conn();

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        for expected in [
            "teams",
            "players",
            "team_players",
            "venues",
            "matches",
            "innings",
            "batting_performances",
            "bowling_performances",
            "standings",
        ] {
            assert!(tables.contains(&expected.to_string()), "missing {expected}");
        }
    }

    #[test]
    fn upsert_team_is_idempotent() {
        let db = test_db();
        let id1 = db.upsert_team(&sample_team(101, "Chennai Super Kings")).unwrap();
        let id2 = db.upsert_team(&sample_team(101, "Chennai Super Kings")).unwrap();

        assert_eq!(id1, id2);
        assert_eq!(db.count_rows("teams").unwrap(), 1);
    }

    #[test]
    fn upsert_team_updates_in_place() {
        let db = test_db();
        let id1 = db.upsert_team(&sample_team(101, "Chennai Super Kings")).unwrap();
        let id2 = db.upsert_team(&sample_team(101, "Chennai Kings")).unwrap();

        assert_eq!(id1, id2);
        let team = db.team_by_id(id1).unwrap().unwrap();
        assert_eq!(team.title, "Chennai Kings");
    }

    #[test]
    fn upsert_players_distinct_pids_are_separate() {
        let db = test_db();
        let id1 = db.upsert_player(&sample_player(5001, "MS Dhoni")).unwrap();
        let id2 = db.upsert_player(&sample_player(5002, "Ruturaj Gaikwad")).unwrap();

        assert_ne!(id1, id2);
        assert_eq!(db.count_rows("players").unwrap(), 2);
    }

    #[test]
    fn team_membership_duplicate_is_already_satisfied() {
        let db = test_db();
        let team_id = db.upsert_team(&sample_team(101, "Chennai Super Kings")).unwrap();
        let player_id = db.upsert_player(&sample_player(5001, "MS Dhoni")).unwrap();

        db.upsert_team_player(team_id, player_id, Some("wk"), None).unwrap();
        db.upsert_team_player(team_id, player_id, Some("wk"), None).unwrap();

        assert_eq!(db.count_rows("team_players").unwrap(), 1);
    }

    #[test]
    fn player_in_two_teams_has_two_memberships() {
        let db = test_db();
        let team_a = db.upsert_team(&sample_team(101, "Chennai Super Kings")).unwrap();
        let team_b = db.upsert_team(&sample_team(102, "Mumbai Indians")).unwrap();
        let player_id = db.upsert_player(&sample_player(5001, "MS Dhoni")).unwrap();

        db.upsert_team_player(team_a, player_id, None, None).unwrap();
        db.upsert_team_player(team_b, player_id, None, None).unwrap();

        assert_eq!(db.count_rows("players").unwrap(), 1);
        assert_eq!(db.count_rows("team_players").unwrap(), 2);
    }

    #[test]
    fn standings_second_upsert_wins() {
        let db = test_db();
        let team_id = db.upsert_team(&sample_team(101, "Chennai Super Kings")).unwrap();

        let mut standing = NewStanding {
            team_id,
            round: "Final".to_string(),
            played: 10,
            wins: 5,
            losses: 5,
            ties: 0,
            no_result: 0,
            points: 10,
            net_run_rate: Some(0.15),
            position: Some(4),
        };
        let id1 = db.upsert_standing(&standing).unwrap();

        standing.played = 14;
        standing.wins = 8;
        standing.points = 16;
        let id2 = db.upsert_standing(&standing).unwrap();

        assert_eq!(id1, id2);
        assert_eq!(db.count_rows("standings").unwrap(), 1);

        let rows = db.standings_view(Some("Final")).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].standing.points, 16);
        assert_eq!(rows[0].standing.played, 14);
    }

    #[test]
    fn natural_key_lookups_resolve_or_none() {
        let db = test_db();
        let team_id = db.upsert_team(&sample_team(101, "Chennai Super Kings")).unwrap();

        assert_eq!(db.team_id_by_tid(101).unwrap(), Some(team_id));
        assert_eq!(db.team_id_by_tid(999).unwrap(), None);
        assert_eq!(db.player_id_by_pid(1).unwrap(), None);
        assert_eq!(db.venue_id_by_key("v1").unwrap(), None);
        assert_eq!(db.match_row_id_by_key(42).unwrap(), None);
    }

    #[test]
    fn batting_performance_unique_per_innings_and_player() {
        let db = test_db();
        let team = db.upsert_team(&sample_team(101, "Chennai Super Kings")).unwrap();
        let match_row = db.upsert_match(&sample_match(9001, Some(team), None)).unwrap();
        let innings = db.upsert_innings(&sample_innings(1, match_row, 1)).unwrap();
        let player = db.upsert_player(&sample_player(5001, "MS Dhoni")).unwrap();

        let mut perf = sample_batting(innings, player, 40);
        let id1 = db.upsert_batting_performance(&perf).unwrap();
        perf.runs = 45;
        let id2 = db.upsert_batting_performance(&perf).unwrap();

        assert_eq!(id1, id2);
        assert_eq!(db.count_rows("batting_performances").unwrap(), 1);
    }

    #[test]
    fn foreign_keys_enforced() {
        let db = test_db();
        // No innings/player rows exist, so the performance insert must fail.
        let result = db.upsert_batting_performance(&sample_batting(1, 1, 10));
        assert!(result.is_err());
    }
}
