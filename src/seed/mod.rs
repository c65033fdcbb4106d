//! Fixture ingestion pipeline.
//!
//! Reconciles the raw fixture files into store rows, category by category in
//! dependency order: teams → players → matches → scorecards → standings.
//! Later categories resolve earlier ones by natural key, so the order is
//! load-bearing.
//!
//! Every write is an upsert, so the whole pipeline is idempotent. Every
//! per-record failure becomes an explicit skipped-with-reason outcome in the
//! category report rather than a swallowed error; nothing aborts the batch.

use std::collections::HashSet;
use std::path::Path;

use chrono::NaiveDateTime;
use tracing::{info, warn};

use crate::fixtures::{
    self, float_opt, int_opt, int_or_zero, read_fixture, string_opt, FixtureError, RawBatsman,
    RawBowler, RawInnings, RawMatch, RawScorecard, RawSquad, RawStanding, RawStandingsFile,
    RawTeam,
};
use crate::models::{
    NewBattingPerformance, NewBowlingPerformance, NewInnings, NewMatch, NewPlayer, NewStanding,
    NewTeam, NewVenue,
};
use crate::store::Database;

/// Outcome of reconciling a single fixture record.
#[derive(Debug)]
pub enum Outcome {
    /// The record was upserted into the store.
    Seeded,
    /// The record could not be applied; the reason goes into the report.
    Skipped(String),
}

/// Per-category ingestion counts.
#[derive(Debug, Default)]
pub struct CategoryReport {
    pub seeded: u32,
    pub skipped: u32,
    pub reasons: Vec<String>,
}

impl CategoryReport {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Seeded => self.seeded += 1,
            Outcome::Skipped(reason) => {
                warn!("skipped: {reason}");
                self.skipped += 1;
                self.reasons.push(reason);
            }
        }
    }
}

/// Counts for a full pipeline run, one report per category.
#[derive(Debug, Default)]
pub struct SeedReport {
    pub teams: CategoryReport,
    pub players: CategoryReport,
    pub matches: CategoryReport,
    pub innings: CategoryReport,
    pub standings: CategoryReport,
}

/// Run the full ingestion pipeline against a fixture directory.
pub fn run(db: &Database, data_dir: &Path) -> SeedReport {
    let mut report = SeedReport::default();
    seed_teams(db, data_dir, &mut report.teams);
    seed_players(db, data_dir, &mut report.players);
    seed_matches(db, data_dir, &mut report.matches);
    seed_scorecards(db, data_dir, &mut report.innings);
    seed_standings(db, data_dir, &mut report.standings);
    report
}

/// Read a category fixture, treating a missing file as an empty category
/// and anything unreadable as a category-level skip.
fn load_category<T: serde::de::DeserializeOwned>(
    path: &Path,
    category: &str,
    report: &mut CategoryReport,
) -> Option<T> {
    match read_fixture(path) {
        Ok(value) => Some(value),
        Err(FixtureError::Missing(p)) => {
            info!("no {category} fixture at {}; nothing to seed", p.display());
            None
        }
        Err(e) => {
            report.record(Outcome::Skipped(format!("{category} fixture unreadable: {e}")));
            None
        }
    }
}

fn seed_teams(db: &Database, data_dir: &Path, report: &mut CategoryReport) {
    let path = data_dir.join("teams").join("teams.json");
    let Some(teams): Option<Vec<RawTeam>> = load_category(&path, "teams", report) else {
        return;
    };

    for team in &teams {
        report.record(reconcile_team(db, team));
    }
    info!("seeded {} teams ({} skipped)", report.seeded, report.skipped);
}

fn reconcile_team(db: &Database, raw: &RawTeam) -> Outcome {
    let abbreviation = raw
        .abbr
        .clone()
        .filter(|a| !a.trim().is_empty())
        .unwrap_or_else(|| default_abbreviation(&raw.title));

    let team = NewTeam {
        tid: raw.tid,
        title: raw.title.clone(),
        abbreviation,
        logo_url: raw.logo_url.clone(),
        thumb_url: raw.thumb_url.clone(),
        country: raw.country.clone().unwrap_or_else(|| "in".to_string()),
        sex: raw.sex.clone().unwrap_or_else(|| "male".to_string()),
    };
    match db.upsert_team(&team) {
        Ok(_) => Outcome::Seeded,
        Err(e) => Outcome::Skipped(format!("team {}: {e}", raw.tid)),
    }
}

/// First three letters of the title, uppercased.
fn default_abbreviation(title: &str) -> String {
    title.chars().take(3).collect::<String>().to_uppercase()
}

fn seed_players(db: &Database, data_dir: &Path, report: &mut CategoryReport) {
    let path = data_dir.join("squads").join("squads.json");
    let Some(squads): Option<Vec<RawSquad>> = load_category(&path, "squads", report) else {
        return;
    };

    // A player may appear in several squads; only the first sighting creates
    // the canonical row, later ones only add the membership.
    let mut seen: HashSet<i64> = HashSet::new();

    for squad in &squads {
        let team_id = match db.team_id_by_tid(squad.team_id) {
            Ok(Some(id)) => id,
            Ok(None) => {
                report.record(Outcome::Skipped(format!(
                    "squad for unknown team tid {}",
                    squad.team_id
                )));
                continue;
            }
            Err(e) => {
                report.record(Outcome::Skipped(format!("squad {}: {e}", squad.team_id)));
                continue;
            }
        };

        for player in &squad.players {
            if seen.contains(&player.pid) {
                if let Err(e) = link_member(db, team_id, player) {
                    report.record(Outcome::Skipped(format!("player {}: {e}", player.pid)));
                }
                continue;
            }
            seen.insert(player.pid);
            report.record(reconcile_player(db, team_id, player));
        }
    }
    info!(
        "seeded {} players ({} skipped)",
        report.seeded, report.skipped
    );
}

fn link_member(
    db: &Database,
    team_id: i64,
    player: &fixtures::RawSquadPlayer,
) -> anyhow::Result<()> {
    if let Some(player_id) = db.player_id_by_pid(player.pid)? {
        db.upsert_team_player(
            team_id,
            player_id,
            player.playing_role.as_deref(),
            player.role_str.as_deref(),
        )?;
    }
    Ok(())
}

fn reconcile_player(db: &Database, team_id: i64, raw: &fixtures::RawSquadPlayer) -> Outcome {
    let player = NewPlayer {
        pid: raw.pid,
        title: raw.title.clone(),
        short_name: raw.short_name.clone(),
        first_name: raw.first_name.clone(),
        last_name: raw.last_name.clone(),
        middle_name: raw.middle_name.clone(),
        birthdate: raw.birthdate.clone(),
        birthplace: raw.birthplace.clone(),
        country: raw.country.clone(),
        playing_role: raw.playing_role.clone(),
        batting_style: raw.batting_style.clone(),
        bowling_style: raw.bowling_style.clone(),
        fielding_position: raw.fielding_position.clone(),
        nationality: raw.nationality.clone(),
        fantasy_rating: float_opt(raw.fantasy_player_rating.as_ref()),
    };
    let player_id = match db.upsert_player(&player) {
        Ok(id) => id,
        Err(e) => return Outcome::Skipped(format!("player {}: {e}", raw.pid)),
    };
    if let Err(e) = db.upsert_team_player(
        team_id,
        player_id,
        raw.playing_role.as_deref(),
        raw.role_str.as_deref(),
    ) {
        return Outcome::Skipped(format!("membership for player {}: {e}", raw.pid));
    }
    Outcome::Seeded
}

fn seed_matches(db: &Database, data_dir: &Path, report: &mut CategoryReport) {
    let path = data_dir.join("matches").join("matches.json");
    let Some(matches): Option<Vec<RawMatch>> = load_category(&path, "matches", report) else {
        return;
    };

    let mut seen_venues: HashSet<String> = HashSet::new();

    for m in &matches {
        report.record(reconcile_match(db, m, &mut seen_venues));
    }
    info!(
        "seeded {} matches ({} skipped)",
        report.seeded, report.skipped
    );
}

fn reconcile_match(db: &Database, raw: &RawMatch, seen_venues: &mut HashSet<String>) -> Outcome {
    // Venue rides along inside the match record; upsert it on first
    // sighting so the match below can resolve it.
    if let Some(venue) = &raw.venue {
        if let Some(venue_key) = string_opt(venue.venue_id.as_ref()) {
            if !seen_venues.contains(&venue_key) {
                let new_venue = NewVenue {
                    venue_id: venue_key.clone(),
                    name: venue.name.clone().unwrap_or_else(|| venue_key.clone()),
                    location: venue.location.clone(),
                    country: venue.country.clone(),
                    timezone: venue.timezone.clone(),
                };
                match db.upsert_venue(&new_venue) {
                    Ok(_) => {
                        seen_venues.insert(venue_key);
                    }
                    Err(e) => {
                        return Outcome::Skipped(format!(
                            "venue for match {}: {e}",
                            raw.match_id
                        ))
                    }
                }
            }
        }
    }

    // Unresolved references become NULL; the match is still worth keeping.
    let resolved = (|| -> anyhow::Result<NewMatch> {
        let team_a_id = match &raw.teama {
            Some(r) => db.team_id_by_tid(r.team_id)?,
            None => None,
        };
        let team_b_id = match &raw.teamb {
            Some(r) => db.team_id_by_tid(r.team_id)?,
            None => None,
        };
        let venue_id = match raw
            .venue
            .as_ref()
            .and_then(|v| string_opt(v.venue_id.as_ref()))
        {
            Some(key) => db.venue_id_by_key(&key)?,
            None => None,
        };
        let winning_team_id = match int_opt(raw.winning_team_id.as_ref()) {
            Some(tid) => db.team_id_by_tid(tid)?,
            None => None,
        };
        let toss_winner_id = match raw.toss.as_ref().and_then(|t| int_opt(t.winner.as_ref())) {
            Some(tid) => db.team_id_by_tid(tid)?,
            None => None,
        };
        let man_of_the_match_id = match raw
            .man_of_the_match
            .as_ref()
            .and_then(|p| int_opt(p.pid.as_ref()))
        {
            Some(pid) => db.player_id_by_pid(pid)?,
            None => None,
        };

        let toss_decision = match raw.toss.as_ref().and_then(|t| int_opt(t.decision.as_ref())) {
            Some(1) => Some("bat".to_string()),
            Some(2) => Some("bowl".to_string()),
            _ => None,
        };

        Ok(NewMatch {
            match_id: raw.match_id,
            title: raw.title.clone(),
            short_title: raw.short_title.clone(),
            subtitle: raw.subtitle.clone(),
            match_number: string_opt(raw.match_number.as_ref()),
            format: raw
                .format_str
                .clone()
                .filter(|f| !f.trim().is_empty())
                .unwrap_or_else(|| "T20".to_string()),
            status: raw.status_str.clone(),
            status_note: raw.status_note.clone(),
            date_start: raw.date_start.as_deref().and_then(parse_datetime),
            date_end: raw.date_end.as_deref().and_then(parse_datetime),
            result: string_opt(raw.result.as_ref()),
            win_margin: string_opt(raw.win_margin.as_ref()),
            toss_text: raw.toss.as_ref().and_then(|t| t.text.clone()),
            toss_decision,
            umpires: raw.umpires.clone(),
            referee: raw.referee.clone(),
            team_a_id,
            team_b_id,
            venue_id,
            winning_team_id,
            toss_winner_id,
            man_of_the_match_id,
        })
    })();

    let new_match = match resolved {
        Ok(m) => m,
        Err(e) => return Outcome::Skipped(format!("match {}: {e}", raw.match_id)),
    };
    match db.upsert_match(&new_match) {
        Ok(_) => Outcome::Seeded,
        Err(e) => Outcome::Skipped(format!("match {}: {e}", raw.match_id)),
    }
}

fn seed_scorecards(db: &Database, data_dir: &Path, report: &mut CategoryReport) {
    let pattern = data_dir.join("scorecards").join("*.json");
    let paths = match glob::glob(&pattern.to_string_lossy()) {
        Ok(paths) => paths,
        Err(e) => {
            report.record(Outcome::Skipped(format!("scorecard pattern invalid: {e}")));
            return;
        }
    };

    for entry in paths {
        let path = match entry {
            Ok(p) => p,
            Err(e) => {
                report.record(Outcome::Skipped(format!("scorecard unreadable: {e}")));
                continue;
            }
        };
        // One malformed scorecard must not abort the remaining files.
        let scorecard: RawScorecard = match read_fixture(&path) {
            Ok(s) => s,
            Err(e) => {
                report.record(Outcome::Skipped(format!(
                    "scorecard {}: {e}",
                    path.display()
                )));
                continue;
            }
        };
        seed_scorecard(db, &scorecard, report);
    }
    info!(
        "seeded {} innings ({} skipped)",
        report.seeded, report.skipped
    );
}

fn seed_scorecard(db: &Database, scorecard: &RawScorecard, report: &mut CategoryReport) {
    let match_row_id = match db.match_row_id_by_key(scorecard.match_id) {
        Ok(Some(id)) => id,
        Ok(None) => {
            report.record(Outcome::Skipped(format!(
                "scorecard for unknown match {}",
                scorecard.match_id
            )));
            return;
        }
        Err(e) => {
            report.record(Outcome::Skipped(format!(
                "scorecard {}: {e}",
                scorecard.match_id
            )));
            return;
        }
    };

    for inning in &scorecard.innings {
        let (outcome, line_skips) = reconcile_innings(db, match_row_id, inning);
        report.record(outcome);
        for reason in line_skips {
            report.record(Outcome::Skipped(reason));
        }
    }
}

/// Reconcile one innings and its performance lines. Returns the innings
/// outcome plus the skip reasons for any batsman/bowler lines that could
/// not be applied.
fn reconcile_innings(
    db: &Database,
    match_row_id: i64,
    raw: &RawInnings,
) -> (Outcome, Vec<String>) {
    let mut line_skips = Vec::new();
    let (total_runs, total_wickets) = parse_scores(raw.scores.as_deref());

    let batting_team_id = match int_opt(raw.batting_team_id.as_ref()) {
        Some(tid) => match db.team_id_by_tid(tid) {
            Ok(id) => id,
            Err(e) => {
                return (
                    Outcome::Skipped(format!("innings {}: {e}", raw.iid)),
                    line_skips,
                )
            }
        },
        None => None,
    };
    let fielding_team_id = match int_opt(raw.fielding_team_id.as_ref()) {
        Some(tid) => match db.team_id_by_tid(tid) {
            Ok(id) => id,
            Err(e) => {
                return (
                    Outcome::Skipped(format!("innings {}: {e}", raw.iid)),
                    line_skips,
                )
            }
        },
        None => None,
    };

    let extras = raw.extra_runs.clone().unwrap_or_default();
    let equations = raw.equations.as_ref();

    let innings = NewInnings {
        iid: raw.iid,
        match_id: match_row_id,
        innings_number: raw.number,
        name: raw.name.clone(),
        short_name: raw.short_name.clone(),
        status: string_opt(raw.status.as_ref()),
        total_runs,
        total_wickets,
        total_overs: equations
            .and_then(|eq| string_opt(eq.overs.as_ref()))
            .or_else(|| string_opt(raw.overs.as_ref())),
        run_rate: equations.and_then(|eq| float_opt(eq.runrate.as_ref())),
        target: int_opt(raw.target.as_ref()),
        extras_byes: int_or_zero(extras.byes.as_ref()),
        extras_legbyes: int_or_zero(extras.legbyes.as_ref()),
        extras_wides: int_or_zero(extras.wides.as_ref()),
        extras_noballs: int_or_zero(extras.noballs.as_ref()),
        extras_total: int_or_zero(extras.total.as_ref()),
        batting_team_id,
        fielding_team_id,
    };

    let innings_id = match db.upsert_innings(&innings) {
        Ok(id) => id,
        Err(e) => {
            return (
                Outcome::Skipped(format!("innings {}: {e}", raw.iid)),
                line_skips,
            )
        }
    };

    // Batting order position is the 1-based index of appearance in the
    // source list, counted even when the entry's player fails to resolve.
    for (index, batsman) in raw.batsmen.iter().enumerate() {
        if let Err(reason) = reconcile_batsman(db, innings_id, index as i64 + 1, batsman) {
            line_skips.push(reason);
        }
    }
    for bowler in &raw.bowlers {
        if let Err(reason) = reconcile_bowler(db, innings_id, bowler) {
            line_skips.push(reason);
        }
    }

    (Outcome::Seeded, line_skips)
}

fn reconcile_batsman(
    db: &Database,
    innings_id: i64,
    position: i64,
    raw: &RawBatsman,
) -> Result<(), String> {
    let pid = int_opt(raw.batsman_id.as_ref())
        .ok_or_else(|| format!("batsman without id in innings row {innings_id}"))?;
    let player_id = db
        .player_id_by_pid(pid)
        .map_err(|e| format!("batsman {pid}: {e}"))?
        .ok_or_else(|| format!("batsman {pid} not in any squad"))?;

    // "0" means no bowler was credited with the dismissal.
    let bowler_id = match int_opt(raw.bowler_id.as_ref()).filter(|id| *id != 0) {
        Some(bowler_pid) => db
            .player_id_by_pid(bowler_pid)
            .map_err(|e| format!("bowler {bowler_pid}: {e}"))?,
        None => None,
    };

    let perf = NewBattingPerformance {
        innings_id,
        player_id,
        runs: int_or_zero(raw.runs.as_ref()),
        balls_faced: int_or_zero(raw.balls_faced.as_ref()),
        fours: int_or_zero(raw.fours.as_ref()),
        sixes: int_or_zero(raw.sixes.as_ref()),
        strike_rate: float_opt(raw.strike_rate.as_ref()),
        how_out: raw.how_out.clone(),
        dismissal: raw.dismissal.clone(),
        position,
        bowler_id,
    };
    db.upsert_batting_performance(&perf)
        .map_err(|e| format!("batting line for {pid}: {e}"))?;
    Ok(())
}

fn reconcile_bowler(db: &Database, innings_id: i64, raw: &RawBowler) -> Result<(), String> {
    let pid = int_opt(raw.bowler_id.as_ref())
        .ok_or_else(|| format!("bowler without id in innings row {innings_id}"))?;
    let player_id = db
        .player_id_by_pid(pid)
        .map_err(|e| format!("bowler {pid}: {e}"))?
        .ok_or_else(|| format!("bowler {pid} not in any squad"))?;

    let perf = NewBowlingPerformance {
        innings_id,
        player_id,
        overs: string_opt(raw.overs.as_ref()),
        maidens: int_or_zero(raw.maidens.as_ref()),
        runs_conceded: int_or_zero(raw.runs_conceded.as_ref()),
        wickets: int_or_zero(raw.wickets.as_ref()),
        economy: float_opt(raw.econ.as_ref()),
        no_balls: int_or_zero(raw.noballs.as_ref()),
        wides: int_or_zero(raw.wides.as_ref()),
        dot_balls: int_or_zero(raw.run0.as_ref()),
    };
    db.upsert_bowling_performance(&perf)
        .map_err(|e| format!("bowling line for {pid}: {e}"))?;
    Ok(())
}

fn seed_standings(db: &Database, data_dir: &Path, report: &mut CategoryReport) {
    let path = data_dir.join("standings").join("standings.json");
    let Some(file): Option<RawStandingsFile> = load_category(&path, "standings", report) else {
        return;
    };

    for round_data in &file.standings {
        let round = round_data
            .round
            .as_ref()
            .and_then(|r| r.name.clone())
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| "Final".to_string());

        for standing in &round_data.standings {
            report.record(reconcile_standing(db, &round, standing));
        }
    }
    info!(
        "seeded {} standings ({} skipped)",
        report.seeded, report.skipped
    );
}

fn reconcile_standing(db: &Database, round: &str, raw: &RawStanding) -> Outcome {
    let Some(tid) = int_opt(raw.team_id.as_ref()) else {
        return Outcome::Skipped(format!("standing without team id in round {round}"));
    };
    let team_id = match db.team_id_by_tid(tid) {
        Ok(Some(id)) => id,
        Ok(None) => return Outcome::Skipped(format!("standing for unknown team tid {tid}")),
        Err(e) => return Outcome::Skipped(format!("standing for team {tid}: {e}")),
    };

    let standing = NewStanding {
        team_id,
        round: round.to_string(),
        played: int_or_zero(raw.played.as_ref()),
        wins: int_or_zero(raw.win.as_ref()),
        losses: int_or_zero(raw.loss.as_ref()),
        ties: int_or_zero(raw.tied.as_ref()),
        no_result: int_or_zero(raw.nr.as_ref()),
        points: int_or_zero(raw.points.as_ref()),
        net_run_rate: float_opt(raw.netrr.as_ref()),
        position: int_opt(raw.position.as_ref()),
    };
    match db.upsert_standing(&standing) {
        Ok(_) => Outcome::Seeded,
        Err(e) => Outcome::Skipped(format!("standing for team {tid}: {e}")),
    }
}

/// Split the combined `"runs/wickets"` score notation into numbers.
/// A missing wickets part means all out or not applicable, so zero either
/// way; garbage parses to zero.
fn parse_scores(notation: Option<&str>) -> (i64, i64) {
    let Some(s) = notation else {
        return (0, 0);
    };
    let mut parts = s.split('/');
    let runs = parts.next().and_then(leading_int).unwrap_or(0);
    let wickets = parts.next().and_then(leading_int).unwrap_or(0);
    (runs, wickets)
}

/// Parse the leading digit run of a string, ignoring any trailing text
/// (`"4 (20 ov)"` → 4).
fn leading_int(s: &str) -> Option<i64> {
    let digits: String = s
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        None
    } else {
        digits.parse().ok()
    }
}

/// Parse a fixture datetime, tolerating both the plain and the ISO-8601
/// separator. Unparseable dates become None rather than a fabricated zero.
fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}
