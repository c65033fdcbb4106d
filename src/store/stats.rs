//! Derived statistics over the store.
//!
//! Leaderboards and summaries are grouped SQL aggregation; derived rates
//! (strike rate, averages, win percentage) are computed at read time and
//! never stored. Every aggregate tolerates an empty store, returning
//! zero/empty rather than an error.

use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension};
use serde::Serialize;

use crate::models::{Player, Standing, Team};

use super::queries::{map_standing, map_team, TeamMembership};
use super::Database;

/// A standings row with its team joined in.
#[derive(Debug, Serialize)]
pub struct StandingEntry {
    #[serde(flatten)]
    pub standing: Standing,
    pub team: Team,
}

/// Career batting totals, summed over every innings a player batted in.
///
/// `strike_rate` is None when no ball was ever faced; `average` is runs per
/// innings batted.
#[derive(Debug, Serialize)]
pub struct BattingTotals {
    pub innings: i64,
    pub runs: i64,
    pub highest_score: i64,
    pub fours: i64,
    pub sixes: i64,
    pub balls_faced: i64,
    pub strike_rate: Option<f64>,
    pub average: Option<f64>,
}

/// Career bowling totals. `average` (runs conceded per wicket) stays None
/// until the first wicket falls.
#[derive(Debug, Serialize)]
pub struct BowlingTotals {
    pub innings: i64,
    pub wickets: i64,
    pub best_figures: i64,
    pub runs_conceded: i64,
    pub maidens: i64,
    pub average: Option<f64>,
}

/// One leaderboard row: a player with their batting totals.
#[derive(Debug, Serialize)]
pub struct BatsmanLeader {
    pub player: Player,
    pub teams: Vec<TeamMembership>,
    pub stats: BattingTotals,
}

/// One leaderboard row: a player with their bowling totals.
#[derive(Debug, Serialize)]
pub struct BowlerLeader {
    pub player: Player,
    pub teams: Vec<TeamMembership>,
    pub stats: BowlingTotals,
}

/// Tournament-wide entity counts.
#[derive(Debug, Serialize)]
pub struct SummaryOverview {
    pub total_matches: i64,
    pub total_teams: i64,
    pub total_players: i64,
    pub total_runs: i64,
    pub total_wickets: i64,
}

/// A single-row record with its player and match context.
#[derive(Debug, Serialize)]
pub struct ScoreRecord {
    pub runs: i64,
    pub player: String,
    #[serde(rename = "match")]
    pub match_title: Option<String>,
}

/// Best single-innings bowling figures.
#[derive(Debug, Serialize)]
pub struct WicketRecord {
    pub wickets: i64,
    pub player: String,
    #[serde(rename = "match")]
    pub match_title: Option<String>,
}

/// Tournament record entries; None until a performance row exists.
#[derive(Debug, Serialize)]
pub struct SummaryRecords {
    pub highest_individual_score: Option<ScoreRecord>,
    pub best_bowling_figures: Option<WicketRecord>,
}

/// The `/stats/summary` payload.
#[derive(Debug, Serialize)]
pub struct Summary {
    pub overview: SummaryOverview,
    pub records: SummaryRecords,
}

/// One row of the `/stats/team-performance` comparison.
#[derive(Debug, Serialize)]
pub struct TeamPerformance {
    pub id: i64,
    pub name: String,
    pub abbreviation: String,
    pub logo_url: Option<String>,
    pub matches_played: i64,
    pub matches_won: i64,
    pub win_percentage: f64,
    pub standing: Option<Standing>,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl Database {
    /// The points table, ordered by points then net run rate, optionally
    /// restricted to one round.
    pub fn standings_view(&self, round: Option<&str>) -> Result<Vec<StandingEntry>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT s.id, s.team_id, s.round, s.played, s.wins, s.losses, s.ties,
                        s.no_result, s.points, s.net_run_rate, s.position,
                        t.id, t.tid, t.title, t.abbreviation, t.logo_url, t.thumb_url,
                        t.country, t.sex
                 FROM standings s
                 JOIN teams t ON t.id = s.team_id
                 WHERE (?1 IS NULL OR s.round = ?1)
                 ORDER BY s.points DESC, s.net_run_rate DESC",
            )
            .context("failed to prepare standings query")?;
        let entries = stmt
            .query_map(params![round], |row| {
                let standing = map_standing(row)?;
                let team = Team {
                    id: row.get(11)?,
                    tid: row.get(12)?,
                    title: row.get(13)?,
                    abbreviation: row.get(14)?,
                    logo_url: row.get(15)?,
                    thumb_url: row.get(16)?,
                    country: row.get(17)?,
                    sex: row.get(18)?,
                };
                Ok(StandingEntry { standing, team })
            })
            .context("failed to query standings")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map standing rows")?;
        Ok(entries)
    }

    /// A player's summed batting stats. Returns all-zero totals (with NULL
    /// rates) when the player never batted.
    pub fn batting_totals(&self, player_id: i64) -> Result<BattingTotals> {
        let conn = self.conn();
        let totals = conn
            .query_row(
                "SELECT COUNT(*), COALESCE(SUM(runs), 0), COALESCE(MAX(runs), 0),
                        COALESCE(SUM(fours), 0), COALESCE(SUM(sixes), 0),
                        COALESCE(SUM(balls_faced), 0)
                 FROM batting_performances WHERE player_id = ?1",
                params![player_id],
                |row| {
                    Ok(raw_batting_totals(
                        row.get(0)?,
                        row.get(1)?,
                        row.get(2)?,
                        row.get(3)?,
                        row.get(4)?,
                        row.get(5)?,
                    ))
                },
            )
            .context("failed to aggregate batting totals")?;
        Ok(totals)
    }

    /// A player's summed bowling stats, zero-valued when they never bowled.
    pub fn bowling_totals(&self, player_id: i64) -> Result<BowlingTotals> {
        let conn = self.conn();
        let totals = conn
            .query_row(
                "SELECT COUNT(*), COALESCE(SUM(wickets), 0), COALESCE(MAX(wickets), 0),
                        COALESCE(SUM(runs_conceded), 0), COALESCE(SUM(maidens), 0)
                 FROM bowling_performances WHERE player_id = ?1",
                params![player_id],
                |row| {
                    Ok(raw_bowling_totals(
                        row.get(0)?,
                        row.get(1)?,
                        row.get(2)?,
                        row.get(3)?,
                        row.get(4)?,
                    ))
                },
            )
            .context("failed to aggregate bowling totals")?;
        Ok(totals)
    }

    /// Top run scorers: performance rows grouped by player, ordered by
    /// total runs, truncated to `limit`.
    pub fn top_batsmen(&self, limit: u32) -> Result<Vec<BatsmanLeader>> {
        let grouped: Vec<(i64, BattingTotals)> = {
            let conn = self.conn();
            let mut stmt = conn
                .prepare(
                    "SELECT player_id, COUNT(*), COALESCE(SUM(runs), 0),
                            COALESCE(MAX(runs), 0), COALESCE(SUM(fours), 0),
                            COALESCE(SUM(sixes), 0), COALESCE(SUM(balls_faced), 0)
                     FROM batting_performances
                     GROUP BY player_id
                     ORDER BY SUM(runs) DESC
                     LIMIT ?1",
                )
                .context("failed to prepare top batsmen query")?;
            let rows = stmt
                .query_map(params![limit], |row| {
                    Ok((
                        row.get(0)?,
                        raw_batting_totals(
                            row.get(1)?,
                            row.get(2)?,
                            row.get(3)?,
                            row.get(4)?,
                            row.get(5)?,
                            row.get(6)?,
                        ),
                    ))
                })
                .context("failed to query top batsmen")?
                .collect::<std::result::Result<Vec<_>, _>>()
                .context("failed to map top batsmen rows")?;
            rows
        };

        let mut leaders = Vec::with_capacity(grouped.len());
        for (player_id, stats) in grouped {
            let Some(player) = self.player_by_id(player_id)? else {
                continue;
            };
            let teams = self.memberships_for_player(player_id)?;
            leaders.push(BatsmanLeader {
                player,
                teams,
                stats,
            });
        }
        Ok(leaders)
    }

    /// Top wicket takers, mirror of [`Database::top_batsmen`].
    pub fn top_bowlers(&self, limit: u32) -> Result<Vec<BowlerLeader>> {
        let grouped: Vec<(i64, BowlingTotals)> = {
            let conn = self.conn();
            let mut stmt = conn
                .prepare(
                    "SELECT player_id, COUNT(*), COALESCE(SUM(wickets), 0),
                            COALESCE(MAX(wickets), 0), COALESCE(SUM(runs_conceded), 0),
                            COALESCE(SUM(maidens), 0)
                     FROM bowling_performances
                     GROUP BY player_id
                     ORDER BY SUM(wickets) DESC
                     LIMIT ?1",
                )
                .context("failed to prepare top bowlers query")?;
            let rows = stmt
                .query_map(params![limit], |row| {
                    Ok((
                        row.get(0)?,
                        raw_bowling_totals(
                            row.get(1)?,
                            row.get(2)?,
                            row.get(3)?,
                            row.get(4)?,
                            row.get(5)?,
                        ),
                    ))
                })
                .context("failed to query top bowlers")?
                .collect::<std::result::Result<Vec<_>, _>>()
                .context("failed to map top bowler rows")?;
            rows
        };

        let mut leaders = Vec::with_capacity(grouped.len());
        for (player_id, stats) in grouped {
            let Some(player) = self.player_by_id(player_id)? else {
                continue;
            };
            let teams = self.memberships_for_player(player_id)?;
            leaders.push(BowlerLeader {
                player,
                teams,
                stats,
            });
        }
        Ok(leaders)
    }

    /// Tournament summary: counts plus the two single-row records.
    pub fn summary(&self) -> Result<Summary> {
        let total_matches = self.count_rows("matches")?;
        let total_teams = self.count_rows("teams")?;
        let total_players = self.count_rows("players")?;

        let (total_runs, total_wickets) = {
            let conn = self.conn();
            let runs: i64 = conn
                .query_row(
                    "SELECT COALESCE(SUM(runs), 0) FROM batting_performances",
                    [],
                    |row| row.get(0),
                )
                .context("failed to sum runs")?;
            let wickets: i64 = conn
                .query_row(
                    "SELECT COALESCE(SUM(wickets), 0) FROM bowling_performances",
                    [],
                    |row| row.get(0),
                )
                .context("failed to sum wickets")?;
            (runs, wickets)
        };

        let highest_individual_score = {
            let conn = self.conn();
            conn.query_row(
                "SELECT bp.runs, p.title, m.short_title
                 FROM batting_performances bp
                 JOIN players p ON p.id = bp.player_id
                 JOIN innings i ON i.id = bp.innings_id
                 JOIN matches m ON m.id = i.match_id
                 ORDER BY bp.runs DESC
                 LIMIT 1",
                [],
                |row| {
                    Ok(ScoreRecord {
                        runs: row.get(0)?,
                        player: row.get(1)?,
                        match_title: row.get(2)?,
                    })
                },
            )
            .optional()
            .context("failed to fetch highest score record")?
        };

        let best_bowling_figures = {
            let conn = self.conn();
            conn.query_row(
                "SELECT bp.wickets, p.title, m.short_title
                 FROM bowling_performances bp
                 JOIN players p ON p.id = bp.player_id
                 JOIN innings i ON i.id = bp.innings_id
                 JOIN matches m ON m.id = i.match_id
                 ORDER BY bp.wickets DESC
                 LIMIT 1",
                [],
                |row| {
                    Ok(WicketRecord {
                        wickets: row.get(0)?,
                        player: row.get(1)?,
                        match_title: row.get(2)?,
                    })
                },
            )
            .optional()
            .context("failed to fetch best bowling record")?
        };

        Ok(Summary {
            overview: SummaryOverview {
                total_matches,
                total_teams,
                total_players,
                total_runs,
                total_wickets,
            },
            records: SummaryRecords {
                highest_individual_score,
                best_bowling_figures,
            },
        })
    }

    /// Per-team match counts and win percentage, sorted by win percentage.
    ///
    /// Played/won are derived by counting match rows that reference the
    /// team, not from stored columns; a team with no matches reports 0%
    /// rather than dividing by zero.
    pub fn team_performance(&self) -> Result<Vec<TeamPerformance>> {
        let teams = {
            let conn = self.conn();
            let mut stmt = conn
                .prepare(
                    "SELECT id, tid, title, abbreviation, logo_url, thumb_url, country, sex
                     FROM teams ORDER BY title",
                )
                .context("failed to prepare teams query")?;
            let rows = stmt
                .query_map([], map_team)
                .context("failed to query teams")?
                .collect::<std::result::Result<Vec<_>, _>>()
                .context("failed to map team rows")?;
            rows
        };

        let mut performance = Vec::with_capacity(teams.len());
        for team in teams {
            let (played, won) = {
                let conn = self.conn();
                let played: i64 = conn
                    .query_row(
                        "SELECT COUNT(*) FROM matches WHERE team_a_id = ?1 OR team_b_id = ?1",
                        params![team.id],
                        |row| row.get(0),
                    )
                    .context("failed to count matches played")?;
                let won: i64 = conn
                    .query_row(
                        "SELECT COUNT(*) FROM matches WHERE winning_team_id = ?1",
                        params![team.id],
                        |row| row.get(0),
                    )
                    .context("failed to count matches won")?;
                (played, won)
            };
            let win_percentage = if played > 0 {
                round1(won as f64 / played as f64 * 100.0)
            } else {
                0.0
            };
            let standing = self.latest_standing_for_team(team.id)?;
            performance.push(TeamPerformance {
                id: team.id,
                name: team.title,
                abbreviation: team.abbreviation,
                logo_url: team.logo_url,
                matches_played: played,
                matches_won: won,
                win_percentage,
                standing,
            });
        }

        performance.sort_by(|a, b| {
            b.win_percentage
                .partial_cmp(&a.win_percentage)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(performance)
    }
}

fn raw_batting_totals(
    innings: i64,
    runs: i64,
    highest_score: i64,
    fours: i64,
    sixes: i64,
    balls_faced: i64,
) -> BattingTotals {
    let strike_rate = if balls_faced > 0 {
        Some(round2(runs as f64 / balls_faced as f64 * 100.0))
    } else {
        None
    };
    let average = if innings > 0 {
        Some(round2(runs as f64 / innings as f64))
    } else {
        None
    };
    BattingTotals {
        innings,
        runs,
        highest_score,
        fours,
        sixes,
        balls_faced,
        strike_rate,
        average,
    }
}

fn raw_bowling_totals(
    innings: i64,
    wickets: i64,
    best_figures: i64,
    runs_conceded: i64,
    maidens: i64,
) -> BowlingTotals {
    let average = if wickets > 0 {
        Some(round2(runs_conceded as f64 / wickets as f64))
    } else {
        None
    };
    BowlingTotals {
        innings,
        wickets,
        best_figures,
        runs_conceded,
        maidens,
        average,
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::*;
    use super::*;
    use crate::models::NewStanding;

    fn seed_two_batsmen(db: &Database) -> (i64, i64) {
        let match_id = db.upsert_match(&sample_match(9001, None, None)).unwrap();
        let innings_id = db.upsert_innings(&sample_innings(1, match_id, 1)).unwrap();
        let p50 = db.upsert_player(&sample_player(1, "Fifty Maker")).unwrap();
        let p80 = db.upsert_player(&sample_player(2, "Eighty Maker")).unwrap();
        db.upsert_batting_performance(&sample_batting(innings_id, p50, 50)).unwrap();
        let mut b = sample_batting(innings_id, p80, 80);
        b.position = 2;
        db.upsert_batting_performance(&b).unwrap();
        (p50, p80)
    }

    #[test]
    fn top_batsmen_orders_by_total_runs() {
        let db = test_db();
        let (_, p80) = seed_two_batsmen(&db);

        let leaders = db.top_batsmen(1).unwrap();
        assert_eq!(leaders.len(), 1);
        assert_eq!(leaders[0].player.id, p80);
        assert_eq!(leaders[0].stats.runs, 80);
        assert_eq!(leaders[0].stats.highest_score, 80);
    }

    #[test]
    fn aggregates_satisfy_sum_and_max_invariants() {
        let db = test_db();
        let match_id = db.upsert_match(&sample_match(9001, None, None)).unwrap();
        let i1 = db.upsert_innings(&sample_innings(1, match_id, 1)).unwrap();
        let i2 = db.upsert_innings(&sample_innings(2, match_id, 2)).unwrap();
        let p = db.upsert_player(&sample_player(1, "Consistent Player")).unwrap();
        db.upsert_batting_performance(&sample_batting(i1, p, 40)).unwrap();
        db.upsert_batting_performance(&sample_batting(i2, p, 70)).unwrap();

        let totals = db.batting_totals(p).unwrap();
        assert_eq!(totals.innings, 2);
        assert_eq!(totals.runs, 110);
        assert_eq!(totals.highest_score, 70);
        assert!(totals.runs >= totals.highest_score);
        assert!(totals.innings >= 1);
    }

    #[test]
    fn empty_store_aggregates_are_zero_not_errors() {
        let db = test_db();

        assert!(db.top_batsmen(10).unwrap().is_empty());
        assert!(db.top_bowlers(10).unwrap().is_empty());
        assert!(db.standings_view(None).unwrap().is_empty());
        assert!(db.team_performance().unwrap().is_empty());

        let summary = db.summary().unwrap();
        assert_eq!(summary.overview.total_matches, 0);
        assert_eq!(summary.overview.total_runs, 0);
        assert!(summary.records.highest_individual_score.is_none());
        assert!(summary.records.best_bowling_figures.is_none());
    }

    #[test]
    fn strike_rate_null_when_no_balls_faced() {
        let db = test_db();
        let match_id = db.upsert_match(&sample_match(9001, None, None)).unwrap();
        let innings_id = db.upsert_innings(&sample_innings(1, match_id, 1)).unwrap();
        let p = db.upsert_player(&sample_player(1, "Diamond Duck")).unwrap();
        let mut perf = sample_batting(innings_id, p, 0);
        perf.balls_faced = 0;
        perf.strike_rate = None;
        db.upsert_batting_performance(&perf).unwrap();

        let totals = db.batting_totals(p).unwrap();
        assert_eq!(totals.balls_faced, 0);
        assert_eq!(totals.strike_rate, None);
    }

    #[test]
    fn bowling_average_undefined_without_wickets() {
        let db = test_db();
        let match_id = db.upsert_match(&sample_match(9001, None, None)).unwrap();
        let innings_id = db.upsert_innings(&sample_innings(1, match_id, 1)).unwrap();
        let p = db.upsert_player(&sample_player(1, "Wicketless")).unwrap();
        db.upsert_bowling_performance(&sample_bowling(innings_id, p, 0)).unwrap();

        let totals = db.bowling_totals(p).unwrap();
        assert_eq!(totals.wickets, 0);
        assert_eq!(totals.average, None);
        assert_eq!(totals.runs_conceded, 30);
    }

    #[test]
    fn summary_records_carry_context() {
        let db = test_db();
        seed_two_batsmen(&db);

        let summary = db.summary().unwrap();
        assert_eq!(summary.overview.total_runs, 130);
        let record = summary.records.highest_individual_score.unwrap();
        assert_eq!(record.runs, 80);
        assert_eq!(record.player, "Eighty Maker");
        assert_eq!(record.match_title.as_deref(), Some("M9001"));
    }

    #[test]
    fn standings_order_by_points_then_net_run_rate() {
        let db = test_db();
        let t1 = db.upsert_team(&sample_team(101, "Alpha")).unwrap();
        let t2 = db.upsert_team(&sample_team(102, "Beta")).unwrap();
        let t3 = db.upsert_team(&sample_team(103, "Gamma")).unwrap();

        for (team_id, points, nrr) in [(t1, 16, Some(0.3)), (t2, 18, None), (t3, 16, Some(0.9))] {
            db.upsert_standing(&NewStanding {
                team_id,
                round: "Final".to_string(),
                played: 14,
                wins: points / 2,
                losses: 14 - points / 2,
                ties: 0,
                no_result: 0,
                points,
                net_run_rate: nrr,
                position: None,
            })
            .unwrap();
        }

        let view = db.standings_view(Some("Final")).unwrap();
        assert_eq!(view[0].team.title, "Beta"); // 18 points
        assert_eq!(view[1].team.title, "Gamma"); // 16 points, higher NRR
        assert_eq!(view[2].team.title, "Alpha");
    }

    #[test]
    fn team_performance_zero_played_is_zero_percent() {
        let db = test_db();
        let team_a = db.upsert_team(&sample_team(101, "Active")).unwrap();
        db.upsert_team(&sample_team(102, "Idle")).unwrap();
        let mut m = sample_match(9001, Some(team_a), None);
        m.winning_team_id = Some(team_a);
        db.upsert_match(&m).unwrap();

        let perf = db.team_performance().unwrap();
        assert_eq!(perf.len(), 2);
        assert_eq!(perf[0].name, "Active");
        assert_eq!(perf[0].matches_played, 1);
        assert_eq!(perf[0].matches_won, 1);
        assert_eq!(perf[0].win_percentage, 100.0);
        assert_eq!(perf[1].name, "Idle");
        assert_eq!(perf[1].win_percentage, 0.0);
    }
}
