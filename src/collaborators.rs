//! Default collaborators wired into the binary so `gridiron_dynasty` is
//! runnable standalone, matching the teacher's `main.rs` wiring a real
//! `FootballSimulator` directly rather than leaving it injected at the
//! type level all the way out to `main`. An embedding application is
//! free to swap any of these three for its own `GameSimulator` /
//! `DraftOrderService` / `PlayoffSeedingService` — `SeasonController`
//! never assumes which one it got.

use dynasty_core::external::{DraftOrderService, DraftPick, GameSimulationResult, GameSimulator, PlayerStatLine};
use dynasty_core::models::{Player, StandingsRow};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cell::RefCell;

/// Scores a game as two independent point totals drawn from a range
/// typical of a completed NFL game, with a small chance of overtime
/// when the draw lands on a tie. Seeded per call from `seed`, falling
/// back to entropy when the caller passes `None` (exhibition play, not
/// a persisted game).
pub struct DemoSimulator {
    rng: RefCell<StdRng>,
}

impl Default for DemoSimulator {
    fn default() -> Self {
        DemoSimulator { rng: RefCell::new(StdRng::from_entropy()) }
    }
}

impl GameSimulator for DemoSimulator {
    fn simulate(
        &self,
        home_team_id: u32,
        away_team_id: u32,
        home_roster: &[Player],
        away_roster: &[Player],
        seed: Option<u64>,
    ) -> Result<GameSimulationResult, String> {
        let seed = seed.unwrap_or_else(|| self.rng.borrow_mut().gen());
        let mut rng = StdRng::seed_from_u64(seed);

        let mut home_score = rng.gen_range(3..=38);
        let mut away_score = rng.gen_range(3..=38);
        let mut overtime_periods = 0;
        if home_score == away_score {
            overtime_periods = 1;
            home_score += rng.gen_range(0..=7);
            away_score += rng.gen_range(0..=7);
        }

        let mut player_stats = Vec::new();
        for (team_id, roster) in [(home_team_id, home_roster), (away_team_id, away_roster)] {
            for player in roster.iter().take(5) {
                player_stats.push(PlayerStatLine {
                    player_id: player.id,
                    team_id,
                    stats: serde_json::json!({ "snaps": rng.gen_range(10..=70) }),
                });
            }
        }

        Ok(GameSimulationResult {
            home_score,
            away_score,
            overtime_periods,
            duration_minutes: 180,
            player_stats,
        })
    }
}

/// Strength-of-schedule draft order (spec §6): worst winning percentage
/// picks first, ties broken by the mean winning percentage of the
/// teams on a club's own schedule (a weaker schedule of opponents picks
/// earlier). Produces all 7 rounds in the same team order — this engine
/// does not model trade-driven pick swaps here, only ownership via
/// `DraftPickAsset`.
pub struct DefaultDraftOrder;

impl DraftOrderService for DefaultDraftOrder {
    fn compute_draft_order(&self, standings: &[StandingsRow]) -> Vec<DraftPick> {
        let win_pct_by_team: std::collections::HashMap<u32, f64> =
            standings.iter().map(|row| (row.team_id, row.win_pct())).collect();

        let strength_of_schedule = |row: &StandingsRow| -> f64 {
            if row.schedule.is_empty() {
                return 0.0;
            }
            let sum: f64 = row.schedule.iter().filter_map(|opponent| win_pct_by_team.get(opponent)).sum();
            sum / row.schedule.len() as f64
        };

        let mut ordered: Vec<&StandingsRow> = standings.iter().collect();
        ordered.sort_by(|a, b| {
            a.win_pct()
                .partial_cmp(&b.win_pct())
                .unwrap()
                .then_with(|| strength_of_schedule(a).partial_cmp(&strength_of_schedule(b)).unwrap())
        });

        let mut picks = Vec::new();
        for round in 1u8..=7 {
            for (index, row) in ordered.iter().enumerate() {
                let pick_in_round = index as u8 + 1;
                picks.push(DraftPick {
                    overall: (round as u32 - 1) * ordered.len() as u32 + pick_in_round as u32,
                    round,
                    pick_in_round,
                    team_id: row.team_id,
                    reason: format!("win pct {:.3}, SoS {:.3}", row.win_pct(), strength_of_schedule(row)),
                });
            }
        }
        picks
    }
}

/// Seeds a conference 1 through 7 by winning percentage, ties broken by
/// point differential (spec §4.6/§4.11; the spec leaves the exact
/// tiebreak open, point differential is the simplest well-defined one).
pub struct DefaultPlayoffSeeding;

impl dynasty_core::external::PlayoffSeedingService for DefaultPlayoffSeeding {
    fn seed(&self, conference_standings: &[StandingsRow]) -> Vec<u32> {
        let mut rows: Vec<&StandingsRow> = conference_standings.iter().collect();
        rows.sort_by(|a, b| {
            b.win_pct()
                .partial_cmp(&a.win_pct())
                .unwrap()
                .then_with(|| {
                    let diff_a = a.points_for as i64 - a.points_against as i64;
                    let diff_b = b.points_for as i64 - b.points_against as i64;
                    diff_b.cmp(&diff_a)
                })
        });
        rows.into_iter().take(7).map(|row| row.team_id).collect()
    }
}
