//! External collaborator contracts (spec §1, §6). Their internals are
//! out of scope for this engine — the play-by-play physics, the
//! strength-of-schedule tiebreaker service, and playoff seed ordering
//! are all injected so this crate stays focused on orchestration.

use crate::models::{Player, StandingsRow};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerStatLine {
    pub player_id: u32,
    pub team_id: u32,
    pub stats: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSimulationResult {
    pub home_score: u32,
    pub away_score: u32,
    pub overtime_periods: u8,
    pub duration_minutes: u32,
    pub player_stats: Vec<PlayerStatLine>,
}

/// §6 `GameSimulator` contract. Implemented by the play-by-play engine,
/// which this crate does not own.
pub trait GameSimulator {
    fn simulate(
        &self,
        home_team_id: u32,
        away_team_id: u32,
        home_roster: &[Player],
        away_roster: &[Player],
        seed: Option<u64>,
    ) -> Result<GameSimulationResult, String>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftPick {
    pub overall: u32,
    pub round: u8,
    pub pick_in_round: u8,
    pub team_id: u32,
    pub reason: String,
}

/// §6 `DraftOrderService` contract — implements strength-of-schedule
/// tiebreaking (`sum(opponent_win_pct) / 17`); lower SoS picks earlier.
pub trait DraftOrderService {
    fn compute_draft_order(&self, standings: &[StandingsRow]) -> Vec<DraftPick>;
}

/// §6 `PlayoffSeedingService` contract — takes one conference's division
/// standings and returns 7 ordered seeds.
pub trait PlayoffSeedingService {
    fn seed(&self, conference_standings: &[StandingsRow]) -> Vec<u32>;
}
