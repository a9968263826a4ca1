use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetiredPlayer {
    pub player_id: u32,
    pub season: i32,
    pub reason: String,
    pub final_team_id: Option<u32>,
}

/// Career totals + awards + Hall-of-Fame score (spec §3/§6
/// `career_summaries`). Per-stat totals are kept as a merged JSON blob
/// for the same reason as `PlayerGameStat::stats` — the statistical
/// shape is `GameSimulator`-defined, not owned by this engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CareerSummary {
    pub player_id: u32,
    pub seasons_played: u32,
    pub career_totals: serde_json::Value,
    pub awards: Vec<String>,
    pub hof_score: f64,
}

impl CareerSummary {
    pub fn empty(player_id: u32) -> Self {
        CareerSummary {
            player_id,
            seasons_played: 0,
            career_totals: serde_json::json!({}),
            awards: Vec::new(),
            hof_score: 0.0,
        }
    }
}
