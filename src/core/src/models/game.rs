use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeasonType {
    RegularSeason,
    Playoffs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameType {
    Regular,
    WildCard,
    Divisional,
    Conference,
    SuperBowl,
}

/// A completed box score (spec §6 `games` table).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameResult {
    pub game_id: String,
    pub season: i32,
    pub season_type: SeasonType,
    pub week: Option<u32>,
    pub game_type: GameType,
    pub home_team_id: u32,
    pub away_team_id: u32,
    pub home_score: u32,
    pub away_score: u32,
    pub overtime_periods: u8,
}

impl GameResult {
    pub fn winner(&self) -> Option<u32> {
        use std::cmp::Ordering;
        match self.home_score.cmp(&self.away_score) {
            Ordering::Greater => Some(self.home_team_id),
            Ordering::Less => Some(self.away_team_id),
            Ordering::Equal => None,
        }
    }
}

/// A single player's stat line for one game (spec §6
/// `player_game_stats`). The statistical columns themselves are a
/// `GameSimulator`-defined blob (spec §6 contract) — this engine stores
/// and aggregates them without needing to know their shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerGameStat {
    pub game_id: String,
    pub season_type: SeasonType,
    pub player_id: u32,
    pub team_id: u32,
    pub stats: serde_json::Value,
}
