use serde::{Deserialize, Serialize};

/// `(season, round, pick_in_round)` plus ownership, per spec §3.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftPickAsset {
    pub season: i32,
    pub round: u8,
    pub pick_in_round: u8,
    pub owning_team_id: u32,
    pub origin_team_id: u32,
}

impl DraftPickAsset {
    pub fn new(season: i32, round: u8, pick_in_round: u8, owning_team_id: u32, origin_team_id: u32) -> Self {
        assert!((1..=7).contains(&round), "round must be in [1, 7]");
        DraftPickAsset {
            season,
            round,
            pick_in_round,
            owning_team_id,
            origin_team_id,
        }
    }

    pub fn is_traded(&self) -> bool {
        self.owning_team_id != self.origin_team_id
    }
}
