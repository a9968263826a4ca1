use super::draft_pick::DraftPickAsset;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeSide {
    pub team_id: u32,
    pub player_ids: Vec<u32>,
    pub picks: Vec<DraftPickAsset>,
}

/// A proposed trade between two teams (spec §3). `value()` is computed
/// by the trade value model, not stored here — this type is pure data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeProposal {
    pub side_a: TradeSide,
    pub side_b: TradeSide,
    pub proposed_date: chrono::NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FairnessTier {
    VeryFair,
    Fair,
    Borderline,
    Reject,
}

impl FairnessTier {
    /// Fairness tiers by `min/max` ratio (spec §4.9).
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio >= 0.95 {
            FairnessTier::VeryFair
        } else if ratio >= 0.80 {
            FairnessTier::Fair
        } else if ratio >= 0.70 {
            FairnessTier::Borderline
        } else {
            FairnessTier::Reject
        }
    }
}

/// `min(v1, v2) / max(v1, v2)` — the fairness ratio of a trade (spec §3).
pub fn fairness_ratio(value_a: f64, value_b: f64) -> f64 {
    if value_a <= 0.0 && value_b <= 0.0 {
        return 1.0;
    }
    value_a.min(value_b) / value_a.max(value_b)
}
