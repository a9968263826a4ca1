//! Player valuation curve, draft-pick chart, and fairness ratio (spec
//! §4.9). Pure functions — no store access — so the GM proposal engine
//! and the transaction validator can both score candidates without
//! paying for a transaction.

use crate::models::{DraftPickAsset, Player, Position, TradeSide};

/// Peak age and post-peak decline rate per position, used by
/// `age_curve`. Values are illustrative league rules, not tunable at
/// runtime (spec §1 Non-goals: no pluggable rules engine).
fn peak_age_and_decline(position: Position) -> (u8, f64) {
    match position {
        Position::Qb => (29, 0.02),
        Position::Rb => (25, 0.08),
        Position::Wr | Position::Cb => (27, 0.04),
        Position::Te | Position::S | Position::Lb => (27, 0.035),
        Position::Lt | Position::Ol | Position::Dl | Position::Edge => (28, 0.025),
        Position::K | Position::P => (30, 0.01),
    }
}

/// Multiplier for age relative to a position's peak: 1.0 at peak,
/// decaying geometrically past it, gently rising toward peak before it.
fn age_curve(position: Position, age: u8) -> f64 {
    let (peak, decline) = peak_age_and_decline(position);
    let distance = age as f64 - peak as f64;
    if distance <= 0.0 {
        1.0 - 0.01 * distance.abs().min(5.0)
    } else {
        (1.0 - decline).powf(distance)
    }
}

/// +20% for a team-friendly contract (cap hit well under market value
/// for the player's overall), -30% for an overpaid one (spec §4.9).
/// `cap_hit` is the player's current-year cap number; `market_estimate`
/// is `base_value(overall) * 1_000_000` scaled to dollars, a rough
/// proxy this engine does not need to get precisely right since it
/// only nudges an already-heuristic value.
fn contract_adjustment(cap_hit: i64, market_estimate: i64) -> f64 {
    if market_estimate <= 0 {
        return 1.0;
    }
    let ratio = cap_hit as f64 / market_estimate as f64;
    if ratio < 0.7 {
        1.2
    } else if ratio > 1.4 {
        0.7
    } else {
        1.0
    }
}

/// Base value before position/age/contract adjustments (spec §4.9).
fn base_value(overall: u8) -> f64 {
    (overall as f64 - 50.0).max(0.0).powf(1.8) / 3.0
}

/// Full player trade value: base * position multiplier * age curve *
/// contract adjustment (spec §4.9). `cap_hit` is the player's
/// current-year cap number, or `None` for a player with no contract on
/// record (valued at 1.0x, no adjustment).
pub fn player_value(player: &Player, cap_hit: Option<i64>) -> f64 {
    let base = base_value(player.overall);
    let position_mult = player.position.value_multiplier();
    let age_mult = age_curve(player.position, player.age);
    let contract_mult = match cap_hit {
        Some(hit) => contract_adjustment(hit, (base * 1_000_000.0) as i64),
        None => 1.0,
    };
    base * position_mult * age_mult * contract_mult
}

/// Pick-1 anchor and per-pick decay for `draft_pick_value` (spec §4.9:
/// "pick 1 = 3000, pick 32 ~= 590").
const PICK_ONE_VALUE: f64 = 3000.0;
const PICK_DECAY: f64 = 0.95;

/// Exponential-decay chart value for one draft slot, `overall_pick` is
/// 1-based across the full draft (round 1 pick 1 = 1, round 2 pick 1 = 33, ...).
fn pick_chart_value(overall_pick: u32) -> f64 {
    PICK_ONE_VALUE * PICK_DECAY.powi(overall_pick as i32 - 1)
}

fn overall_pick_number(round: u8, pick_in_round: u8) -> u32 {
    (round as u32 - 1) * 32 + pick_in_round as u32
}

/// Draft-pick value discounted for distance into the future: future
/// picks are worth `0.95^(years_out)` of their chart value (spec §4.9).
pub fn draft_pick_value(pick: &DraftPickAsset, current_season: i32) -> f64 {
    let chart = pick_chart_value(overall_pick_number(pick.round, pick.pick_in_round));
    let years_out = (pick.season - current_season).max(0) as i32;
    chart * 0.95f64.powi(years_out)
}

/// Total value of one side of a trade: sum of player values (no cap
/// context available here — callers that have it should value players
/// directly and sum) plus discounted pick values.
pub fn side_value(side: &TradeSide, players: &[&Player], cap_hits: &[Option<i64>], current_season: i32) -> f64 {
    let player_total: f64 = players
        .iter()
        .zip(cap_hits.iter())
        .map(|(p, hit)| player_value(p, *hit))
        .sum();
    let pick_total: f64 = side.picks.iter().map(|p| draft_pick_value(p, current_season)).sum();
    player_total + pick_total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Player;

    #[test]
    fn higher_overall_is_worth_more() {
        let low = Player::new(1, "Low", Position::Wr, 60, 25);
        let high = Player::new(2, "High", Position::Wr, 95, 25);
        assert!(player_value(&high, None) > player_value(&low, None));
    }

    #[test]
    fn quarterbacks_are_valued_above_running_backs_at_equal_overall() {
        let qb = Player::new(3, "QB", Position::Qb, 88, 27);
        let rb = Player::new(4, "RB", Position::Rb, 88, 25);
        assert!(player_value(&qb, None) > player_value(&rb, None));
    }

    #[test]
    fn pick_one_outvalues_pick_thirty_two() {
        let pick1 = DraftPickAsset::new(2025, 1, 1, 7, 7);
        let pick32 = DraftPickAsset::new(2025, 1, 32, 7, 7);
        assert!(draft_pick_value(&pick1, 2025) > draft_pick_value(&pick32, 2025));
        assert!(pick_chart_value(32) < 700.0 && pick_chart_value(32) > 500.0);
    }

    #[test]
    fn future_picks_are_discounted() {
        let pick = DraftPickAsset::new(2027, 1, 1, 7, 7);
        assert!(draft_pick_value(&pick, 2025) < draft_pick_value(&pick, 2027));
    }
}
