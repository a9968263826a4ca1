//! Per-player retirement probability, career stat rollup, and HoF
//! score (spec §4.12 row / §2 "Retirement & Career Summary").

use crate::models::{CareerSummary, RetiredPlayer};
use crate::store::DynastyTables;
use chrono::NaiveDate;
use log::info;
use rand::Rng;

/// Retirement probability rises steeply past 32, modeling the real
/// attrition curve; under 30 it is effectively never voluntary (injury
/// retirements are out of scope here, left to the `GameSimulator`
/// layer which owns injury state).
fn retirement_probability(age: u8, overall: u8) -> f64 {
    if age < 30 {
        return 0.0;
    }
    let age_factor = ((age as f64 - 29.0) / 8.0).clamp(0.0, 1.0);
    let skill_relief = ((overall as f64 - 70.0) / 60.0).clamp(0.0, 0.3);
    (age_factor - skill_relief).clamp(0.0, 0.95)
}

/// Non-mutating read of who is a retirement candidate this check (spec
/// §4.4 `RETIREMENT_CHECK`), for callers who want to draw the Bernoulli
/// outcome outside a store transaction (the season controller does
/// this so `impl Rng` never has to cross a transaction-closure boundary).
pub fn retirement_candidates(tables: &DynastyTables) -> Vec<(u32, u8, u8)> {
    tables
        .players
        .values()
        .filter(|p| !p.retired)
        .map(|p| (p.id, p.age, p.overall))
        .collect()
}

/// Draw the retirement outcome for each candidate (age, overall) using
/// `retirement_probability`; pure, no store access.
pub fn select_retirements(candidates: &[(u32, u8, u8)], rng: &mut impl Rng) -> Vec<u32> {
    candidates
        .iter()
        .filter(|(_, age, overall)| {
            let probability = retirement_probability(*age, *overall);
            probability > 0.0 && rng.gen_bool(probability)
        })
        .map(|(id, _, _)| *id)
        .collect()
}

/// Apply a precomputed set of retirements inside a transaction (spec
/// §4.4 `RETIREMENT_CHECK`).
pub fn apply_retirements(tables: &mut DynastyTables, retired_ids: &[u32], season: i32) {
    for &player_id in retired_ids {
        let (age, overall, team_id) = {
            let Some(player) = tables.players.get_mut(&player_id) else { continue };
            player.retired = true;
            let team_id = player.team_id.take();
            (player.age, player.overall, team_id)
        };
        tables.retired_players.push(RetiredPlayer {
            player_id,
            season,
            reason: "age-based retirement".to_string(),
            final_team_id: team_id,
        });
        tables
            .career_summaries
            .entry(player_id)
            .or_insert_with(|| CareerSummary::empty(player_id));
        info!("player {player_id} retired after season {season} (age {age}, overall {overall})");
    }
}

/// Roll one season's stat line into the player's career summary (spec
/// §3 "career_summaries"). `season_stats` is the `GameSimulator`-shaped
/// blob this engine merges without interpreting.
pub fn roll_up_career_season(tables: &mut DynastyTables, player_id: u32, season_stats: serde_json::Value) {
    let summary = tables
        .career_summaries
        .entry(player_id)
        .or_insert_with(|| CareerSummary::empty(player_id));
    summary.seasons_played += 1;
    merge_stats(&mut summary.career_totals, &season_stats);
    summary.hof_score = hof_score(summary);
}

fn merge_stats(totals: &mut serde_json::Value, season_stats: &serde_json::Value) {
    let (Some(totals_obj), Some(season_obj)) = (totals.as_object_mut(), season_stats.as_object()) else {
        return;
    };
    for (key, value) in season_obj {
        let existing = totals_obj.entry(key.clone()).or_insert(serde_json::json!(0));
        if let (Some(existing_num), Some(add_num)) = (existing.as_f64(), value.as_f64()) {
            *existing = serde_json::json!(existing_num + add_num);
        }
    }
}

/// A simple, monotonic HoF-likelihood score: seasons played weighted by
/// career production breadth (number of distinct stat categories with
/// nonzero totals, as a crude proxy this engine can compute without
/// knowing the stat schema).
fn hof_score(summary: &CareerSummary) -> f64 {
    let breadth = summary
        .career_totals
        .as_object()
        .map(|o| o.values().filter(|v| v.as_f64().unwrap_or(0.0) > 0.0).count())
        .unwrap_or(0);
    summary.seasons_played as f64 * (1.0 + breadth as f64 * 0.1)
}

pub fn retirement_date_for_offseason(season_year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(season_year + 1, 2, 1).expect("fixed calendar date")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Player, Position};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn young_players_never_retire() {
        let mut tables = DynastyTables::new();
        tables.players.insert(1, Player::new(1, "Young", Position::Wr, 85, 24));
        let mut rng = StdRng::seed_from_u64(1);
        let candidates = retirement_candidates(&tables);
        let retired = select_retirements(&candidates, &mut rng);
        assert!(retired.is_empty());
    }

    #[test]
    fn career_rollup_accumulates_across_seasons() {
        let mut tables = DynastyTables::new();
        roll_up_career_season(&mut tables, 7, serde_json::json!({ "passing_yards": 4000 }));
        roll_up_career_season(&mut tables, 7, serde_json::json!({ "passing_yards": 3500 }));
        let summary = tables.career_summaries.get(&7).unwrap();
        assert_eq!(summary.seasons_played, 2);
        assert_eq!(summary.career_totals["passing_yards"], 7500.0);
    }
}
