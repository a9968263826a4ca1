//! Pure pre-flight transaction validation (spec §4.8): `(proposal,
//! ledger state, phase) -> Valid | Reasons[]`. Never touches the store;
//! callers pass in whatever `DynastyTables` view they already hold.

use crate::cap_ledger::{active_cap_hits, grace_allowance};
use crate::calendar::Calendar;
use crate::models::TradeProposal;
use crate::phase::{Phase, PhaseState};
use crate::store::DynastyTables;
use chrono::NaiveDate;

pub enum ValidationResult {
    Valid,
    Invalid(Vec<String>),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }
}

/// Validate a trade proposal against cap, phase, and roster-integrity
/// rules (spec §4.8). `season_start` anchors the trade-deadline check.
pub fn validate_trade(
    tables: &DynastyTables,
    proposal: &TradeProposal,
    phase_state: &PhaseState,
    season_start: NaiveDate,
) -> ValidationResult {
    let mut reasons = Vec::new();

    let deadline = Calendar::trade_deadline(season_start);
    let phase_permits = matches!(phase_state.phase, Phase::RegularSeason | Phase::OffseasonFa);
    if !phase_permits {
        reasons.push(format!("trades are not permitted during {}", phase_state.phase));
    } else if phase_state.phase == Phase::RegularSeason && phase_state.current_date >= deadline {
        reasons.push(format!("trade deadline {deadline} has passed"));
    }

    let duplicate_player = proposal
        .side_a
        .player_ids
        .iter()
        .any(|id| proposal.side_b.player_ids.contains(id));
    if duplicate_player {
        reasons.push("a player cannot appear on both sides of a trade".to_string());
    }

    for player_id in proposal.side_a.player_ids.iter().chain(proposal.side_b.player_ids.iter()) {
        match tables.players.get(player_id) {
            Some(p) if p.retired => reasons.push(format!("player {player_id} is retired")),
            None => reasons.push(format!("player {player_id} does not exist")),
            _ => {}
        }
    }

    let season = phase_state.season_year;
    for (side, incoming_team) in [(&proposal.side_a, proposal.side_b.team_id), (&proposal.side_b, proposal.side_a.team_id)] {
        let cap_limit = tables
            .cap_records
            .get(&(season, incoming_team))
            .map(|r| r.cap_limit)
            .unwrap_or(0);
        let grace = grace_allowance(cap_limit);
        let projected = active_cap_hits(tables, incoming_team, season)
            + side
                .player_ids
                .iter()
                .filter_map(|id| tables.contract_for_player(*id))
                .map(|c| c.cap_hit(c.year_index_for(season)))
                .sum::<i64>();
        if projected > cap_limit + grace {
            reasons.push(format!(
                "team {incoming_team} would exceed cap by more than grace ({grace}) after the trade"
            ));
        }
    }

    if reasons.is_empty() {
        ValidationResult::Valid
    } else {
        ValidationResult::Invalid(reasons)
    }
}

/// Validate a free-agent signing: rejects signing a retired player or
/// one already under contract elsewhere (spec §4.8).
pub fn validate_signing(tables: &DynastyTables, player_id: u32) -> ValidationResult {
    let mut reasons = Vec::new();
    match tables.players.get(&player_id) {
        Some(p) if p.retired => reasons.push(format!("player {player_id} is retired")),
        Some(p) if p.team_id.is_some() => reasons.push(format!("player {player_id} is already under contract")),
        None => reasons.push(format!("player {player_id} does not exist")),
        _ => {}
    }
    if reasons.is_empty() {
        ValidationResult::Valid
    } else {
        ValidationResult::Invalid(reasons)
    }
}

/// Validate a cut: the player must be under contract to the cutting
/// team (spec §4.8).
pub fn validate_cut(tables: &DynastyTables, player_id: u32, cutting_team_id: u32) -> ValidationResult {
    match tables.contract_for_player(player_id) {
        Some(c) if c.team_id == cutting_team_id => ValidationResult::Valid,
        Some(c) => ValidationResult::Invalid(vec![format!(
            "player {player_id} is under contract to team {}, not team {cutting_team_id}",
            c.team_id
        )]),
        None => ValidationResult::Invalid(vec![format!("player {player_id} has no active contract")]),
    }
}

/// Validate a restructure: the player must be under contract to the
/// restructuring team (spec §4.8), mirroring `validate_cut`'s ownership
/// check.
pub fn validate_restructure(tables: &DynastyTables, player_id: u32, team_id: u32) -> ValidationResult {
    match tables.contract_for_player(player_id) {
        Some(c) if c.team_id == team_id => ValidationResult::Valid,
        Some(c) => ValidationResult::Invalid(vec![format!(
            "player {player_id} is under contract to team {}, not team {team_id}",
            c.team_id
        )]),
        None => ValidationResult::Invalid(vec![format!("player {player_id} has no active contract")]),
    }
}

/// Validate a franchise tag use: only permitted inside the offseason
/// tag window, modeled here as `OFFSEASON` and `OFFSEASON_FA` (spec
/// §4.8 "tag window").
pub fn validate_franchise_tag(phase_state: &PhaseState) -> ValidationResult {
    if matches!(phase_state.phase, Phase::Offseason | Phase::OffseasonFa) {
        ValidationResult::Valid
    } else {
        ValidationResult::Invalid(vec![format!(
            "franchise tag cannot be used during {}",
            phase_state.phase
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TradeSide;

    #[test]
    fn rejects_trade_with_duplicate_player_on_both_sides() {
        let tables = DynastyTables::new();
        let proposal = TradeProposal {
            side_a: TradeSide { team_id: 1, player_ids: vec![42], picks: vec![] },
            side_b: TradeSide { team_id: 2, player_ids: vec![42], picks: vec![] },
            proposed_date: NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
        };
        let phase_state = PhaseState {
            phase: Phase::RegularSeason,
            current_date: NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
            current_week: Some(4),
            season_year: 2025,
            super_bowl_played: false,
        };
        let result = validate_trade(&tables, &proposal, &phase_state, NaiveDate::from_ymd_opt(2025, 9, 4).unwrap());
        assert!(!result.is_valid());
    }

    #[test]
    fn rejects_trade_after_deadline() {
        let tables = DynastyTables::new();
        let proposal = TradeProposal {
            side_a: TradeSide { team_id: 1, player_ids: vec![], picks: vec![] },
            side_b: TradeSide { team_id: 2, player_ids: vec![], picks: vec![] },
            proposed_date: NaiveDate::from_ymd_opt(2025, 11, 5).unwrap(),
        };
        let phase_state = PhaseState {
            phase: Phase::RegularSeason,
            current_date: NaiveDate::from_ymd_opt(2025, 11, 5).unwrap(),
            current_week: Some(10),
            season_year: 2025,
            super_bowl_played: false,
        };
        let result = validate_trade(&tables, &proposal, &phase_state, NaiveDate::from_ymd_opt(2025, 9, 4).unwrap());
        assert!(!result.is_valid());
    }

    #[test]
    fn validate_cut_rejects_wrong_team() {
        let mut tables = DynastyTables::new();
        let contract = crate::models::Contract::new(1, 9, 7, 2025, vec![1_000_000], 0, vec![0], vec![0], vec![0], 0);
        tables.contracts.insert(1, contract);
        let result = validate_cut(&tables, 9, 22);
        assert!(!result.is_valid());
    }

    #[test]
    fn validate_restructure_rejects_wrong_team() {
        let mut tables = DynastyTables::new();
        let contract = crate::models::Contract::new(1, 9, 7, 2025, vec![1_000_000; 2], 0, vec![0; 2], vec![0; 2], vec![0; 2], 0);
        tables.contracts.insert(1, contract);
        assert!(!validate_restructure(&tables, 9, 22).is_valid());
        assert!(validate_restructure(&tables, 9, 7).is_valid());
    }

    #[test]
    fn validate_franchise_tag_only_permitted_in_the_tag_window() {
        let mut phase_state = PhaseState {
            phase: Phase::RegularSeason,
            current_date: NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
            current_week: Some(4),
            season_year: 2025,
            super_bowl_played: false,
        };
        assert!(!validate_franchise_tag(&phase_state).is_valid());
        phase_state.phase = Phase::OffseasonFa;
        assert!(validate_franchise_tag(&phase_state).is_valid());
    }
}
