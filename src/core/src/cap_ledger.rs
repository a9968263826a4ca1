//! Authoritative cap math (spec §4.7). Every mutation here appends a
//! `CapTransaction` row; callers never adjust `SalaryCapRecord` fields
//! directly.

use crate::constants::CAP_GRACE_BPS;
use crate::error::{CoreError, CoreResult};
use crate::models::{CapTransaction, CapTransactionKind, Contract, ContractStatus, SalaryCapRecord};
use crate::store::DynastyTables;
use chrono::NaiveDate;
use log::{info, warn};

/// Sum of active-contract cap hits for `team_id` in `season`, including
/// void years the team carries from past restructures.
pub fn active_cap_hits(tables: &DynastyTables, team_id: u32, season: i32) -> i64 {
    tables
        .contracts_for_team(team_id)
        .into_iter()
        .map(|c| cap_hit_for_season(c, season))
        .sum()
}

/// A contract's cap hit for `season`: its real-year hit if `season`
/// falls within the signed years, otherwise its void-year hit if
/// `season` falls within the trailing void years, otherwise zero (the
/// contract has expired for cap purposes).
fn cap_hit_for_season(contract: &Contract, season: i32) -> i64 {
    let year_index = contract.year_index_for(season);
    if year_index < contract.years as usize {
        contract.cap_hit(year_index)
    } else {
        let void_index = year_index - contract.years as usize;
        contract.void_year_cap_hit(void_index)
    }
}

fn record(
    tables: &mut DynastyTables,
    team_id: u32,
    date: NaiveDate,
    kind: CapTransactionKind,
    cap_impact_current: i64,
    cap_impact_future: i64,
    description: impl Into<String>,
) {
    let id = tables.next_cap_transaction_id();
    tables.append_cap_transaction(CapTransaction {
        id,
        team_id,
        date,
        kind,
        cap_impact_current,
        cap_impact_future,
        description: description.into(),
    });
}

/// Sign a new contract: the player's first-year cap hit lands on the
/// signing team immediately (spec §4.7).
pub fn record_signing(tables: &mut DynastyTables, contract: &Contract, date: NaiveDate) {
    let year_index = contract.year_index_for(contract.signed_season);
    let current = contract.cap_hit(year_index);
    let future = contract.total_value() - current;
    record(
        tables,
        contract.team_id,
        date,
        CapTransactionKind::Signing,
        current,
        future,
        format!("signed player {} ({} yrs, ${})", contract.player_id, contract.years, contract.signing_bonus_total),
    );
}

/// Release a player: the contract's remaining unaccelerated proration
/// becomes dead money against the releasing team (spec §4.7 "dead money
/// created").
pub fn record_cut(tables: &mut DynastyTables, player_id: u32, season: i32, date: NaiveDate) -> CoreResult<()> {
    let (team_id, dead) = {
        let contract = tables
            .contract_for_player_mut(player_id)
            .ok_or_else(|| CoreError::not_found(format!("active contract for player {player_id}")))?;
        let team_id = contract.team_id;
        let year_index = contract.year_index_for(season);
        let dead = contract.remaining_proration(year_index);
        contract.status = ContractStatus::Released;
        (team_id, dead)
    };

    if let Some(player) = tables.players.get_mut(&player_id) {
        player.team_id = None;
    }

    let record_entry = tables
        .cap_records
        .entry((season, team_id))
        .or_insert_with(|| SalaryCapRecord::new(team_id, season, 0, 0));
    record_entry.dead_money += dead;

    record(
        tables,
        team_id,
        date,
        CapTransactionKind::Cut,
        dead,
        0,
        format!("released player {player_id}, ${dead} accelerated to dead money"),
    );
    Ok(())
}

/// Move an active contract to a new team. Proration travels with the
/// contract unvaried; each side logs the resulting cap delta (spec §4.7
/// "cap delta for team A / team B").
pub fn record_trade(
    tables: &mut DynastyTables,
    player_id: u32,
    new_team_id: u32,
    season: i32,
    date: NaiveDate,
) -> CoreResult<()> {
    let (old_team_id, incoming_hit) = {
        let contract = tables
            .contract_for_player_mut(player_id)
            .ok_or_else(|| CoreError::not_found(format!("active contract for player {player_id}")))?;
        let old_team_id = contract.team_id;
        contract.team_id = new_team_id;
        let year_index = contract.year_index_for(season);
        (old_team_id, contract.cap_hit(year_index))
    };

    if let Some(player) = tables.players.get_mut(&player_id) {
        player.team_id = Some(new_team_id);
    }

    record(
        tables,
        old_team_id,
        date,
        CapTransactionKind::Trade,
        -incoming_hit,
        0,
        format!("traded away player {player_id}"),
    );
    record(
        tables,
        new_team_id,
        date,
        CapTransactionKind::Trade,
        incoming_hit,
        0,
        format!("acquired player {player_id}"),
    );
    Ok(())
}

/// Restructure an active contract: convert future base salary
/// (unaccelerated proration) into signing-bonus-style proration spread
/// over the remaining years plus `extra_void_years` (spec §4.7
/// "prorated-bonus acceleration").
pub fn record_restructure(
    tables: &mut DynastyTables,
    player_id: u32,
    season: i32,
    extra_void_years: u8,
    date: NaiveDate,
) -> CoreResult<()> {
    let contract = tables
        .contract_for_player_mut(player_id)
        .ok_or_else(|| CoreError::not_found(format!("active contract for player {player_id}")))?;
    let team_id = contract.team_id;
    let year_index = contract.year_index_for(season);
    let before = contract.cap_hit(year_index);
    contract.restructure(year_index, extra_void_years);
    let after = contract.cap_hit(year_index);

    record(
        tables,
        team_id,
        date,
        CapTransactionKind::Restructure,
        after - before,
        before - after,
        format!("restructured player {player_id} contract, +{extra_void_years} void years"),
    );
    Ok(())
}

/// Unused cap space rolls into next season's carryover (spec §4.7
/// "carryover").
pub fn apply_carryover(tables: &mut DynastyTables, team_id: u32, season: i32, cap_limit: i64) {
    let active = active_cap_hits(tables, team_id, season);
    let record_entry = tables.cap_records.entry((season, team_id)).or_insert_with(|| {
        SalaryCapRecord::new(team_id, season, cap_limit, 0)
    });
    let unused = (record_entry.cap_limit + record_entry.carryover - active - record_entry.dead_money).max(0);
    tables
        .cap_records
        .entry((season + 1, team_id))
        .or_insert_with(|| SalaryCapRecord::new(team_id, season + 1, cap_limit, 0))
        .carryover = unused;
}

/// Final-roster deadline compliance check (spec §4.7 invariant 2). A
/// non-compliant team raises `CapViolation` with one reason per team,
/// which the caller (season controller) surfaces as a blocking error —
/// dispatch of further events for the day does not continue past this
/// check when it fails.
pub fn check_cap_compliance(tables: &DynastyTables, season: i32) -> CoreResult<()> {
    let mut reasons = Vec::new();
    for team_id in 1u32..=32 {
        let Some(cap_record) = tables.cap_records.get(&(season, team_id)) else {
            continue;
        };
        let active = active_cap_hits(tables, team_id, season);
        let space = cap_record.cap_space(active);
        if space < 0 {
            reasons.push(format!(
                "team {team_id} over cap by {} (limit {}, carryover {}, active {}, dead {})",
                -space, cap_record.cap_limit, cap_record.carryover, active, cap_record.dead_money
            ));
        }
    }
    if reasons.is_empty() {
        info!("cap compliance check passed for season {season}");
        Ok(())
    } else {
        warn!("cap compliance failures for season {season}: {}", reasons.join("; "));
        Err(CoreError::CapViolation(reasons))
    }
}

/// In-season grace a transaction may push a team's cap space negative
/// by before the validator rejects it (spec §4.8).
pub fn grace_allowance(cap_limit: i64) -> i64 {
    cap_limit * CAP_GRACE_BPS / 10_000
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Contract;

    fn sample_contract(id: u64, player_id: u32, team_id: u32) -> Contract {
        Contract::new(
            id,
            player_id,
            team_id,
            2025,
            vec![1_000_000; 3],
            3_000_000,
            vec![0; 3],
            vec![0; 3],
            vec![0; 3],
            0,
        )
    }

    #[test]
    fn record_cut_moves_remaining_proration_to_dead_money() {
        let mut tables = DynastyTables::new();
        let contract = sample_contract(1, 100, 7);
        tables.players.insert(100, crate::models::Player::new(100, "Test", crate::models::Position::Wr, 80, 25));
        tables.players.get_mut(&100).unwrap().team_id = Some(7);
        tables.contracts.insert(1, contract);

        record_cut(&mut tables, 100, 2025, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()).unwrap();

        let cap_record = tables.cap_records.get(&(2025, 7)).unwrap();
        assert_eq!(cap_record.dead_money, 1_000_000);
        assert_eq!(tables.contracts.get(&1).unwrap().status, ContractStatus::Released);
    }

    #[test]
    fn record_trade_swaps_team_and_logs_both_sides() {
        let mut tables = DynastyTables::new();
        let contract = sample_contract(2, 200, 7);
        tables.players.insert(200, crate::models::Player::new(200, "Test2", crate::models::Position::Cb, 85, 24));
        tables.players.get_mut(&200).unwrap().team_id = Some(7);
        tables.contracts.insert(2, contract);

        record_trade(&mut tables, 200, 22, 2025, NaiveDate::from_ymd_opt(2025, 10, 15).unwrap()).unwrap();

        assert_eq!(tables.contracts.get(&2).unwrap().team_id, 22);
        assert_eq!(tables.players.get(&200).unwrap().team_id, Some(22));
        assert_eq!(tables.cap_transactions.len(), 2);
    }

    #[test]
    fn cap_compliance_flags_teams_over_the_limit() {
        let mut tables = DynastyTables::new();
        tables.cap_records.insert((2025, 7), SalaryCapRecord::new(7, 2025, 1_000_000, 0));
        let mut over_contract = sample_contract(3, 300, 7);
        over_contract.base_salary = vec![2_000_000; 3];
        tables.players.insert(300, crate::models::Player::new(300, "Over", crate::models::Position::Qb, 90, 27));
        tables.players.get_mut(&300).unwrap().team_id = Some(7);
        tables.contracts.insert(3, over_contract);

        let result = check_cap_compliance(&tables, 2025);
        assert!(matches!(result, Err(CoreError::CapViolation(_))));
    }
}
