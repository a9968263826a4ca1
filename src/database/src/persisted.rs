//! On-disk shape of a dynasty's tables.
//!
//! `serde_json` can serialize a `HashMap` keyed by an integer (the key
//! is stringified), but not one keyed by a tuple, so the handful of
//! composite-keyed tables in `DynastyTables` are flattened to entry
//! lists here and rebuilt on load. Mirrors the teacher's habit of
//! keeping a separate on-disk entity shape (`CountryEntity`) distinct
//! from the domain struct it loads into.

use dynasty_core::models::{
    CapTransaction, CareerSummary, Contract, DraftPickAsset, GameResult, Player, PlayerGameStat,
    RetiredPlayer, SalaryCapRecord, SeasonType, StandingsRow, Team,
};
use dynasty_core::{Event, PhaseState};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandingsEntry {
    pub season: i32,
    pub team_id: u32,
    pub row: StandingsRow,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapRecordEntry {
    pub season: i32,
    pub team_id: u32,
    pub record: SalaryCapRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSeasonStatEntry {
    pub season: i32,
    pub player_id: u32,
    pub season_type: SeasonType,
    pub stats: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftPickEntry {
    pub season: i32,
    pub round: u8,
    pub pick_in_round: u8,
    pub asset: DraftPickAsset,
}

/// Serializable twin of `dynasty_core::store::DynastyTables`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersistedTables {
    pub phase_state: Option<PhaseState>,
    pub teams: HashMap<u32, Team>,
    pub players: HashMap<u32, Player>,
    pub contracts: HashMap<u64, Contract>,
    pub next_contract_id: u64,
    pub standings: Vec<StandingsEntry>,
    pub cap_records: Vec<CapRecordEntry>,
    pub cap_transactions: Vec<CapTransaction>,
    pub next_cap_transaction_id: u64,
    pub events: Vec<Event>,
    pub next_event_id: u64,
    pub next_insertion_order: u64,
    pub games: HashMap<String, GameResult>,
    pub player_game_stats: Vec<PlayerGameStat>,
    pub player_season_stats: Vec<PlayerSeasonStatEntry>,
    pub retired_players: Vec<RetiredPlayer>,
    pub career_summaries: HashMap<u32, CareerSummary>,
    pub draft_picks: Vec<DraftPickEntry>,
    pub super_bowl_champions: HashMap<i32, u32>,
}

impl From<&dynasty_core::DynastyTables> for PersistedTables {
    fn from(tables: &dynasty_core::DynastyTables) -> Self {
        PersistedTables {
            phase_state: tables.phase_state.clone(),
            teams: tables.teams.clone(),
            players: tables.players.clone(),
            contracts: tables.contracts.clone(),
            next_contract_id: tables.next_contract_id,
            standings: tables
                .standings
                .iter()
                .map(|(&(season, team_id), row)| StandingsEntry { season, team_id, row: row.clone() })
                .collect(),
            cap_records: tables
                .cap_records
                .iter()
                .map(|(&(season, team_id), record)| CapRecordEntry { season, team_id, record: record.clone() })
                .collect(),
            cap_transactions: tables.cap_transactions.clone(),
            next_cap_transaction_id: tables.next_cap_transaction_id,
            events: tables.events.clone(),
            next_event_id: tables.next_event_id,
            next_insertion_order: tables.next_insertion_order,
            games: tables.games.clone(),
            player_game_stats: tables.player_game_stats.clone(),
            player_season_stats: tables
                .player_season_stats
                .iter()
                .map(|(&(season, player_id, season_type), stats)| PlayerSeasonStatEntry {
                    season,
                    player_id,
                    season_type,
                    stats: stats.clone(),
                })
                .collect(),
            retired_players: tables.retired_players.clone(),
            career_summaries: tables.career_summaries.clone(),
            draft_picks: tables
                .draft_picks
                .iter()
                .map(|(&(season, round, pick_in_round), asset)| DraftPickEntry {
                    season,
                    round,
                    pick_in_round,
                    asset: asset.clone(),
                })
                .collect(),
            super_bowl_champions: tables.super_bowl_champions.clone(),
        }
    }
}

impl From<PersistedTables> for dynasty_core::DynastyTables {
    fn from(persisted: PersistedTables) -> Self {
        let mut tables = dynasty_core::DynastyTables::new();
        tables.phase_state = persisted.phase_state;
        tables.teams = persisted.teams;
        tables.players = persisted.players;
        tables.contracts = persisted.contracts;
        tables.next_contract_id = persisted.next_contract_id;
        tables.standings = persisted
            .standings
            .into_iter()
            .map(|e| ((e.season, e.team_id), e.row))
            .collect();
        tables.cap_records = persisted
            .cap_records
            .into_iter()
            .map(|e| ((e.season, e.team_id), e.record))
            .collect();
        tables.cap_transactions = persisted.cap_transactions;
        tables.next_cap_transaction_id = persisted.next_cap_transaction_id;
        tables.events = persisted.events;
        tables.next_event_id = persisted.next_event_id;
        tables.next_insertion_order = persisted.next_insertion_order;
        tables.games = persisted.games;
        tables.player_game_stats = persisted.player_game_stats;
        tables.player_season_stats = persisted
            .player_season_stats
            .into_iter()
            .map(|e| ((e.season, e.player_id, e.season_type), e.stats))
            .collect();
        tables.retired_players = persisted.retired_players;
        tables.career_summaries = persisted.career_summaries;
        tables.draft_picks = persisted
            .draft_picks
            .into_iter()
            .map(|e| ((e.season, e.round, e.pick_in_round), e.asset))
            .collect();
        tables.super_bowl_champions = persisted.super_bowl_champions;
        tables
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dynasty_core::models::StandingsRow;

    #[test]
    fn tuple_keyed_tables_round_trip_through_the_flattened_shape() {
        let mut tables = dynasty_core::DynastyTables::new();
        let mut row = StandingsRow::new(7, 2025);
        row.record_result(12, 27, 20, false, true);
        tables.standings.insert((2025, 7), row);
        tables
            .player_season_stats
            .insert((2025, 99, SeasonType::RegularSeason), serde_json::json!({ "passing_yards": 3412 }));

        let persisted = PersistedTables::from(&tables);
        let json = serde_json::to_string(&persisted).expect("serializing flattened tables");
        let reloaded: PersistedTables = serde_json::from_str(&json).expect("parsing flattened tables");
        let rebuilt = dynasty_core::DynastyTables::from(reloaded);

        let row = rebuilt.standings.get(&(2025, 7)).expect("standings row survives round trip");
        assert_eq!(row.wins, 1);
        assert_eq!(
            rebuilt.player_season_stats.get(&(2025, 99, SeasonType::RegularSeason)),
            Some(&serde_json::json!({ "passing_yards": 3412 }))
        );
    }
}
