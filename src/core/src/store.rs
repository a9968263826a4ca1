use crate::error::{CoreError, CoreResult};
use crate::events::event::{Event, EventKind, EventStatus};
use crate::models::*;
use crate::phase::PhaseState;
use chrono::NaiveDate;
use std::collections::HashMap;

/// All per-dynasty state, held in memory and rebuilt from / written back
/// to the persistence store on every mutation (spec §5). Engine logic
/// (dispatcher, cap ledger, validator, controllers) operates on this
/// struct directly; the `database` crate owns only locking and
/// serialization of it (spec §9: "team roster is a query, not a field" —
/// access always goes through the methods below, never a materialized
/// object graph).
#[derive(Debug, Default, Clone)]
pub struct DynastyTables {
    pub phase_state: Option<PhaseState>,
    pub teams: HashMap<u32, Team>,
    pub players: HashMap<u32, Player>,
    pub contracts: HashMap<u64, Contract>,
    pub next_contract_id: u64,
    pub standings: HashMap<(i32, u32), StandingsRow>,
    pub cap_records: HashMap<(i32, u32), SalaryCapRecord>,
    pub cap_transactions: Vec<CapTransaction>,
    pub next_cap_transaction_id: u64,
    pub events: Vec<Event>,
    pub next_event_id: u64,
    pub next_insertion_order: u64,
    pub games: HashMap<String, GameResult>,
    pub player_game_stats: Vec<PlayerGameStat>,
    pub player_season_stats: HashMap<(i32, u32, SeasonType), serde_json::Value>,
    pub retired_players: Vec<RetiredPlayer>,
    pub career_summaries: HashMap<u32, CareerSummary>,
    pub draft_picks: HashMap<(i32, u8, u8), DraftPickAsset>,
    /// Super Bowl champion per season, set at the PLAYOFFS ->
    /// OFFSEASON_HONORS transition (spec §8 S6 "offseason honors row").
    pub super_bowl_champions: HashMap<i32, u32>,
}

impl DynastyTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn roster(&self, team_id: u32) -> Vec<&Player> {
        self.players
            .values()
            .filter(|p| p.team_id == Some(team_id))
            .collect()
    }

    pub fn free_agents(&self) -> Vec<&Player> {
        self.players.values().filter(|p| p.is_free_agent()).collect()
    }

    pub fn contracts_for_team(&self, team_id: u32) -> Vec<&Contract> {
        self.contracts
            .values()
            .filter(|c| c.team_id == team_id && c.status == ContractStatus::Active)
            .collect()
    }

    pub fn contract_for_player(&self, player_id: u32) -> Option<&Contract> {
        self.contracts
            .values()
            .find(|c| c.player_id == player_id && c.status == ContractStatus::Active)
    }

    pub fn contract_for_player_mut(&mut self, player_id: u32) -> Option<&mut Contract> {
        self.contracts
            .values_mut()
            .find(|c| c.player_id == player_id && c.status == ContractStatus::Active)
    }

    /// Idempotent insert keyed by `structured_id` (spec §4.2): if an
    /// event with the same structured id already exists for this
    /// dynasty, the insert is silently dropped and the prior event's
    /// internal id is returned.
    pub fn insert_event(
        &mut self,
        structured_id: impl Into<String>,
        date: NaiveDate,
        kind: EventKind,
        payload: serde_json::Value,
    ) -> u64 {
        let structured_id = structured_id.into();
        if let Some(existing) = self.events.iter().find(|e| e.structured_id == structured_id) {
            return existing.id;
        }
        let id = self.next_event_id;
        self.next_event_id += 1;
        let insertion_order = self.next_insertion_order;
        self.next_insertion_order += 1;
        self.events
            .push(Event::new_scheduled(id, structured_id, date, kind, payload, insertion_order));
        id
    }

    /// Events due on `date`, ordered by `(priority, insertion_order)`
    /// (spec §4.2).
    pub fn events_for_date(&self, date: NaiveDate) -> Vec<&Event> {
        let mut due: Vec<&Event> = self
            .events
            .iter()
            .filter(|e| e.date == date && e.status == EventStatus::Scheduled)
            .collect();
        due.sort_by_key(|e| (e.kind.priority(), e.insertion_order));
        due
    }

    pub fn events_for_date_range(&self, from: NaiveDate, to: NaiveDate) -> Vec<&Event> {
        let mut in_range: Vec<&Event> = self
            .events
            .iter()
            .filter(|e| e.date >= from && e.date <= to)
            .collect();
        in_range.sort_by_key(|e| (e.date, e.kind.priority(), e.insertion_order));
        in_range
    }

    pub fn events_by_structured_prefix(&self, prefix: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.structured_id.starts_with(prefix))
            .collect()
    }

    pub fn mark_executed(&mut self, event_id: u64, status: EventStatus, result: Option<serde_json::Value>) -> CoreResult<()> {
        let event = self
            .events
            .iter_mut()
            .find(|e| e.id == event_id)
            .ok_or_else(|| CoreError::not_found(format!("event {event_id}")))?;
        event.status = status;
        event.result = result;
        Ok(())
    }

    pub fn append_cap_transaction(&mut self, transaction: CapTransaction) {
        self.cap_transactions.push(transaction);
    }

    pub fn next_cap_transaction_id(&mut self) -> u64 {
        let id = self.next_cap_transaction_id;
        self.next_cap_transaction_id += 1;
        id
    }

    pub fn next_contract_id(&mut self) -> u64 {
        let id = self.next_contract_id;
        self.next_contract_id += 1;
        id
    }
}

/// Storage contract a dynasty-scoped engine depends on (spec §6). The
/// `database` crate provides the concrete implementation; `dynasty_core`
/// never touches a filesystem or lock directly, matching the teacher's
/// split between domain logic (`core`) and persistence (`database`).
pub trait DynastyStore: Send + Sync {
    /// Run `f` against this dynasty's tables under its serialization
    /// point (spec §5: "single-writer per dynasty"). If `f` returns
    /// `Err`, the mutation is rolled back and never reaches disk.
    fn with_transaction<T>(
        &self,
        dynasty: &DynastyId,
        f: Box<dyn FnOnce(&mut DynastyTables) -> CoreResult<T> + '_>,
    ) -> CoreResult<T>;

    /// Read-only access, no commit/rollback bookkeeping needed.
    fn read<T>(&self, dynasty: &DynastyId, f: Box<dyn FnOnce(&DynastyTables) -> T + '_>) -> CoreResult<T>;

    fn ensure_dynasty(&self, dynasty: &DynastyId) -> CoreResult<()>;
}

impl<T: DynastyStore + ?Sized> DynastyStore for std::sync::Arc<T> {
    fn with_transaction<U>(
        &self,
        dynasty: &DynastyId,
        f: Box<dyn FnOnce(&mut DynastyTables) -> CoreResult<U> + '_>,
    ) -> CoreResult<U> {
        (**self).with_transaction(dynasty, f)
    }

    fn read<U>(&self, dynasty: &DynastyId, f: Box<dyn FnOnce(&DynastyTables) -> U + '_>) -> CoreResult<U> {
        (**self).read(dynasty, f)
    }

    fn ensure_dynasty(&self, dynasty: &DynastyId) -> CoreResult<()> {
        (**self).ensure_dynasty(dynasty)
    }
}
