use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Closed set of event kinds (spec §3 + the `TRADE` kind implied by the
/// §4.4 phase-permission table). Dispatch is a match on this enum to the
/// corresponding handler — no duck-typed plugin discovery (spec §9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Deadline,
    Trade,
    FaWaveTick,
    DraftPick,
    RetirementCheck,
    Game,
    PhaseHook,
}

impl EventKind {
    /// Dispatch-ordering priority within a date (spec §4.3): DEADLINE
    /// first, then transaction-like kinds (TRADE/FA_WAVE_TICK/
    /// DRAFT_PICK/RETIREMENT_CHECK), then GAME, then PHASE_HOOK last.
    /// Lower sorts first.
    pub fn priority(&self) -> u8 {
        match self {
            EventKind::Deadline => 0,
            EventKind::Trade | EventKind::FaWaveTick | EventKind::DraftPick | EventKind::RetirementCheck => 1,
            EventKind::Game => 2,
            EventKind::PhaseHook => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventStatus {
    Scheduled,
    Executed,
    Failed,
}

/// An entry in the append-only event store, keyed by `(dynasty, date)`
/// (spec §3/§4.2). `structured_id` is the stable, human-readable id used
/// for duplicate detection across reconstructions (spec §4.2, §4.11,
/// §9) — never the store's internal `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: u64,
    pub structured_id: String,
    pub date: NaiveDate,
    pub kind: EventKind,
    pub payload: serde_json::Value,
    pub status: EventStatus,
    pub result: Option<serde_json::Value>,
    /// Insertion order within the store, used as the dispatch tiebreaker
    /// after `kind.priority()` (spec §4.2 ordering rule).
    pub insertion_order: u64,
}

impl Event {
    pub fn new_scheduled(
        id: u64,
        structured_id: impl Into<String>,
        date: NaiveDate,
        kind: EventKind,
        payload: serde_json::Value,
        insertion_order: u64,
    ) -> Self {
        Event {
            id,
            structured_id: structured_id.into(),
            date,
            kind,
            payload,
            status: EventStatus::Scheduled,
            result: None,
            insertion_order,
        }
    }
}
