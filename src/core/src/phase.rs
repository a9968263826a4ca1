use crate::events::event::EventKind;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// League calendar phase (spec §3, §4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Offseason,
    Preseason,
    RegularSeason,
    Playoffs,
    OffseasonHonors,
    OffseasonFa,
    OffseasonDraft,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Offseason => "OFFSEASON",
            Phase::Preseason => "PRESEASON",
            Phase::RegularSeason => "REGULAR_SEASON",
            Phase::Playoffs => "PLAYOFFS",
            Phase::OffseasonHonors => "OFFSEASON_HONORS",
            Phase::OffseasonFa => "OFFSEASON_FA",
            Phase::OffseasonDraft => "OFFSEASON_DRAFT",
        };
        write!(f, "{s}")
    }
}

impl Phase {
    /// Whether `kind` is permitted to dispatch while this phase is active
    /// (spec §4.4 table). `Playoffs` additionally restricts
    /// `RetirementCheck` to after the Super Bowl — that refinement is
    /// applied by the caller, which knows whether the Super Bowl has run.
    pub fn permits(&self, kind: EventKind) -> bool {
        use EventKind::*;
        match self {
            Phase::Offseason => matches!(kind, FaWaveTick | Deadline | RetirementCheck),
            Phase::Preseason => matches!(kind, Game | Deadline),
            Phase::RegularSeason => matches!(kind, Game | Trade | Deadline | FaWaveTick),
            Phase::Playoffs => matches!(kind, Game | RetirementCheck),
            Phase::OffseasonHonors => matches!(kind, PhaseHook),
            Phase::OffseasonFa => matches!(kind, FaWaveTick | Trade | Deadline),
            Phase::OffseasonDraft => matches!(kind, DraftPick),
        }
    }
}

/// Current phase/date/week/season-year for one dynasty (spec §3 `PhaseState`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseState {
    pub phase: Phase,
    pub current_date: NaiveDate,
    pub current_week: Option<u32>,
    pub season_year: i32,
    /// Set once the Super Bowl of `season_year` has executed; gates
    /// `RetirementCheck` during `Playoffs` per spec §4.4.
    pub super_bowl_played: bool,
}

impl PhaseState {
    pub fn new(season_year: i32, current_date: NaiveDate) -> Self {
        PhaseState {
            phase: Phase::Offseason,
            current_date,
            current_week: None,
            season_year,
            super_bowl_played: false,
        }
    }

    /// Whether `kind` may dispatch right now, honoring the Playoffs/
    /// Super Bowl refinement the bare `Phase::permits` table can't express.
    pub fn permits(&self, kind: EventKind) -> bool {
        if self.phase == Phase::Playoffs && kind == EventKind::RetirementCheck {
            return self.super_bowl_played;
        }
        self.phase.permits(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regular_season_permits_trade_but_not_draft_pick() {
        assert!(Phase::RegularSeason.permits(EventKind::Trade));
        assert!(!Phase::RegularSeason.permits(EventKind::DraftPick));
    }

    #[test]
    fn playoffs_blocks_retirement_check_until_super_bowl_played() {
        let mut state = PhaseState::new(2025, NaiveDate::from_ymd_opt(2026, 1, 10).unwrap());
        state.phase = Phase::Playoffs;
        assert!(!state.permits(EventKind::RetirementCheck));
        state.super_bowl_played = true;
        assert!(state.permits(EventKind::RetirementCheck));
    }
}
