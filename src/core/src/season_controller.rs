//! Top-level coordinator (spec §4.12): owns the calendar mirror and
//! drives `AdvanceDay`/`AdvanceWeek`/`AdvanceToEndOfPhase`/
//! `SimulateToEndOfSeason`, delegating to the dispatcher, cap ledger,
//! validator, GM proposal engine, playoff controller, and retirement
//! module. Generic over the store and the three injected collaborators
//! (spec §6) so this crate never needs `dyn DynastyStore` — `with_transaction`
//! and `read` are generic over their callback's return type, which
//! makes the trait impossible to box as a trait object.

use crate::calendar::Calendar;
use crate::cap_ledger::{self, check_cap_compliance};
use crate::constants::{
    ADVANCE_TO_PHASE_DAY_LIMIT, FA_WAVE_RELEASE_OVERALL_THRESHOLD, REGULAR_SEASON_GAMES, TOTAL_REGULAR_SEASON_GAMES,
};
use crate::error::{CoreError, CoreResult};
use crate::events::{dispatch_date, Event, EventDispatchResult, EventKind, EventOutcome, EventStatus};
use crate::external::{DraftOrderService, GameSimulator, PlayoffSeedingService};
use crate::game_handler::{handle_game, GamePayload};
use crate::gm_proposal::{self, Archetype, GmAction};
use crate::models::{
    CareerSummary, DynastyId, GameType, SalaryCapRecord, SeasonType, StandingsRow, TradeProposal, TradeSide,
};
use crate::phase::{Phase, PhaseState};
use crate::playoff;
use crate::retirement;
use crate::store::{DynastyStore, DynastyTables};
use crate::structured_id::playoff_id;
use crate::validator::{self, ValidationResult};
use chrono::NaiveDate;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

pub struct DayResult {
    pub date: NaiveDate,
    pub executed_events: usize,
    pub failed_events: usize,
    pub phase_changed: bool,
}

pub struct WeekResult {
    pub days: Vec<DayResult>,
}

pub struct PhaseSummary {
    pub days_advanced: u32,
    pub ended_phase: Phase,
    pub new_phase: Phase,
    pub cancelled: bool,
}

pub struct SeasonSummary {
    pub season_year: i32,
    pub champion_team_id: Option<u32>,
}

/// Default per-team cap limit; a hard constant per spec §1 Non-goals
/// ("league rules ... are hard-coded constants").
pub const DEFAULT_CAP_LIMIT: i64 = 224_800_000;

pub struct SeasonController<S, G, D, P> {
    store: S,
    dynasty: DynastyId,
    simulator: G,
    draft_order_service: D,
    seeding_service: P,
    rng: StdRng,
    calendar: Calendar,
    preseason_start: NaiveDate,
    season_start: NaiveDate,
}

impl<S, G, D, P> SeasonController<S, G, D, P>
where
    S: DynastyStore,
    G: GameSimulator,
    D: DraftOrderService,
    P: PlayoffSeedingService,
{
    pub fn new(
        store: S,
        dynasty: DynastyId,
        simulator: G,
        draft_order_service: D,
        seeding_service: P,
        season_year: i32,
        current_date: NaiveDate,
    ) -> CoreResult<Self> {
        store.ensure_dynasty(&dynasty)?;
        let existing = store.read(&dynasty, Box::new(|tables| tables.phase_state.clone()))?;
        if existing.is_none() {
            let state = PhaseState::new(season_year, current_date);
            store.with_transaction(
                &dynasty,
                Box::new(move |tables| {
                    tables.phase_state = Some(state);
                    Ok(())
                }),
            )?;
        }

        let preseason_start = NaiveDate::from_ymd_opt(season_year, 7, 20).unwrap_or(current_date);
        let season_start = Calendar::next_weekday_on_or_after(
            NaiveDate::from_ymd_opt(season_year, 9, 1).unwrap_or(current_date),
            chrono::Weekday::Thu,
        );

        Ok(SeasonController {
            store,
            dynasty,
            simulator,
            draft_order_service,
            seeding_service,
            rng: StdRng::seed_from_u64(season_year as u64),
            calendar: Calendar::new(current_date),
            preseason_start,
            season_start,
        })
    }

    fn current_phase_state(&self) -> CoreResult<PhaseState> {
        self.store
            .read(&self.dynasty, Box::new(|tables| tables.phase_state.clone()))?
            .ok_or_else(|| CoreError::not_found("phase_state"))
    }

    /// Persist `phase_state` and verify the write by reading it back
    /// (spec §7 "post-save verification", §9 "silent persistence failure").
    fn persist_and_verify(&self, phase_state: PhaseState) -> CoreResult<()> {
        let expected = phase_state.clone();
        self.store.with_transaction(
            &self.dynasty,
            Box::new(move |tables| {
                tables.phase_state = Some(phase_state);
                Ok(())
            }),
        )?;

        let readback = self.store.read(&self.dynasty, Box::new(|tables| tables.phase_state.clone()))?;
        match readback {
            Some(actual) if dates_and_phase_match(&actual, &expected) => Ok(()),
            other => Err(CoreError::persistence(format!(
                "dynasty_state readback mismatch: expected {:?}/{}, got {:?}",
                expected.current_date, expected.phase, other.map(|o| o.current_date)
            ))),
        }
    }

    /// `AdvanceDay` (spec §4.12): increment date, dispatch due events,
    /// check for a phase transition, run its setup hook if triggered.
    pub fn advance_day(&mut self) -> CoreResult<DayResult> {
        let new_date = self.calendar.advance_days(1);
        let mut phase_state = self.current_phase_state()?;
        phase_state.current_date = new_date;
        if phase_state.phase == Phase::RegularSeason {
            phase_state.current_week = Some(Calendar::week_of(new_date, self.season_start));
        }
        self.persist_and_verify(phase_state.clone())?;

        let results = self.dispatch_day(new_date, &phase_state)?;
        let executed_events = results.iter().filter(|r| r.executed).count();
        let failed_events = results.len() - executed_events;

        if phase_state.phase == Phase::Playoffs {
            self.advance_playoff_rounds(new_date, phase_state.season_year)?;
            if !phase_state.super_bowl_played {
                let season_year = phase_state.season_year;
                let super_bowl_done = self
                    .store
                    .read(&self.dynasty, Box::new(move |tables| playoff::round_complete(tables, season_year, "super_bowl")))?;
                if super_bowl_done {
                    phase_state.super_bowl_played = true;
                    self.persist_and_verify(phase_state.clone())?;
                }
            }
        }

        self.maybe_run_gm_proposals(new_date, &phase_state)?;

        let phase_changed = self.check_phase_transition(new_date)?;

        Ok(DayResult {
            date: new_date,
            executed_events,
            failed_events,
            phase_changed,
        })
    }

    fn dispatch_day(&self, date: NaiveDate, phase_state: &PhaseState) -> CoreResult<Vec<EventDispatchResult>> {
        let simulator = &self.simulator;
        let phase_state = phase_state.clone();
        let season_start = self.season_start;
        dispatch_date(&self.store, &self.dynasty, date, move |tables, event| {
            dispatch_one(tables, event, simulator, &phase_state, season_start)
        })
    }

    /// Per-team GM proposal pass for the day (spec §4.10). Reads
    /// candidates outside any transaction so `self.rng` never has to
    /// cross a `'static`-ish boxed transaction closure; only the chosen
    /// candidate (if any) is submitted inside a transaction.
    fn maybe_run_gm_proposals(&mut self, date: NaiveDate, phase_state: &PhaseState) -> CoreResult<()> {
        if !matches!(phase_state.phase, Phase::RegularSeason | Phase::OffseasonFa) {
            return Ok(());
        }

        for team_id in 1u32..=32 {
            let archetype = archetype_for_team(team_id);
            if !gm_proposal::should_attempt_proposal(archetype, &mut self.rng) {
                continue;
            }
            let season_year = phase_state.season_year;
            let candidates = self.store.read(
                &self.dynasty,
                Box::new(move |tables| gm_proposal::enumerate_candidates(tables, team_id, archetype, season_year, date)),
            )?;
            let Some(best) = candidates.into_iter().next() else { continue };
            if best.score < gm_proposal::PROPOSAL_SCORE_THRESHOLD {
                continue;
            }
            self.submit_gm_action(best.action, phase_state, date)?;
        }
        Ok(())
    }

    /// Validate and, if valid, apply whichever kind of move the GM pass
    /// chose (spec §4.10 step 3). Trades are still scheduled as a
    /// `Trade` event for the dispatcher to apply later; the other kinds
    /// have no corresponding event kind (spec §3's closed event-kind
    /// set has no TRADE counterpart for signings/cuts/restructures/tags)
    /// so they validate and apply directly in this transaction.
    fn submit_gm_action(&self, action: GmAction, phase_state: &PhaseState, date: NaiveDate) -> CoreResult<()> {
        let season_start = self.season_start;
        let phase_state = phase_state.clone();
        self.store.with_transaction(
            &self.dynasty,
            Box::new(move |tables| {
                match action {
                    GmAction::Trade(proposal) => submit_trade(tables, proposal, &phase_state, season_start, date),
                    GmAction::Sign { team_id, player_id } => submit_signing(tables, team_id, player_id, &phase_state, date),
                    GmAction::Cut { team_id, player_id } => submit_cut(tables, team_id, player_id, &phase_state, date),
                    GmAction::Restructure { team_id, player_id } => submit_restructure(tables, team_id, player_id, &phase_state, date),
                    GmAction::FranchiseTag { team_id, player_id } => submit_franchise_tag(tables, team_id, player_id, &phase_state, date),
                }
                Ok(())
            }),
        )
    }

    fn check_phase_transition(&mut self, date: NaiveDate) -> CoreResult<bool> {
        let mut phase_state = self.current_phase_state()?;
        let previous_phase = phase_state.phase;
        let season_year = phase_state.season_year;

        let transitioned = match previous_phase {
            Phase::Offseason => date >= self.preseason_start,
            Phase::Preseason => date >= self.season_start,
            Phase::RegularSeason => self
                .store
                .read(&self.dynasty, Box::new(move |tables| regular_season_complete(tables, season_year)))?,
            Phase::Playoffs => self
                .store
                .read(&self.dynasty, Box::new(move |tables| playoff::round_complete(tables, season_year, "super_bowl")))?,
            Phase::OffseasonHonors => self.store.read(
                &self.dynasty,
                Box::new(move |tables| {
                    let prefix = format!("honors_{season_year}_");
                    let honors_events = tables.events_by_structured_prefix(&prefix);
                    !honors_events.is_empty() && honors_events.iter().all(|e| e.status == EventStatus::Executed)
                }),
            )?,
            Phase::OffseasonFa => date >= self.preseason_start - chrono::Duration::days(120),
            Phase::OffseasonDraft => self.store.read(
                &self.dynasty,
                Box::new(move |tables| {
                    let prefix = format!("draft_{season_year}_");
                    let picks = tables.events_by_structured_prefix(&prefix);
                    !picks.is_empty() && picks.iter().all(|e| e.status == EventStatus::Executed)
                }),
            )?,
        };

        if !transitioned {
            return Ok(false);
        }

        phase_state.phase = next_phase(previous_phase);
        if phase_state.phase == Phase::Offseason && previous_phase == Phase::OffseasonDraft {
            phase_state.season_year += 1;
            phase_state.super_bowl_played = false;
            self.preseason_start = NaiveDate::from_ymd_opt(phase_state.season_year, 7, 20).unwrap_or(self.preseason_start);
            self.season_start = Calendar::next_weekday_on_or_after(
                NaiveDate::from_ymd_opt(phase_state.season_year, 9, 1).unwrap_or(self.season_start),
                chrono::Weekday::Thu,
            );
        }
        phase_state.current_week = None;

        info!("phase transition: {previous_phase} -> {} on {date}", phase_state.phase);
        self.run_phase_setup_hook(phase_state.phase, phase_state.season_year, date)?;
        self.persist_and_verify(phase_state)?;
        Ok(true)
    }

    fn run_phase_setup_hook(&mut self, new_phase: Phase, season: i32, date: NaiveDate) -> CoreResult<()> {
        match new_phase {
            Phase::Preseason => self.setup_season(season, date),
            Phase::RegularSeason => self.schedule_regular_season(season, date),
            Phase::Playoffs => self.seed_and_schedule_wild_card(season, date),
            Phase::OffseasonHonors => self.run_honors_hook(season, date),
            Phase::OffseasonFa => self.schedule_fa_wave(season, date, self.preseason_start - chrono::Duration::days(120)),
            Phase::Offseason => self.schedule_fa_wave(season, date, self.preseason_start),
            Phase::OffseasonDraft => self.schedule_draft(season, date),
        }
    }

    /// Schedule a weekly free-agency wave for `[start, end)` (spec
    /// §1/§4.4 "a named recurring dynasty event"). Both OFFSEASON and
    /// OFFSEASON_FA permit `FaWaveTick` (phase.rs), so each phase's own
    /// setup hook schedules its own run rather than a single global
    /// cadence spanning both.
    fn schedule_fa_wave(&self, season: i32, start: NaiveDate, end: NaiveDate) -> CoreResult<()> {
        self.store.with_transaction(
            &self.dynasty,
            Box::new(move |tables| {
                let mut week = 1u32;
                let mut day = start;
                while day < end {
                    let structured_id = format!("fa_wave_{season}_{}_{week}", start.format("%Y%m%d"));
                    tables.insert_event(structured_id, day, EventKind::FaWaveTick, serde_json::json!({ "season": season }));
                    day += chrono::Duration::days(7);
                    week += 1;
                }
                Ok(())
            }),
        )
    }

    fn setup_season(&self, season: i32, date: NaiveDate) -> CoreResult<()> {
        let season_start = self.season_start;
        self.store.with_transaction(
            &self.dynasty,
            Box::new(move |tables| {
                for team_id in 1u32..=32 {
                    tables.standings.entry((season, team_id)).or_insert_with(|| StandingsRow::new(team_id, season));
                    let carryover = tables.cap_records.get(&(season, team_id)).map(|r| r.carryover).unwrap_or(0);
                    tables
                        .cap_records
                        .insert((season, team_id), SalaryCapRecord::new(team_id, season, DEFAULT_CAP_LIMIT, carryover));
                }

                let cutdown_date = season_start - chrono::Duration::days(3);
                let structured_id = format!("deadline_{season}_roster_cutdown_1");
                tables.insert_event(structured_id, cutdown_date, EventKind::Deadline, serde_json::json!({ "kind": "roster_cutdown" }));

                let _ = date;
                Ok(())
            }),
        )
    }

    /// Round-robin-circle schedule, first 17 of the 31 full-circle
    /// rounds, giving every team exactly 17 games (spec §2 Event
    /// Dispatcher row "the schedule generator produces 272
    /// regular-season games").
    fn schedule_regular_season(&self, season: i32, date: NaiveDate) -> CoreResult<()> {
        let season_start = self.season_start;
        self.store.with_transaction(
            &self.dynasty,
            Box::new(move |tables| {
                let teams: Vec<u32> = (1u32..=32).collect();
                let rounds = round_robin_circle(&teams, REGULAR_SEASON_GAMES as usize);
                let mut index = 1u32;
                for (week, round) in rounds.into_iter().enumerate() {
                    let week = week as u32 + 1;
                    let game_date = season_start + chrono::Duration::days(7 * (week as i64 - 1));
                    for (home, away) in round {
                        let structured_id = format!("game_{season}_{week}_{index}");
                        let payload = serde_json::json!({
                            "game_id": structured_id,
                            "season": season,
                            "season_type": "regular_season",
                            "game_type": "regular",
                            "week": week,
                            "home_team_id": home,
                            "away_team_id": away,
                        });
                        tables.insert_event(structured_id, game_date, EventKind::Game, payload);
                        index += 1;
                    }
                }

                let deadline = Calendar::trade_deadline(season_start);
                let structured_id = format!("deadline_{season}_trade_1");
                tables.insert_event(structured_id, deadline, EventKind::Deadline, serde_json::json!({ "kind": "trade_deadline" }));

                let _ = date;
                Ok(())
            }),
        )
    }

    /// Progress the bracket one round at a time as rounds complete
    /// (spec §4.11 "progressive scheduling"). Seeds are recomputed from
    /// standings rather than stored separately, since the seeding
    /// service is a pure function of final standings and this keeps the
    /// bracket's notion of "remaining seed" consistent round to round
    /// without a dedicated bracket table.
    fn advance_playoff_rounds(&self, date: NaiveDate, season: i32) -> CoreResult<()> {
        let seeding_service = &self.seeding_service;
        self.store.with_transaction(
            &self.dynasty,
            Box::new(move |tables| {
                let standings: Vec<StandingsRow> = tables
                    .standings
                    .values()
                    .filter(|r| r.season == season)
                    .cloned()
                    .collect();
                let seeds = playoff::seed_conferences(seeding_service, &standings, &tables.teams);

                let mut remaining_seeds = std::collections::HashMap::new();
                let mut conference_of = std::collections::HashMap::new();
                for conference_seeds in &seeds {
                    for (index, team_id) in conference_seeds.seeds.iter().enumerate() {
                        remaining_seeds.insert(*team_id, (index + 1) as u32);
                        conference_of.insert(*team_id, conference_seeds.conference);
                    }
                }

                for round in ["wild_card", "divisional", "conference"] {
                    if playoff::round_complete(tables, season, round) {
                        playoff::schedule_next_round(tables, season, date, round, &remaining_seeds, &conference_of);
                    }
                }
                Ok(())
            }),
        )
    }

    fn seed_and_schedule_wild_card(&self, season: i32, date: NaiveDate) -> CoreResult<()> {
        let seeding_service = &self.seeding_service;
        self.store.with_transaction(
            &self.dynasty,
            Box::new(move |tables| {
                let standings: Vec<StandingsRow> = tables
                    .standings
                    .values()
                    .filter(|r| r.season == season)
                    .cloned()
                    .collect();
                let teams_by_id = tables.teams.clone();
                let seeds = playoff::seed_conferences(seeding_service, &standings, &teams_by_id);
                playoff::schedule_wild_card_round(tables, season, date, &seeds);
                Ok(())
            }),
        )
    }

    fn run_honors_hook(&mut self, season: i32, date: NaiveDate) -> CoreResult<()> {
        let candidates = self
            .store
            .read(&self.dynasty, Box::new(|tables| retirement::retirement_candidates(tables)))?;
        let retired_ids = retirement::select_retirements(&candidates, &mut self.rng);

        self.store.with_transaction(
            &self.dynasty,
            Box::new(move |tables| {
                retirement::apply_retirements(tables, &retired_ids, season);

                let champion = playoff::round_complete(tables, season, "super_bowl")
                    .then(|| {
                        tables
                            .events_by_structured_prefix(&playoff_id(season, "super_bowl", 1))
                            .first()
                            .and_then(|e| e.result.as_ref())
                            .and_then(|r| r.get("winner_team_id"))
                            .and_then(|v| v.as_u64())
                            .map(|v| v as u32)
                    })
                    .flatten();
                if let Some(champion_id) = champion {
                    tables.super_bowl_champions.insert(season, champion_id);
                }

                for player_id in tables.players.keys().copied().collect::<Vec<_>>() {
                    tables.career_summaries.entry(player_id).or_insert_with(|| CareerSummary::empty(player_id));
                }

                let structured_id = format!("honors_{season}_summary_1");
                tables.insert_event(structured_id, date, EventKind::PhaseHook, serde_json::json!({"kind": "honors_complete"}));
                Ok(())
            }),
        )
    }

    fn schedule_draft(&self, season: i32, date: NaiveDate) -> CoreResult<()> {
        let draft_order_service = &self.draft_order_service;
        self.store.with_transaction(
            &self.dynasty,
            Box::new(move |tables| {
                let standings: Vec<StandingsRow> = tables.standings.values().filter(|r| r.season == season).cloned().collect();
                let picks = draft_order_service.compute_draft_order(&standings);
                for pick in picks {
                    let structured_id = format!("draft_{season}_round_{}_{}", pick.round, pick.pick_in_round);
                    let payload = serde_json::json!({
                        "season": season,
                        "team_id": pick.team_id,
                        "round": pick.round,
                        "pick_in_round": pick.pick_in_round,
                        "overall": pick.overall,
                        "reason": pick.reason,
                    });
                    tables.insert_event(structured_id, date, EventKind::DraftPick, payload);
                }
                Ok(())
            }),
        )
    }

    pub fn advance_week(&mut self) -> CoreResult<WeekResult> {
        let mut days = Vec::with_capacity(7);
        for _ in 0..7 {
            days.push(self.advance_day()?);
        }
        Ok(WeekResult { days })
    }

    /// Advance day by day until the phase changes, the safety cap is hit,
    /// or `progress` returns `false` (spec §5: a cancellation signal that
    /// takes effect between days, never mid-day). `progress` is called
    /// once per completed day with that day's result; returning `false`
    /// stops the loop after the day it was called for has already been
    /// fully dispatched and persisted.
    pub fn advance_to_end_of_phase(&mut self, mut progress: impl FnMut(&DayResult) -> bool) -> CoreResult<PhaseSummary> {
        let starting_phase = self.current_phase_state()?.phase;
        let mut days_advanced = 0;
        loop {
            let result = self.advance_day()?;
            let keep_going = progress(&result);
            days_advanced += 1;
            if !keep_going {
                let new_phase = self.current_phase_state()?.phase;
                return Ok(PhaseSummary {
                    days_advanced,
                    ended_phase: starting_phase,
                    new_phase,
                    cancelled: true,
                });
            }
            if result.phase_changed || days_advanced >= ADVANCE_TO_PHASE_DAY_LIMIT {
                if days_advanced >= ADVANCE_TO_PHASE_DAY_LIMIT && !result.phase_changed {
                    warn!("advance_to_end_of_phase hit the {ADVANCE_TO_PHASE_DAY_LIMIT}-day safety cap without a phase transition");
                }
                let new_phase = self.current_phase_state()?.phase;
                return Ok(PhaseSummary {
                    days_advanced,
                    ended_phase: starting_phase,
                    new_phase,
                    cancelled: false,
                });
            }
        }
    }

    pub fn simulate_to_end_of_season(&mut self) -> CoreResult<SeasonSummary> {
        let starting_season = self.current_phase_state()?.season_year;
        loop {
            let state = self.current_phase_state()?;
            if state.season_year != starting_season {
                let champion = self.store.read(
                    &self.dynasty,
                    Box::new(move |tables| tables.super_bowl_champions.get(&starting_season).copied()),
                )?;
                return Ok(SeasonSummary {
                    season_year: starting_season,
                    champion_team_id: champion,
                });
            }
            self.advance_day()?;
        }
    }
}

fn dates_and_phase_match(actual: &PhaseState, expected: &PhaseState) -> bool {
    actual.current_date == expected.current_date && actual.phase == expected.phase && actual.season_year == expected.season_year
}

fn next_phase(current: Phase) -> Phase {
    match current {
        Phase::Offseason => Phase::Preseason,
        Phase::Preseason => Phase::RegularSeason,
        Phase::RegularSeason => Phase::Playoffs,
        Phase::Playoffs => Phase::OffseasonHonors,
        Phase::OffseasonHonors => Phase::OffseasonFa,
        Phase::OffseasonFa => Phase::OffseasonDraft,
        Phase::OffseasonDraft => Phase::Offseason,
    }
}

/// Deterministic archetype assignment so repeated runs are stable
/// without persisting a GM roster entity this engine doesn't otherwise
/// need (spec §4.10's archetype set, spec §9 tuning note).
fn archetype_for_team(team_id: u32) -> Archetype {
    match team_id % 6 {
        0 => Archetype::Conservative,
        1 => Archetype::Balanced,
        2 => Archetype::Aggressive,
        3 => Archetype::StarChaser,
        4 => Archetype::WinNow,
        _ => Archetype::Rebuilding,
    }
}

fn regular_season_complete(tables: &DynastyTables, season: i32) -> bool {
    let prefix = format!("game_{season}_");
    let games: Vec<&Event> = tables
        .events
        .iter()
        .filter(|e| e.kind == EventKind::Game && e.structured_id.starts_with(&prefix))
        .collect();
    !games.is_empty() && games.len() as u32 >= TOTAL_REGULAR_SEASON_GAMES && games.iter().all(|e| e.status == EventStatus::Executed)
}

/// Standard round-robin "circle" pairing: fix one team, rotate the
/// rest. Returns the first `rounds` rounds (each a list of (home,
/// away) pairs); for 32 teams this yields 16 games/round.
fn round_robin_circle(teams: &[u32], rounds: usize) -> Vec<Vec<(u32, u32)>> {
    let n = teams.len();
    if n < 2 {
        return Vec::new();
    }
    let mut arranged: Vec<u32> = teams.to_vec();
    let mut schedule = Vec::with_capacity(rounds);

    for round in 0..rounds.min(n - 1) {
        let mut pairs = Vec::with_capacity(n / 2);
        for i in 0..n / 2 {
            let home = arranged[i];
            let away = arranged[n - 1 - i];
            if round % 2 == 0 {
                pairs.push((home, away));
            } else {
                pairs.push((away, home));
            }
        }
        schedule.push(pairs);

        let last = arranged.remove(n - 1);
        arranged.insert(1, last);
    }
    schedule
}

fn dispatch_one<G: GameSimulator>(
    tables: &mut DynastyTables,
    event: &Event,
    simulator: &G,
    phase_state: &PhaseState,
    season_start: NaiveDate,
) -> EventOutcome {
    if !phase_state.permits(event.kind) {
        let err = CoreError::phase_violation(format!("{:?} not permitted during {}", event.kind, phase_state.phase));
        warn!("{err}");
        return EventOutcome::Failed(err.to_string());
    }

    match event.kind {
        EventKind::Game => dispatch_game(tables, event, simulator),
        EventKind::Trade => dispatch_trade(tables, event, phase_state, season_start),
        EventKind::Deadline => dispatch_deadline(tables, phase_state),
        EventKind::FaWaveTick => dispatch_fa_wave(tables, phase_state),
        EventKind::DraftPick => dispatch_draft_pick(tables, event),
        EventKind::RetirementCheck => EventOutcome::Executed(serde_json::json!({ "note": "retirement handled at honors hook" })),
        EventKind::PhaseHook => EventOutcome::Executed(serde_json::json!({ "note": "phase hook processed" })),
    }
}

fn dispatch_game<G: GameSimulator>(tables: &mut DynastyTables, event: &Event, simulator: &G) -> EventOutcome {
    let payload = &event.payload;
    let game_id = payload.get("game_id").and_then(|v| v.as_str()).unwrap_or(&event.structured_id).to_string();
    let season = payload.get("season").and_then(|v| v.as_i64()).unwrap_or(0) as i32;
    let season_type = if payload.get("season_type").and_then(|v| v.as_str()) == Some("playoffs") {
        SeasonType::Playoffs
    } else {
        SeasonType::RegularSeason
    };
    let game_type = match payload.get("game_type").and_then(|v| v.as_str()).unwrap_or("regular") {
        "wild_card" => GameType::WildCard,
        "divisional" => GameType::Divisional,
        "conference" => GameType::Conference,
        "super_bowl" => GameType::SuperBowl,
        _ => GameType::Regular,
    };
    let home_team_id = payload.get("home_team_id").and_then(|v| v.as_u64()).unwrap_or(0) as u32;
    let away_team_id = payload.get("away_team_id").and_then(|v| v.as_u64()).unwrap_or(0) as u32;
    let week = payload.get("week").and_then(|v| v.as_u64()).map(|v| v as u32);

    let game_payload = GamePayload {
        game_id,
        season,
        season_type,
        week,
        game_type,
        home_team_id,
        away_team_id,
        seed: None,
    };

    match handle_game(tables, simulator, &game_payload, event.date) {
        Ok(box_score) => {
            let mut result = serde_json::json!({
                "home_score": box_score.home_score,
                "away_score": box_score.away_score,
            });
            if let Some(winner) = box_score.winner() {
                result["winner_team_id"] = serde_json::json!(winner);
            }
            EventOutcome::Executed(result)
        }
        Err(message) => EventOutcome::Failed(message),
    }
}

fn dispatch_trade(tables: &mut DynastyTables, event: &Event, phase_state: &PhaseState, season_start: NaiveDate) -> EventOutcome {
    let payload = &event.payload;
    let side_a = TradeSide {
        team_id: payload.get("side_a_team_id").and_then(|v| v.as_u64()).unwrap_or(0) as u32,
        player_ids: parse_u32_array(payload.get("side_a_player_ids")),
        picks: vec![],
    };
    let side_b = TradeSide {
        team_id: payload.get("side_b_team_id").and_then(|v| v.as_u64()).unwrap_or(0) as u32,
        player_ids: parse_u32_array(payload.get("side_b_player_ids")),
        picks: vec![],
    };
    let proposal = TradeProposal { side_a, side_b, proposed_date: event.date };

    match validator::validate_trade(tables, &proposal, phase_state, season_start) {
        ValidationResult::Invalid(reasons) => EventOutcome::Failed(reasons.join("; ")),
        ValidationResult::Valid => {
            for &player_id in &proposal.side_a.player_ids {
                if let Err(err) = cap_ledger::record_trade(tables, player_id, proposal.side_b.team_id, phase_state.season_year, event.date) {
                    return EventOutcome::Failed(err.to_string());
                }
            }
            for &player_id in &proposal.side_b.player_ids {
                if let Err(err) = cap_ledger::record_trade(tables, player_id, proposal.side_a.team_id, phase_state.season_year, event.date) {
                    return EventOutcome::Failed(err.to_string());
                }
            }
            EventOutcome::Executed(serde_json::json!({ "status": "executed" }))
        }
    }
}

/// Validate and, on success, schedule a GM-proposed trade as a `Trade`
/// event for the dispatcher to apply later (spec §4.10 step 3). An
/// invalid proposal is simply logged and dropped, same as a rejected
/// handler-level trade.
fn submit_trade(tables: &mut DynastyTables, proposal: TradeProposal, phase_state: &PhaseState, season_start: NaiveDate, date: NaiveDate) {
    match validator::validate_trade(tables, &proposal, phase_state, season_start) {
        ValidationResult::Invalid(reasons) => info!("GM trade rejected: {}", reasons.join("; ")),
        ValidationResult::Valid => {
            let structured_id =
                format!("trade_{}_gm_{}_{}", phase_state.season_year, proposal.side_a.team_id, proposal.side_b.team_id);
            let payload = serde_json::json!({
                "side_a_team_id": proposal.side_a.team_id,
                "side_a_player_ids": proposal.side_a.player_ids,
                "side_b_team_id": proposal.side_b.team_id,
                "side_b_player_ids": proposal.side_b.player_ids,
            });
            tables.insert_event(structured_id, date, EventKind::Trade, payload);
        }
    }
}

/// Validate and, on success, sign a GM-proposed free agent to a 2-year
/// contract priced off the trade-value curve (spec §4.10 step 2/3
/// supplement, giving `validate_signing` a production call site).
fn submit_signing(tables: &mut DynastyTables, team_id: u32, player_id: u32, phase_state: &PhaseState, date: NaiveDate) {
    match validator::validate_signing(tables, player_id) {
        ValidationResult::Invalid(reasons) => info!("GM signing rejected: {}", reasons.join("; ")),
        ValidationResult::Valid => {
            let Some(player) = tables.players.get(&player_id) else { return };
            let per_year = gm_proposal::signing_salary_estimate(player);
            let years = 2usize;

            let contract_id = tables.next_contract_id();
            let contract = crate::models::Contract::new(
                contract_id,
                player_id,
                team_id,
                phase_state.season_year,
                vec![per_year; years],
                per_year,
                vec![0; years],
                vec![0; years],
                vec![0; years],
                0,
            );
            cap_ledger::record_signing(tables, &contract, date);
            tables.contracts.insert(contract_id, contract);
            if let Some(player) = tables.players.get_mut(&player_id) {
                player.team_id = Some(team_id);
            }
        }
    }
}

/// Validate and, on success, release a GM-proposed cut (spec §4.10 step
/// 2/3 supplement, giving `validate_cut` a production call site).
fn submit_cut(tables: &mut DynastyTables, team_id: u32, player_id: u32, phase_state: &PhaseState, date: NaiveDate) {
    match validator::validate_cut(tables, player_id, team_id) {
        ValidationResult::Invalid(reasons) => info!("GM cut rejected: {}", reasons.join("; ")),
        ValidationResult::Valid => {
            if let Err(err) = cap_ledger::record_cut(tables, player_id, phase_state.season_year, date) {
                warn!("GM cut failed: {err}");
            }
        }
    }
}

/// Validate and, on success, restructure a GM-proposed contract, adding
/// one void year to spread the freed-up cap room further (spec §4.10
/// step 2/3 supplement, giving `cap_ledger::record_restructure` a
/// production call site).
fn submit_restructure(tables: &mut DynastyTables, team_id: u32, player_id: u32, phase_state: &PhaseState, date: NaiveDate) {
    match validator::validate_restructure(tables, player_id, team_id) {
        ValidationResult::Invalid(reasons) => info!("GM restructure rejected: {}", reasons.join("; ")),
        ValidationResult::Valid => {
            if let Err(err) = cap_ledger::record_restructure(tables, player_id, phase_state.season_year, 1, date) {
                warn!("GM restructure failed: {err}");
            }
        }
    }
}

/// Validate and, on success, apply a franchise tag: the player's
/// expiring contract is marked expired and replaced with a one-year
/// deal at the tag salary (spec §4.8 "tag window", giving
/// `validate_franchise_tag` a production call site).
fn submit_franchise_tag(tables: &mut DynastyTables, team_id: u32, player_id: u32, phase_state: &PhaseState, date: NaiveDate) {
    if let ValidationResult::Invalid(reasons) = validator::validate_franchise_tag(phase_state) {
        info!("GM franchise tag rejected: {}", reasons.join("; "));
        return;
    }
    let owned = matches!(tables.contract_for_player(player_id), Some(c) if c.team_id == team_id);
    if !owned {
        info!("GM franchise tag rejected: player {player_id} is not under contract to team {team_id}");
        return;
    }
    let Some(player) = tables.players.get(&player_id) else { return };
    let salary = gm_proposal::franchise_tag_salary_estimate(player);

    if let Some(expiring) = tables.contract_for_player_mut(player_id) {
        expiring.status = crate::models::ContractStatus::Expired;
    }
    let contract_id = tables.next_contract_id();
    let new_contract =
        crate::models::Contract::new(contract_id, player_id, team_id, phase_state.season_year, vec![salary], 0, vec![0], vec![0], vec![0], 0);
    cap_ledger::record_signing(tables, &new_contract, date);
    tables.contracts.insert(contract_id, new_contract);
}

fn dispatch_deadline(tables: &mut DynastyTables, phase_state: &PhaseState) -> EventOutcome {
    match check_cap_compliance(tables, phase_state.season_year) {
        Ok(()) => EventOutcome::Executed(serde_json::json!({ "status": "compliant" })),
        Err(CoreError::CapViolation(reasons)) => EventOutcome::Failed(reasons.join("; ")),
        Err(other) => EventOutcome::Failed(other.to_string()),
    }
}

/// Release each team's weakest rostered player below
/// `FA_WAVE_RELEASE_OVERALL_THRESHOLD`, modeling the fringe-roster churn
/// a recurring free-agency wave produces (spec §4.4).
fn dispatch_fa_wave(tables: &mut DynastyTables, phase_state: &PhaseState) -> EventOutcome {
    let season = phase_state.season_year;
    let mut released = 0u32;
    for team_id in 1u32..=32 {
        let weakest = tables
            .roster(team_id)
            .into_iter()
            .filter(|p| p.overall < FA_WAVE_RELEASE_OVERALL_THRESHOLD)
            .min_by_key(|p| p.overall)
            .map(|p| p.id);
        let Some(player_id) = weakest else { continue };
        if cap_ledger::record_cut(tables, player_id, season, phase_state.current_date).is_ok() {
            released += 1;
        }
    }
    EventOutcome::Executed(serde_json::json!({ "released": released }))
}

fn dispatch_draft_pick(tables: &mut DynastyTables, event: &Event) -> EventOutcome {
    let payload = &event.payload;
    let team_id = payload.get("team_id").and_then(|v| v.as_u64()).unwrap_or(0) as u32;
    let round = payload.get("round").and_then(|v| v.as_u64()).unwrap_or(1) as u8;
    let pick_in_round = payload.get("pick_in_round").and_then(|v| v.as_u64()).unwrap_or(1) as u8;
    let season = payload.get("season").and_then(|v| v.as_i64()).map(|v| v as i32).unwrap_or(0);

    tables.draft_picks.insert(
        (season, round, pick_in_round),
        crate::models::DraftPickAsset::new(season, round, pick_in_round, team_id, team_id),
    );
    EventOutcome::Executed(serde_json::json!({ "status": "on_the_clock_resolved" }))
}

fn parse_u32_array(value: Option<&serde_json::Value>) -> Vec<u32> {
    value
        .and_then(|v| v.as_array())
        .map(|arr| arr.iter().filter_map(|v| v.as_u64()).map(|v| v as u32).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::{DraftPick, GameSimulationResult};
    use crate::models::{Conference, Division, Player, Position, Team};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-process store good enough to drive the controller end to end.
    /// No rollback-on-error semantics: nothing in these tests relies on
    /// a failed transaction leaving prior state untouched.
    struct MemoryStore {
        dynasties: Mutex<HashMap<DynastyId, DynastyTables>>,
    }

    impl MemoryStore {
        fn new() -> Self {
            MemoryStore { dynasties: Mutex::new(HashMap::new()) }
        }
    }

    impl DynastyStore for MemoryStore {
        fn with_transaction<T>(&self, dynasty: &DynastyId, f: Box<dyn FnOnce(&mut DynastyTables) -> CoreResult<T> + '_>) -> CoreResult<T> {
            let mut guard = self.dynasties.lock().unwrap();
            let tables = guard.entry(dynasty.clone()).or_insert_with(DynastyTables::new);
            f(tables)
        }

        fn read<T>(&self, dynasty: &DynastyId, f: Box<dyn FnOnce(&DynastyTables) -> T + '_>) -> CoreResult<T> {
            let guard = self.dynasties.lock().unwrap();
            let tables = guard.get(dynasty).ok_or_else(|| CoreError::not_found("dynasty"))?;
            Ok(f(tables))
        }

        fn ensure_dynasty(&self, dynasty: &DynastyId) -> CoreResult<()> {
            let mut guard = self.dynasties.lock().unwrap();
            guard.entry(dynasty.clone()).or_insert_with(DynastyTables::new);
            Ok(())
        }
    }

    struct FixedScoreSimulator;
    impl GameSimulator for FixedScoreSimulator {
        fn simulate(
            &self,
            _home_team_id: u32,
            _away_team_id: u32,
            _home_roster: &[crate::models::Player],
            _away_roster: &[crate::models::Player],
            _seed: Option<u64>,
        ) -> Result<GameSimulationResult, String> {
            Ok(GameSimulationResult {
                home_score: 24,
                away_score: 17,
                overtime_periods: 0,
                duration_minutes: 180,
                player_stats: vec![],
            })
        }
    }

    /// Never wins a tiebreak: a `GameSimulator` that always fails, used
    /// to exercise the "stuck phase" safety cap without waiting out a
    /// real season.
    struct NeverSimulator;
    impl GameSimulator for NeverSimulator {
        fn simulate(
            &self,
            _home_team_id: u32,
            _away_team_id: u32,
            _home_roster: &[crate::models::Player],
            _away_roster: &[crate::models::Player],
            _seed: Option<u64>,
        ) -> Result<GameSimulationResult, String> {
            Err("simulator unavailable".to_string())
        }
    }

    struct SoSDraftOrder;
    impl DraftOrderService for SoSDraftOrder {
        fn compute_draft_order(&self, standings: &[StandingsRow]) -> Vec<DraftPick> {
            let mut rows: Vec<&StandingsRow> = standings.iter().collect();
            rows.sort_by(|a, b| a.win_pct().partial_cmp(&b.win_pct()).unwrap());
            rows.into_iter()
                .enumerate()
                .map(|(i, row)| DraftPick {
                    overall: i as u32 + 1,
                    round: 1,
                    pick_in_round: i as u8 + 1,
                    team_id: row.team_id,
                    reason: "worst record picks first".to_string(),
                })
                .collect()
        }
    }

    struct WinPctSeeding;
    impl PlayoffSeedingService for WinPctSeeding {
        fn seed(&self, conference_standings: &[StandingsRow]) -> Vec<u32> {
            let mut rows = conference_standings.to_vec();
            rows.sort_by(|a, b| b.win_pct().partial_cmp(&a.win_pct()).unwrap());
            rows.into_iter().take(7).map(|r| r.team_id).collect()
        }
    }

    fn seed_league(store: &MemoryStore, dynasty: &DynastyId) {
        store
            .with_transaction(
                dynasty,
                Box::new(|tables| {
                    for team_id in 1u32..=32 {
                        let conference = if team_id <= 16 { Conference::Afc } else { Conference::Nfc };
                        let division = match team_id % 4 {
                            0 => Division::North,
                            1 => Division::South,
                            2 => Division::East,
                            _ => Division::West,
                        };
                        tables.teams.insert(team_id, Team::new(team_id, format!("Team {team_id}"), conference, division));
                    }
                    Ok(())
                }),
            )
            .unwrap();
    }

    fn new_controller(
        store: MemoryStore,
        date: NaiveDate,
    ) -> SeasonController<MemoryStore, FixedScoreSimulator, SoSDraftOrder, WinPctSeeding> {
        seed_league(&store, &"dynasty-1".to_string());
        SeasonController::new(
            store,
            "dynasty-1".to_string(),
            FixedScoreSimulator,
            SoSDraftOrder,
            WinPctSeeding,
            2025,
            date,
        )
        .unwrap()
    }

    #[test]
    fn advance_day_moves_the_calendar_and_persists_phase_state() {
        let store = MemoryStore::new();
        let start = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        let mut controller = new_controller(store, start);

        let result = controller.advance_day().unwrap();
        assert_eq!(result.date, start + chrono::Duration::days(1));

        let phase_state = controller.current_phase_state().unwrap();
        assert_eq!(phase_state.current_date, result.date);
    }

    #[test]
    fn advancing_past_preseason_start_transitions_the_phase() {
        let store = MemoryStore::new();
        let start = NaiveDate::from_ymd_opt(2025, 7, 18).unwrap();
        let mut controller = new_controller(store, start);

        let mut saw_transition = false;
        for _ in 0..5 {
            let result = controller.advance_day().unwrap();
            saw_transition |= result.phase_changed;
        }

        assert!(saw_transition, "expected an OFFSEASON -> PRESEASON transition within 5 days of July 20");
        assert_eq!(controller.current_phase_state().unwrap().phase, Phase::Preseason);
    }

    #[test]
    fn advance_to_end_of_phase_hits_the_safety_cap_when_games_never_resolve() {
        let store = MemoryStore::new();
        let start = NaiveDate::from_ymd_opt(2025, 7, 17).unwrap();
        seed_league(&store, &"dynasty-1".to_string());
        let mut controller = SeasonController::new(
            store,
            "dynasty-1".to_string(),
            NeverSimulator,
            SoSDraftOrder,
            WinPctSeeding,
            2025,
            start,
        )
        .unwrap();

        // Drive through OFFSEASON -> PRESEASON -> REGULAR_SEASON first;
        // those transitions are date-gated and don't depend on the
        // simulator, so they complete immediately.
        controller.advance_to_end_of_phase(|_| true).unwrap();
        let summary = controller.advance_to_end_of_phase(|_| true).unwrap();

        assert_eq!(summary.ended_phase, Phase::Preseason);
        assert_eq!(summary.new_phase, Phase::RegularSeason);
        assert!(!summary.cancelled);

        // REGULAR_SEASON never completes because every game fails, so
        // this call must stop at the day-limit cap rather than loop forever.
        let stuck = controller.advance_to_end_of_phase(|_| true).unwrap();
        assert_eq!(stuck.ended_phase, Phase::RegularSeason);
        assert_eq!(stuck.days_advanced, ADVANCE_TO_PHASE_DAY_LIMIT);
        assert_eq!(stuck.new_phase, Phase::RegularSeason);
        assert!(!stuck.cancelled);
    }

    #[test]
    fn advance_to_end_of_phase_stops_early_when_progress_returns_false() {
        let store = MemoryStore::new();
        let start = NaiveDate::from_ymd_opt(2025, 7, 17).unwrap();
        seed_league(&store, &"dynasty-1".to_string());
        let mut controller = SeasonController::new(
            store,
            "dynasty-1".to_string(),
            NeverSimulator,
            SoSDraftOrder,
            WinPctSeeding,
            2025,
            start,
        )
        .unwrap();

        let mut days_seen = 0;
        let summary = controller
            .advance_to_end_of_phase(|_| {
                days_seen += 1;
                days_seen < 3
            })
            .unwrap();

        assert!(summary.cancelled);
        assert_eq!(summary.days_advanced, 3);
        assert_eq!(days_seen, 3);
    }

    #[test]
    fn fa_wave_releases_each_team_s_weakest_sub_threshold_player() {
        let mut tables = DynastyTables::new();
        let mut weak = Player::new(1, "Weak Guy", Position::Wr, 40, 27);
        weak.team_id = Some(7);
        let mut strong = Player::new(2, "Star Guy", Position::Wr, 88, 27);
        strong.team_id = Some(7);
        tables.players.insert(1, weak);
        tables.players.insert(2, strong);
        tables.contracts.insert(
            1,
            crate::models::Contract::new(1, 1, 7, 2025, vec![500_000], 0, vec![0], vec![0], vec![0], 0),
        );

        let phase_state = PhaseState {
            phase: Phase::OffseasonFa,
            current_date: NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
            current_week: None,
            season_year: 2025,
            super_bowl_played: true,
        };

        let outcome = dispatch_fa_wave(&mut tables, &phase_state);
        match outcome {
            EventOutcome::Executed(detail) => assert_eq!(detail["released"], 1),
            EventOutcome::Failed(reason) => panic!("expected the fa wave to execute, got {reason}"),
        }
        assert!(tables.players.get(&2).unwrap().team_id == Some(7), "the above-threshold player stays rostered");
    }

    #[test]
    fn dispatch_one_rejects_events_not_permitted_by_the_current_phase() {
        let mut tables = DynastyTables::new();
        let event = Event {
            id: 1,
            structured_id: "draft_2025_round_1_1".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
            kind: EventKind::DraftPick,
            status: EventStatus::Scheduled,
            payload: serde_json::json!({}),
            result: None,
            insertion_order: 0,
        };
        let phase_state = PhaseState {
            phase: Phase::RegularSeason,
            current_date: NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
            current_week: Some(5),
            season_year: 2025,
            super_bowl_played: false,
        };

        let outcome = dispatch_one(&mut tables, &event, &NeverSimulator, &phase_state, NaiveDate::from_ymd_opt(2025, 9, 4).unwrap());
        match outcome {
            EventOutcome::Failed(reason) => assert!(reason.contains("phase violation")),
            EventOutcome::Executed(_) => panic!("DraftPick is not permitted during RegularSeason"),
        }
    }

    #[test]
    fn advance_playoff_rounds_schedules_divisional_only_once_wild_card_is_complete() {
        let store = MemoryStore::new();
        let dynasty = "dynasty-1".to_string();
        seed_league(&store, &dynasty);
        let season = 2025;
        let date = NaiveDate::from_ymd_opt(2026, 1, 10).unwrap();

        store
            .with_transaction(
                &dynasty,
                Box::new(move |tables| {
                    for team_id in 1u32..=32 {
                        let mut row = StandingsRow::new(team_id, season);
                        row.wins = 32 - team_id;
                        row.losses = team_id;
                        tables.standings.insert((season, team_id), row);
                    }
                    Ok(())
                }),
            )
            .unwrap();

        let controller = SeasonController::new(
            store,
            dynasty.clone(),
            FixedScoreSimulator,
            SoSDraftOrder,
            WinPctSeeding,
            season,
            date,
        )
        .unwrap();

        controller.seed_and_schedule_wild_card(season, date).unwrap();

        // Advancing before any wild card game has been decided must be a no-op.
        controller.advance_playoff_rounds(date, season).unwrap();
        let before_divisional = controller
            .store
            .read(&dynasty, Box::new(|tables| tables.events_by_structured_prefix(&format!("playoff_{season}_divisional_")).len()))
            .unwrap();
        assert_eq!(before_divisional, 0);

        // Mark every wild card game executed with the home team winning.
        controller
            .store
            .with_transaction(
                &dynasty,
                Box::new(move |tables| {
                    let wild_card_games: Vec<(u64, u32)> = tables
                        .events
                        .iter()
                        .filter(|e| e.structured_id.starts_with(&format!("playoff_{season}_wild_card_")))
                        .map(|e| (e.id, e.payload.get("home_team_id").and_then(|v| v.as_u64()).unwrap_or(0) as u32))
                        .collect();
                    for (id, winner) in wild_card_games {
                        tables.mark_executed(id, EventStatus::Executed, Some(serde_json::json!({ "winner_team_id": winner })))?;
                    }
                    Ok(())
                }),
            )
            .unwrap();

        controller.advance_playoff_rounds(date, season).unwrap();
        let first_count = controller
            .store
            .read(&dynasty, Box::new(|tables| tables.events_by_structured_prefix(&format!("playoff_{season}_divisional_")).len()))
            .unwrap();
        assert!(first_count > 0, "expected a divisional round to be scheduled");

        controller.advance_playoff_rounds(date, season).unwrap();
        let second_count = controller
            .store
            .read(&dynasty, Box::new(|tables| tables.events_by_structured_prefix(&format!("playoff_{season}_divisional_")).len()))
            .unwrap();

        assert_eq!(first_count, second_count);
    }

    #[test]
    fn advancing_one_day_from_preseason_start_enters_preseason_with_no_events() {
        let store = MemoryStore::new();
        let preseason_start = NaiveDate::from_ymd_opt(2025, 7, 20).unwrap();
        let mut controller = new_controller(store, preseason_start);

        let result = controller.advance_day().unwrap();

        assert_eq!(result.date, preseason_start + chrono::Duration::days(1));
        assert_eq!(result.executed_events, 0);
        assert!(result.phase_changed);
        assert_eq!(controller.current_phase_state().unwrap().phase, Phase::Preseason);
    }

    #[test]
    fn simulating_to_end_of_season_crowns_exactly_one_champion() {
        let store = MemoryStore::new();
        let start = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        let mut controller = new_controller(store, start);

        let summary = controller.simulate_to_end_of_season().unwrap();

        assert_eq!(summary.season_year, 2025);
        let champion = summary.champion_team_id.expect("a champion should be recorded for the completed season");
        assert!((1..=32).contains(&champion));
    }

    #[test]
    fn round_robin_circle_produces_the_full_regular_season_slate() {
        let teams: Vec<u32> = (1..=32).collect();
        let schedule = round_robin_circle(&teams, REGULAR_SEASON_GAMES as usize);
        let total_games: usize = schedule.iter().map(|round| round.len()).sum();
        assert_eq!(schedule.len(), REGULAR_SEASON_GAMES as usize);
        assert_eq!(total_games, TOTAL_REGULAR_SEASON_GAMES as usize);
    }
}
