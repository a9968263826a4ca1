//! League rules hard-coded as named constants rather than scattered
//! magic numbers (spec §1 Non-goals: "a pluggable rules engine" is out
//! of scope, but the constants still get names — mirrors the teacher's
//! `LeagueSettings` bundling pattern).

/// In-season grace the validator allows a team to exceed its cap by
/// before rejecting a transaction, in basis points of the cap limit
/// (spec §4.8 "league constant").
pub const CAP_GRACE_BPS: i64 = 150; // 1.5%

/// Regular-season game count; a team's schedule always has this many
/// entries once the season completes (spec §3, §8.1).
pub const REGULAR_SEASON_GAMES: u32 = 17;

/// Total regular-season games league-wide (spec §2 Event Dispatcher row).
pub const TOTAL_REGULAR_SEASON_GAMES: u32 = 272;

/// Number of Wild Card games scheduled at REGULAR_SEASON -> PLAYOFFS
/// (spec §4.11).
pub const WILD_CARD_GAMES: u32 = 6;

/// Seeds produced per conference by the `PlayoffSeedingService` (spec §4.6).
pub const SEEDS_PER_CONFERENCE: u32 = 7;

/// Proration spreads a signing bonus across at most this many years,
/// real years plus void years combined (spec §3, §4.7 invariant 1).
pub const MAX_PRORATION_YEARS: u8 = 5;

/// Safety cap on `AdvanceToEndOfPhase`'s day loop so a mis-configured
/// phase transition can't spin forever (spec §4.12).
pub const ADVANCE_TO_PHASE_DAY_LIMIT: u32 = 400;

/// Soft per-day dispatch deadline; exceeding it only logs a warning
/// (spec §5 "Cancellation & timeouts").
pub const DISPATCH_SOFT_DEADLINE_SECS: u64 = 60;

/// Overall rating below which a free-agency wave releases a team's
/// weakest rostered player at that position group, modeling fringe
/// roster churn (spec §1/§4.4 "a named recurring dynasty event").
pub const FA_WAVE_RELEASE_OVERALL_THRESHOLD: u8 = 50;
