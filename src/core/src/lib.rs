pub mod calendar;
pub mod cap_ledger;
pub mod constants;
pub mod error;
pub mod events;
pub mod external;
pub mod game_handler;
pub mod gm_proposal;
pub mod models;
pub mod phase;
pub mod playoff;
pub mod retirement;
pub mod season_controller;
pub mod store;
pub mod structured_id;
pub mod trade_value;
pub mod validator;

pub use calendar::Calendar;
pub use error::{CoreError, CoreResult};
pub use events::{dispatch_date, Event, EventDispatchResult, EventKind, EventOutcome, EventStatus};
pub use phase::{Phase, PhaseState};
pub use season_controller::{DayResult, PhaseSummary, SeasonController, SeasonSummary, WeekResult};
pub use store::{DynastyStore, DynastyTables};
