use std::fmt;

/// Error kinds surfaced by the season-cycle engine (spec §7).
///
/// `PersistenceFailure` and `SimulatorFailure` carry the lower-level
/// error message from the collaborator that failed; the rest are raised
/// directly by the engine.
#[derive(Debug)]
pub enum CoreError {
    PhaseViolation(String),
    CapViolation(Vec<String>),
    InvalidTransaction(Vec<String>),
    PersistenceFailure(String),
    SimulatorFailure(String),
    DuplicateEvent(String),
    NotFound(String),
}

impl CoreError {
    pub fn phase_violation(msg: impl Into<String>) -> Self {
        CoreError::PhaseViolation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        CoreError::NotFound(msg.into())
    }

    pub fn persistence(msg: impl Into<String>) -> Self {
        CoreError::PersistenceFailure(msg.into())
    }

    /// Informational, not fatal — callers may choose to ignore this kind.
    pub fn is_informational(&self) -> bool {
        matches!(self, CoreError::DuplicateEvent(_))
    }
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::PhaseViolation(msg) => write!(f, "phase violation: {msg}"),
            CoreError::CapViolation(reasons) => {
                write!(f, "cap violation: {}", reasons.join("; "))
            }
            CoreError::InvalidTransaction(reasons) => {
                write!(f, "invalid transaction: {}", reasons.join("; "))
            }
            CoreError::PersistenceFailure(msg) => write!(f, "persistence failure: {msg}"),
            CoreError::SimulatorFailure(msg) => write!(f, "simulator failure: {msg}"),
            CoreError::DuplicateEvent(id) => write!(f, "duplicate event: {id}"),
            CoreError::NotFound(msg) => write!(f, "not found: {msg}"),
        }
    }
}

impl std::error::Error for CoreError {}

pub type CoreResult<T> = Result<T, CoreError>;
