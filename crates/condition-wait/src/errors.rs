use std::time::Duration;

use thiserror::Error;

/// Failure vocabulary of a bounded wait. Deliberately small: per-poll
/// evaluation errors never escape, they collapse into `TimedOut` when the
/// budget runs out.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WaitError {
    #[error("condition not satisfied after {waited:?}")]
    TimedOut { waited: Duration },

    /// The condition observed something that can never become satisfied.
    #[error("condition reported a fatal mismatch: {0}")]
    Fatal(String),
}

impl WaitError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, WaitError::TimedOut { .. })
    }
}
