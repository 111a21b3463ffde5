use std::time::Duration;

use pagesync_core_types::{BrowserSession, SyncConfig};
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

use crate::conditions::{Condition, ConditionEval};
use crate::errors::WaitError;

/// Repeatedly evaluates a condition against the session until it yields a
/// value or the budget elapses.
///
/// The condition is probed once before the first sleep, so an
/// already-satisfied condition returns immediately and idempotently. A
/// success is reported no later than one poll interval after the condition
/// becomes satisfiable; a timeout no later than one poll interval past the
/// budget.
#[derive(Clone, Copy, Debug)]
pub struct ConditionWaiter {
    poll_interval: Duration,
}

impl ConditionWaiter {
    pub fn new(poll_interval: Duration) -> Self {
        Self { poll_interval }
    }

    pub fn from_config(config: &SyncConfig) -> Self {
        Self::new(config.poll_interval)
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub async fn wait_for<C: Condition>(
        &self,
        session: &dyn BrowserSession,
        condition: &C,
        timeout: Duration,
    ) -> Result<C::Output, WaitError> {
        let started = Instant::now();
        loop {
            match condition.evaluate(session).await {
                ConditionEval::Satisfied(value) => {
                    debug!(condition = ?condition, waited = ?started.elapsed(), "condition satisfied");
                    return Ok(value);
                }
                ConditionEval::Fatal(reason) => {
                    warn!(condition = ?condition, "condition reported fatal mismatch: {}", reason);
                    return Err(WaitError::Fatal(reason));
                }
                ConditionEval::Pending => {}
            }

            let waited = started.elapsed();
            if waited >= timeout {
                warn!(condition = ?condition, ?waited, "condition wait timed out");
                return Err(WaitError::TimedOut { waited });
            }
            sleep(self.poll_interval).await;
        }
    }
}

impl Default for ConditionWaiter {
    fn default() -> Self {
        Self::from_config(&SyncConfig::default())
    }
}
