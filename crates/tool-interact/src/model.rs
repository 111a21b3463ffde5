use chrono::{DateTime, Utc};
use pagesync_core_types::{ActionId, ElementHandle, Locator};
use serde::{Deserialize, Serialize};

use crate::errors::InteractionError;

/// How an interaction was ultimately delivered, in descending order of
/// fidelity to a real user.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Strategy {
    /// Native pointer event through the driver.
    Native,
    /// Click event dispatched by injected script on the resolved element.
    ScriptInjected,
}

/// The fallback chain for clicks. Precedence is data, not control flow.
pub const CLICK_STRATEGIES: &[Strategy] = &[Strategy::Native, Strategy::ScriptInjected];

/// What an interaction should act on: a locator resolved fresh, or an
/// element the caller already holds.
#[derive(Clone, Debug)]
pub enum ClickTarget {
    Locator(Locator),
    Element(ElementHandle),
}

impl From<Locator> for ClickTarget {
    fn from(locator: Locator) -> Self {
        Self::Locator(locator)
    }
}

impl From<ElementHandle> for ClickTarget {
    fn from(element: ElementHandle) -> Self {
        Self::Element(element)
    }
}

/// Structured result of one interaction attempt. Created fresh per action,
/// immutable once returned; callers must not silently discard it.
#[must_use]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub succeeded: bool,
    /// Which strategy landed; absent when nothing did.
    pub strategy: Option<Strategy>,
    pub error: Option<InteractionError>,
    pub action_id: ActionId,
    pub started_at: DateTime<Utc>,
    pub latency_ms: u64,
}

impl ActionOutcome {
    pub(crate) fn begin() -> Self {
        Self {
            succeeded: false,
            strategy: None,
            error: None,
            action_id: ActionId::new(),
            started_at: Utc::now(),
            latency_ms: 0,
        }
    }

    pub(crate) fn succeed(mut self, strategy: Strategy, latency_ms: u64) -> Self {
        self.succeeded = true;
        self.strategy = Some(strategy);
        self.latency_ms = latency_ms;
        self
    }

    pub(crate) fn fail(mut self, error: InteractionError, latency_ms: u64) -> Self {
        self.error = Some(error);
        self.latency_ms = latency_ms;
        self
    }
}
