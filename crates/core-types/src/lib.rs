//! Shared primitives for the PageSync synchronization core.
//!
//! Everything here is a value object or a capability boundary: locators,
//! element handles, the `BrowserSession` port that every component polls
//! through, and the read-once configuration. The `stub` feature adds a
//! scripted in-memory session for unit tests.

pub mod config;
pub mod locator;
pub mod session;

#[cfg(feature = "stub")]
pub mod stub;

pub use config::SyncConfig;
pub use locator::Locator;
pub use session::{BrowserSession, ElementHandle, SessionError};

#[cfg(feature = "stub")]
pub use stub::{StubElement, StubSession};

use uuid::Uuid;

/// Correlation id attached to interaction outcomes for log tracing.
#[derive(Clone, Debug, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ActionId(pub String);

impl ActionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for ActionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ActionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
