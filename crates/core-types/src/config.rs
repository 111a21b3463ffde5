use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Timing and session knobs for the synchronization core.
///
/// Read once when a scenario binds its session; never re-read per wait call.
/// Environment variables (`PAGESYNC_*`) override the built-in defaults at
/// load time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Overall budget for a bounded wait when the caller does not pass one.
    pub default_timeout: Duration,
    /// Sleep between condition polls. No wait in the core busy-spins.
    pub poll_interval: Duration,
    /// How long the DOM must stay unchanged to count as quiet.
    pub stability_window: Duration,
    /// Upper bound on waiting for DOM quiescence; advisory, hitting it never
    /// fails readiness.
    pub dom_quiet_cap: Duration,
    /// Sub-budget for the legacy AJAX and framework digest signals.
    pub framework_idle_timeout: Duration,
    /// Budget for streamed-reply growth detection.
    pub response_timeout: Duration,
    /// Whether the session-lifecycle layer should run the browser headless.
    pub headless: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            default_timeout: Duration::from_secs(30),
            poll_interval: Duration::from_millis(100),
            stability_window: Duration::from_millis(500),
            dom_quiet_cap: Duration::from_secs(5),
            framework_idle_timeout: Duration::from_secs(10),
            response_timeout: Duration::from_secs(10),
            headless: true,
        }
    }
}

impl SyncConfig {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        override_millis("PAGESYNC_DEFAULT_TIMEOUT_MS", &mut config.default_timeout);
        override_millis("PAGESYNC_POLL_INTERVAL_MS", &mut config.poll_interval);
        override_millis("PAGESYNC_STABILITY_WINDOW_MS", &mut config.stability_window);
        override_millis("PAGESYNC_DOM_QUIET_CAP_MS", &mut config.dom_quiet_cap);
        override_millis(
            "PAGESYNC_FRAMEWORK_IDLE_TIMEOUT_MS",
            &mut config.framework_idle_timeout,
        );
        override_millis("PAGESYNC_RESPONSE_TIMEOUT_MS", &mut config.response_timeout);
        if let Ok(value) = std::env::var("PAGESYNC_HEADLESS") {
            match value.parse::<bool>() {
                Ok(flag) => {
                    debug!("Overriding headless from environment: {}", flag);
                    config.headless = flag;
                }
                Err(_) => warn!("Invalid boolean for PAGESYNC_HEADLESS: {}", value),
            }
        }
        config
    }
}

fn override_millis(key: &str, slot: &mut Duration) {
    if let Ok(value) = std::env::var(key) {
        match value.parse::<u64>() {
            Ok(ms) => {
                debug!("Overriding {} from environment: {}ms", key, ms);
                *slot = Duration::from_millis(ms);
            }
            Err(_) => warn!("Invalid integer for {}: {}", key, value),
        }
    }
}
