use std::time::Duration;

use condition_wait::{ConditionWaiter, WaitError};
use pagesync_core_types::{BrowserSession, Locator, SyncConfig};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::errors::ReadyError;
use crate::scripts;
use crate::signals::{
    framework_digest_idle, legacy_ajax_idle, DocumentComplete, DomQuiet, ReadinessSignal,
};

/// Root under which DOM mutations are watched.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ReadinessScope {
    Document,
    Under(Locator),
}

/// A fetch response the instrumentation probe flagged as denied.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct DeniedResponse {
    pub url: String,
    pub status: u16,
    /// Page-clock epoch milliseconds when the response arrived.
    pub at: u64,
}

/// Decides when a page has stabilized enough for reliable interaction.
///
/// Signals are evaluated in fixed order, each with its own sub-budget.
/// A timeout on the mandatory document-complete signal is fatal; the legacy
/// framework signals and DOM quiescence degrade to satisfied, since those
/// frameworks may be entirely absent from a given page.
pub struct ReadinessDetector {
    waiter: ConditionWaiter,
    framework_idle_timeout: Duration,
    stability_window: Duration,
    dom_quiet_cap: Duration,
}

impl ReadinessDetector {
    pub fn new(config: &SyncConfig) -> Self {
        Self {
            waiter: ConditionWaiter::from_config(config),
            framework_idle_timeout: config.framework_idle_timeout,
            stability_window: config.stability_window,
            dom_quiet_cap: config.dom_quiet_cap,
        }
    }

    /// Wait until the page under `scope` is ready, with `timeout` as the
    /// budget for the mandatory document-complete signal.
    pub async fn await_ready(
        &self,
        session: &dyn BrowserSession,
        scope: &ReadinessScope,
        timeout: Duration,
    ) -> Result<(), ReadyError> {
        debug!(signal = ReadinessSignal::DocumentComplete.name(), "checking readiness signal");
        self.waiter
            .wait_for(session, &DocumentComplete, timeout)
            .await
            .map_err(|err| match err {
                WaitError::TimedOut { waited } => ReadyError::NotReady { waited },
                WaitError::Fatal(reason) => {
                    // DocumentComplete never reports fatal; keep the typed
                    // outcome anyway.
                    warn!("unexpected fatal readiness probe: {}", reason);
                    ReadyError::NotReady { waited: timeout }
                }
            })?;

        self.best_effort(
            session,
            ReadinessSignal::LegacyAjaxIdle,
            &legacy_ajax_idle(),
            self.framework_idle_timeout,
        )
        .await;

        self.best_effort(
            session,
            ReadinessSignal::FrameworkDigestIdle,
            &framework_digest_idle(),
            self.framework_idle_timeout,
        )
        .await;

        self.ensure_instrumented(session, scope).await;
        self.best_effort(
            session,
            ReadinessSignal::DomMutationQuiet,
            &DomQuiet {
                stability_window_ms: self.stability_window.as_millis() as u64,
            },
            self.dom_quiet_cap,
        )
        .await;

        info!("page readiness settled");
        Ok(())
    }

    /// Denied fetch responses recorded since the probe was installed.
    /// Best effort: an uninstrumented page yields an empty list.
    pub async fn denied_responses(&self, session: &dyn BrowserSession) -> Vec<DeniedResponse> {
        match session.execute_script(scripts::DENIED_RESPONSES).await {
            Ok(value) => serde_json::from_value(value).unwrap_or_default(),
            Err(err) => {
                warn!("could not read denied-response diagnostics: {}", err);
                Vec::new()
            }
        }
    }

    /// Install the mutation/fetch probe. Idempotent: the script guards on a
    /// window flag, so repeat calls on the same page are no-ops.
    async fn ensure_instrumented(&self, session: &dyn BrowserSession, scope: &ReadinessScope) {
        match session.execute_script(&scripts::install_probe(scope)).await {
            Ok(Value::Bool(true)) => debug!("instrumentation probe installed"),
            Ok(_) => debug!("instrumentation scope root not resolvable yet"),
            Err(err) => warn!("instrumentation install failed: {}", err),
        }
    }

    async fn best_effort<C: condition_wait::Condition>(
        &self,
        session: &dyn BrowserSession,
        signal: ReadinessSignal,
        condition: &C,
        timeout: Duration,
    ) {
        debug!(signal = signal.name(), "checking readiness signal");
        match self.waiter.wait_for(session, condition, timeout).await {
            Ok(_) => debug!(signal = signal.name(), "signal settled"),
            Err(err) => {
                // Advisory signals stop waiting but never fail readiness.
                warn!(signal = signal.name(), "signal degraded to satisfied: {}", err);
            }
        }
    }
}
