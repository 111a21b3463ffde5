//! PageSync wires the synchronization components around one browser session.
//!
//! The components are independently usable; this facade covers the common
//! scenario shape: navigate somewhere, wait for the page to settle, interact,
//! confirm where you landed, and watch for the application's response. One
//! session per scenario, strictly sequential operations, every wait bounded
//! by the shared [`SyncConfig`] budgets.
//!
//! ```no_run
//! # use pagesync::{PageSync, SyncConfig, Locator, VerificationSpec};
//! # async fn demo(session: Box<dyn pagesync::BrowserSession>) -> Result<(), pagesync::PageSyncError> {
//! let sync = PageSync::new(session, SyncConfig::from_env());
//! let spec = VerificationSpec::new()
//!     .url_path_segment("/tasks")
//!     .primary(Locator::css("h1"), "Actions");
//! let result = sync.navigate_and_verify("https://app.example.com/tasks", &spec).await?;
//! assert!(result.confirmed);
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use thiserror::Error;
use tracing::info;

pub use nav_gate::{NavigationResult, NavigationVerifier, VerificationSpec, VerificationTier, VerifyError};
pub use page_ready::{DeniedResponse, ReadinessDetector, ReadinessScope, ReadyError};
pub use pagesync_core_types::{
    ActionId, BrowserSession, ElementHandle, Locator, SessionError, SyncConfig,
};
pub use response_watch::{ReplyClassifier, ReplyQuality, ResponseWatcher};
pub use tool_interact::{ActionOutcome, ClickTarget, InteractionExecutor, Strategy};

pub use condition_wait::{Condition, ConditionEval, ConditionWaiter, WaitError};

/// Failures surfaced by the facade. Interaction failures are not here: they
/// travel inside [`ActionOutcome`] so the caller can decide fatality.
#[derive(Debug, Error)]
pub enum PageSyncError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    NotReady(#[from] ReadyError),

    #[error(transparent)]
    Verify(#[from] VerifyError),

    #[error(transparent)]
    Wait(#[from] WaitError),
}

/// One session, one set of budgets, all five components.
pub struct PageSync {
    session: Box<dyn BrowserSession>,
    detector: ReadinessDetector,
    executor: InteractionExecutor,
    verifier: NavigationVerifier,
    watcher: ResponseWatcher,
    classifier: ReplyClassifier,
    default_timeout: Duration,
    response_timeout: Duration,
}

impl PageSync {
    pub fn new(session: Box<dyn BrowserSession>, config: SyncConfig) -> Self {
        Self {
            detector: ReadinessDetector::new(&config),
            executor: InteractionExecutor::new(&config),
            verifier: NavigationVerifier::new(&config),
            watcher: ResponseWatcher::new(&config),
            classifier: ReplyClassifier::default(),
            default_timeout: config.default_timeout,
            response_timeout: config.response_timeout,
            session,
        }
    }

    /// The underlying session, for operations the facade does not cover.
    pub fn session(&self) -> &dyn BrowserSession {
        self.session.as_ref()
    }

    /// Wait until the page under `scope` has settled.
    pub async fn await_ready(&self, scope: &ReadinessScope) -> Result<(), PageSyncError> {
        self.detector
            .await_ready(self.session.as_ref(), scope, self.default_timeout)
            .await?;
        Ok(())
    }

    /// Click a locator or an already-resolved element, with fallback.
    pub async fn click(&self, target: impl Into<ClickTarget>) -> ActionOutcome {
        self.executor.click(self.session.as_ref(), target).await
    }

    /// Clear the field at `locator` and type `text` into it.
    pub async fn type_text(&self, locator: &Locator, text: &str) -> ActionOutcome {
        self.executor
            .type_text(self.session.as_ref(), locator, text)
            .await
    }

    /// Run the verification cascade against the current page.
    pub async fn verify(&self, spec: &VerificationSpec) -> Result<NavigationResult, PageSyncError> {
        let result = self
            .verifier
            .verify(self.session.as_ref(), spec, self.default_timeout)
            .await?;
        Ok(result)
    }

    /// Navigate, wait for readiness, then confirm arrival. An unready page
    /// is an error; an unconfirmed destination is a negative result.
    pub async fn navigate_and_verify(
        &self,
        url: &str,
        spec: &VerificationSpec,
    ) -> Result<NavigationResult, PageSyncError> {
        info!(url, "navigating");
        self.session.navigate(url).await?;
        self.await_ready(&ReadinessScope::Document).await?;
        self.verify(spec).await
    }

    /// Wait until strictly more than `previous_count` elements match.
    pub async fn await_growth(
        &self,
        locator: &Locator,
        previous_count: usize,
    ) -> Result<(), PageSyncError> {
        self.watcher
            .await_growth(
                self.session.as_ref(),
                locator,
                previous_count,
                self.response_timeout,
            )
            .await?;
        Ok(())
    }

    /// Wait until the loading indicator is gone or its text has drained.
    pub async fn await_quiescent(&self, indicator: &Locator) -> Result<(), PageSyncError> {
        self.watcher
            .await_quiescent(self.session.as_ref(), indicator, self.response_timeout)
            .await?;
        Ok(())
    }

    /// Judge a retrieved reply. Pure; never touches the session.
    pub fn classify_reply(&self, text: &str) -> ReplyQuality {
        self.classifier.classify(text)
    }

    /// Denied fetch responses recorded by the readiness instrumentation.
    pub async fn denied_responses(&self) -> Vec<DeniedResponse> {
        self.detector.denied_responses(self.session.as_ref()).await
    }
}
