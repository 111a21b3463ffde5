use std::time::Duration;

use async_trait::async_trait;
use condition_wait::{Condition, ConditionEval, ConditionWaiter};
use page_ready::{ReadinessDetector, ReadinessScope};
use pagesync_core_types::{BrowserSession, ElementHandle, Locator, SyncConfig};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::errors::InteractionError;
use crate::model::{ActionOutcome, ClickTarget, Strategy, CLICK_STRATEGIES};

/// The target resolves to an element that is displayed and accepts pointer
/// events. Yields the resolved handle so the fallback strategy acts on the
/// very same element the native attempt did.
#[derive(Debug, Clone)]
struct ElementInteractable {
    locator: Locator,
}

#[async_trait]
impl Condition for ElementInteractable {
    type Output = ElementHandle;

    async fn evaluate(&self, session: &dyn BrowserSession) -> ConditionEval<Self::Output> {
        let handles = match session.find_elements(&self.locator).await {
            Ok(handles) => handles,
            Err(_) => return ConditionEval::Pending,
        };
        for handle in handles {
            let displayed = session.is_displayed(&handle).await.unwrap_or(false);
            let interactable = session.is_interactable(&handle).await.unwrap_or(false);
            if displayed && interactable {
                return ConditionEval::Satisfied(handle);
            }
        }
        ConditionEval::Pending
    }
}

/// Performs clicks and text entry with readiness prechecks, bounded target
/// resolution and an ordered fallback chain.
pub struct InteractionExecutor {
    waiter: ConditionWaiter,
    detector: ReadinessDetector,
    target_timeout: Duration,
}

impl InteractionExecutor {
    pub fn new(config: &SyncConfig) -> Self {
        Self {
            waiter: ConditionWaiter::from_config(config),
            detector: ReadinessDetector::new(config),
            target_timeout: config.default_timeout,
        }
    }

    /// Click the target, falling back to a script-dispatched click when the
    /// native pointer path fails.
    pub async fn click(
        &self,
        session: &dyn BrowserSession,
        target: impl Into<ClickTarget>,
    ) -> ActionOutcome {
        let outcome = ActionOutcome::begin();
        let started = Instant::now();
        let target = target.into();
        info!(action_id = %outcome.action_id, ?target, "executing click");

        if !self.page_ready(session).await {
            return outcome.fail(InteractionError::PageNotReady, elapsed_ms(started));
        }

        let handle = match self.resolve_click_target(session, target).await {
            Some(handle) => handle,
            None => {
                warn!("click target never appeared");
                return outcome.fail(InteractionError::TargetUnavailable, elapsed_ms(started));
            }
        };

        for strategy in CLICK_STRATEGIES {
            match self.attempt(session, &handle, *strategy).await {
                Ok(()) => {
                    info!(action_id = %outcome.action_id, ?strategy, "click landed");
                    return outcome.succeed(*strategy, elapsed_ms(started));
                }
                Err(err) => {
                    warn!(?strategy, "click strategy failed: {}", err);
                }
            }
        }

        outcome.fail(InteractionError::InteractionFailed, elapsed_ms(started))
    }

    /// Clear the target field and type `text` into it. Never appends to
    /// existing content.
    pub async fn type_text(
        &self,
        session: &dyn BrowserSession,
        locator: &Locator,
        text: &str,
    ) -> ActionOutcome {
        let outcome = ActionOutcome::begin();
        let started = Instant::now();
        info!(action_id = %outcome.action_id, %locator, "typing into target");

        if !self.page_ready(session).await {
            return outcome.fail(InteractionError::PageNotReady, elapsed_ms(started));
        }

        let handle = match self.wait_interactable(session, locator.clone()).await {
            Some(handle) => handle,
            None => {
                warn!("type target never became interactable");
                return outcome.fail(InteractionError::TargetUnavailable, elapsed_ms(started));
            }
        };

        let typed = async {
            session.clear(&handle).await?;
            session.type_text(&handle, text).await
        }
        .await;

        match typed {
            Ok(()) => outcome.succeed(Strategy::Native, elapsed_ms(started)),
            Err(err) => {
                warn!("text entry failed: {}", err);
                outcome.fail(InteractionError::InteractionFailed, elapsed_ms(started))
            }
        }
    }

    async fn page_ready(&self, session: &dyn BrowserSession) -> bool {
        match self
            .detector
            .await_ready(session, &ReadinessScope::Document, self.target_timeout)
            .await
        {
            Ok(()) => true,
            Err(err) => {
                warn!("readiness precheck failed: {}", err);
                false
            }
        }
    }

    /// Prefer an interactable element, but a target that is present and
    /// merely never becomes interactable still enters the strategy loop:
    /// the script-dispatched fallback exists precisely for elements a
    /// pointer cannot reach. Only a truly absent target is unavailable.
    async fn resolve_click_target(
        &self,
        session: &dyn BrowserSession,
        target: ClickTarget,
    ) -> Option<ElementHandle> {
        let locator = match target {
            ClickTarget::Element(handle) => return Some(handle),
            ClickTarget::Locator(locator) => locator,
        };
        if let Some(handle) = self.wait_interactable(session, locator.clone()).await {
            return Some(handle);
        }
        match session.find_elements(&locator).await {
            Ok(handles) => {
                let handle = handles.into_iter().next();
                if handle.is_some() {
                    warn!(%locator, "target present but not interactable; trying strategies anyway");
                }
                handle
            }
            Err(_) => None,
        }
    }

    async fn wait_interactable(
        &self,
        session: &dyn BrowserSession,
        locator: Locator,
    ) -> Option<ElementHandle> {
        self.waiter
            .wait_for(
                session,
                &ElementInteractable { locator },
                self.target_timeout,
            )
            .await
            .ok()
    }

    async fn attempt(
        &self,
        session: &dyn BrowserSession,
        handle: &ElementHandle,
        strategy: Strategy,
    ) -> Result<(), pagesync_core_types::SessionError> {
        debug!(?strategy, "attempting click strategy");
        match strategy {
            Strategy::Native => session.click(handle).await,
            Strategy::ScriptInjected => session.script_click(handle).await,
        }
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagesync_core_types::{StubElement, StubSession};
    use serde_json::Value;

    fn ready_page(session: &StubSession) {
        session.script_result("document.readyState", Value::from("complete"));
        session.script_result("jQuery", Value::Bool(true));
        session.script_result("angular", Value::Bool(true));
        session.script_result("__pagesyncProbe)", Value::Bool(true));
        session.script_result("lastMutation", Value::from(2_000));
    }

    fn executor() -> InteractionExecutor {
        InteractionExecutor::new(&SyncConfig {
            poll_interval: Duration::from_millis(100),
            default_timeout: Duration::from_millis(800),
            ..SyncConfig::default()
        })
    }

    #[tokio::test(start_paused = true)]
    async fn native_click_is_preferred_when_it_works() {
        let session = StubSession::new();
        ready_page(&session);
        let button = Locator::xpath("//a[@data-tooltip-content='Tokens']");
        session.insert_elements(button.clone(), vec![StubElement::visible("Tokens")]);

        let outcome = executor().click(&session, button).await;
        assert!(outcome.succeeded);
        assert_eq!(outcome.strategy, Some(Strategy::Native));
        assert_eq!(session.native_clicks().len(), 1);
        assert!(session.script_clicks().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn falls_back_to_script_click_when_native_throws() {
        let session = StubSession::new();
        ready_page(&session);
        let button = Locator::css("button.AIChat_submit__ciifR");
        session.insert_elements(
            button.clone(),
            vec![StubElement::visible("Send").with_native_click_failure()],
        );

        let outcome = executor().click(&session, button).await;
        assert!(outcome.succeeded);
        assert_eq!(outcome.strategy, Some(Strategy::ScriptInjected));
        assert!(outcome.error.is_none());
        assert!(session.native_clicks().is_empty());
        assert_eq!(session.script_clicks().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn absent_target_reports_unavailable_without_attempting_strategies() {
        let session = StubSession::new();
        ready_page(&session);

        let outcome = executor()
            .click(&session, Locator::css("#not-there"))
            .await;
        assert!(!outcome.succeeded);
        assert_eq!(outcome.error, Some(InteractionError::TargetUnavailable));
        assert!(session.native_clicks().is_empty());
        assert!(session.script_clicks().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn obscured_target_becomes_clickable_once_the_overlay_clears() {
        let session = StubSession::new();
        ready_page(&session);
        let button = Locator::css(".MainMenu_link__ICVs0");
        session.insert_elements(button.clone(), vec![StubElement::obscured("Analytics")]);
        session.stage_elements(button.clone(), vec![StubElement::visible("Analytics")], 2);

        let outcome = executor().click(&session, button).await;
        assert!(outcome.succeeded);
        assert_eq!(outcome.strategy, Some(Strategy::Native));
    }

    #[tokio::test(start_paused = true)]
    async fn permanently_obscured_target_still_lands_via_script_click() {
        let session = StubSession::new();
        ready_page(&session);
        let button = Locator::css(".MainMenu_link__ICVs0");
        // Overlay never clears; the interactable wait burns its whole budget.
        session.insert_elements(button.clone(), vec![StubElement::obscured("Analytics")]);

        let outcome = executor().click(&session, button).await;
        assert!(outcome.succeeded);
        assert_eq!(outcome.strategy, Some(Strategy::ScriptInjected));
        assert!(outcome.error.is_none());
        assert!(session.native_clicks().is_empty());
        assert_eq!(session.script_clicks().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn unready_page_blocks_interaction() {
        let session = StubSession::new();
        session.script_result("document.readyState", Value::from("loading"));
        let button = Locator::css("#login");
        session.insert_elements(button.clone(), vec![StubElement::visible("Login")]);

        let outcome = executor().click(&session, button).await;
        assert!(!outcome.succeeded);
        assert_eq!(outcome.error, Some(InteractionError::PageNotReady));
    }

    #[tokio::test(start_paused = true)]
    async fn typing_clears_before_sending() {
        let session = StubSession::new();
        ready_page(&session);
        let input = Locator::css("textarea[name='message']");
        let handles = session.insert_elements(
            input.clone(),
            vec![StubElement::visible("previous draft")],
        );

        let outcome = executor()
            .type_text(&session, &input, "summarize this data")
            .await;
        assert!(outcome.succeeded);
        assert_eq!(session.cleared(), vec![handles[0].0]);
        assert_eq!(
            session.typed(),
            vec![(handles[0].0, "summarize this data".to_string())]
        );
        assert_eq!(
            session.text(&handles[0]).await.unwrap(),
            "summarize this data"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn direct_element_handles_skip_resolution() {
        let session = StubSession::new();
        ready_page(&session);
        let handles = session.insert_elements(
            Locator::css(".AIChat_prompt__WYQFV"),
            vec![StubElement::visible("Twitter post")],
        );

        let outcome = executor().click(&session, handles[0]).await;
        assert!(outcome.succeeded);
        assert_eq!(session.native_clicks(), vec![handles[0].0]);
    }
}
