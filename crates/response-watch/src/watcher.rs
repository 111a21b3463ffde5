use std::time::Duration;

use async_trait::async_trait;
use condition_wait::{Condition, ConditionEval, ConditionWaiter, WaitError};
use pagesync_core_types::{BrowserSession, Locator, SyncConfig};
use tracing::{debug, info};

/// Count of elements matching the locator is strictly greater than the
/// threshold.
#[derive(Debug, Clone)]
pub struct ElementCountAbove {
    pub locator: Locator,
    pub threshold: usize,
}

#[async_trait]
impl Condition for ElementCountAbove {
    type Output = usize;

    async fn evaluate(&self, session: &dyn BrowserSession) -> ConditionEval<Self::Output> {
        ConditionEval::absorb(session.find_elements(&self.locator).await.map(|handles| {
            let count = handles.len();
            debug!(count, threshold = self.threshold, "polled element count");
            (count > self.threshold).then_some(count)
        }))
    }
}

/// Loading indicator has drained: no matching element, or its text is empty.
#[derive(Debug, Clone)]
struct IndicatorDrained {
    locator: Locator,
}

#[async_trait]
impl Condition for IndicatorDrained {
    type Output = ();

    async fn evaluate(&self, session: &dyn BrowserSession) -> ConditionEval<Self::Output> {
        let handles = match session.find_elements(&self.locator).await {
            Ok(handles) => handles,
            Err(_) => return ConditionEval::Pending,
        };
        let Some(first) = handles.first() else {
            return ConditionEval::Satisfied(());
        };
        ConditionEval::absorb(
            session
                .text(first)
                .await
                .map(|text| text.trim().is_empty().then_some(())),
        )
    }
}

/// Detects growth of an asynchronous content stream, e.g. a chat reply
/// list gaining an entry. Content quality is out of scope here; see
/// [`crate::ReplyClassifier`].
pub struct ResponseWatcher {
    waiter: ConditionWaiter,
}

impl ResponseWatcher {
    pub fn new(config: &SyncConfig) -> Self {
        Self {
            waiter: ConditionWaiter::from_config(config),
        }
    }

    /// Wait until more than `previous_count` elements match `locator`.
    pub async fn await_growth(
        &self,
        session: &dyn BrowserSession,
        locator: &Locator,
        previous_count: usize,
        timeout: Duration,
    ) -> Result<(), WaitError> {
        let count = self
            .waiter
            .wait_for(
                session,
                &ElementCountAbove {
                    locator: locator.clone(),
                    threshold: previous_count,
                },
                timeout,
            )
            .await?;
        info!(previous_count, count, "new content arrived");
        Ok(())
    }

    /// Wait until a loading indicator disappears or its text drains to
    /// empty. An indicator that was never present counts as already
    /// complete.
    pub async fn await_quiescent(
        &self,
        session: &dyn BrowserSession,
        indicator: &Locator,
        timeout: Duration,
    ) -> Result<(), WaitError> {
        self.waiter
            .wait_for(
                session,
                &IndicatorDrained {
                    locator: indicator.clone(),
                },
                timeout,
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagesync_core_types::{StubElement, StubSession};
    use tokio::time::Instant;

    fn watcher() -> ResponseWatcher {
        ResponseWatcher::new(&SyncConfig {
            poll_interval: Duration::from_millis(100),
            ..SyncConfig::default()
        })
    }

    fn messages() -> Vec<StubElement> {
        vec![
            StubElement::visible("question"),
            StubElement::visible("answer"),
            StubElement::visible("question"),
        ]
    }

    #[tokio::test(start_paused = true)]
    async fn growth_resolves_as_soon_as_a_new_element_appears() {
        let session = StubSession::new();
        let list = Locator::css(".AIChat_list__1KKWq li");
        session.insert_elements(list.clone(), messages());
        let mut grown = messages();
        grown.push(StubElement::visible("fresh reply"));
        session.stage_elements(list.clone(), grown, 2);

        let started = Instant::now();
        watcher()
            .await_growth(&session, &list, 3, Duration::from_secs(10))
            .await
            .unwrap();
        assert_eq!(started.elapsed(), Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn stagnant_count_times_out() {
        let session = StubSession::new();
        let list = Locator::css(".AIChat_list__1KKWq li");
        session.insert_elements(list.clone(), messages());

        let err = watcher()
            .await_growth(&session, &list, 3, Duration::from_millis(500))
            .await
            .unwrap_err();
        assert!(err.is_timeout());
    }

    #[tokio::test(start_paused = true)]
    async fn an_equal_count_is_not_growth() {
        let session = StubSession::new();
        let list = Locator::css(".AIChat_list__1KKWq li");
        // Replacement with the same count must not satisfy the wait.
        session.stage_elements(list.clone(), messages(), 0);
        session.insert_elements(list.clone(), messages());

        let err = watcher()
            .await_growth(&session, &list, 3, Duration::from_millis(300))
            .await
            .unwrap_err();
        assert!(err.is_timeout());
    }

    #[tokio::test(start_paused = true)]
    async fn absent_indicator_is_immediately_quiescent() {
        let session = StubSession::new();
        let indicator = Locator::css(".AIChat_service__piLWs");

        let started = Instant::now();
        watcher()
            .await_quiescent(&session, &indicator, Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn indicator_text_draining_to_empty_counts_as_complete() {
        let session = StubSession::new();
        let indicator = Locator::css(".AIChat_service__piLWs");
        session.insert_elements(indicator.clone(), vec![StubElement::visible("thinking...")]);
        session.stage_elements(indicator.clone(), vec![StubElement::visible("  ")], 1);

        watcher()
            .await_quiescent(&session, &indicator, Duration::from_secs(5))
            .await
            .unwrap();
    }
}
