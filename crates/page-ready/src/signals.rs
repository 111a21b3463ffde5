//! Enumerated sources of stabilization evidence.
//!
//! Checked in declaration order. `DocumentComplete` is mandatory; the rest
//! degrade to satisfied when the framework they watch is absent or never
//! settles, because plenty of pages simply do not use them.

use condition_wait::{Condition, ConditionEval, ScriptReturnsTrue};
use pagesync_core_types::BrowserSession;
use serde_json::Value;

use crate::scripts;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ReadinessSignal {
    DocumentComplete,
    LegacyAjaxIdle,
    FrameworkDigestIdle,
    DomMutationQuiet,
}

impl ReadinessSignal {
    pub fn name(&self) -> &'static str {
        match self {
            Self::DocumentComplete => "document-complete",
            Self::LegacyAjaxIdle => "legacy-ajax-idle",
            Self::FrameworkDigestIdle => "framework-digest-idle",
            Self::DomMutationQuiet => "dom-mutation-quiet",
        }
    }

    /// Whether a timeout on this signal fails readiness as a whole.
    pub fn is_mandatory(&self) -> bool {
        matches!(self, Self::DocumentComplete)
    }
}

/// `document.readyState === "complete"`.
#[derive(Debug, Clone)]
pub struct DocumentComplete;

#[async_trait::async_trait]
impl Condition for DocumentComplete {
    type Output = ();

    async fn evaluate(&self, session: &dyn BrowserSession) -> ConditionEval<Self::Output> {
        ConditionEval::absorb(
            session
                .execute_script(scripts::DOCUMENT_READY_STATE)
                .await
                .map(|value| (value == Value::from("complete")).then_some(())),
        )
    }
}

pub fn legacy_ajax_idle() -> ScriptReturnsTrue {
    ScriptReturnsTrue::new(scripts::LEGACY_AJAX_IDLE)
}

pub fn framework_digest_idle() -> ScriptReturnsTrue {
    ScriptReturnsTrue::new(scripts::FRAMEWORK_DIGEST_IDLE)
}

/// No DOM mutation observed for at least the stability window.
#[derive(Debug, Clone)]
pub struct DomQuiet {
    pub stability_window_ms: u64,
}

#[async_trait::async_trait]
impl Condition for DomQuiet {
    type Output = ();

    async fn evaluate(&self, session: &dyn BrowserSession) -> ConditionEval<Self::Output> {
        ConditionEval::absorb(session.execute_script(scripts::MUTATION_AGE).await.map(
            |value| match value.as_u64() {
                Some(age_ms) if age_ms > self.stability_window_ms => Some(()),
                _ => None,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagesync_core_types::StubSession;

    #[tokio::test]
    async fn document_complete_matches_exact_ready_state() {
        let session = StubSession::new();
        session.script_result("document.readyState", Value::from("interactive"));
        assert!(matches!(
            DocumentComplete.evaluate(&session).await,
            ConditionEval::Pending
        ));

        let session = StubSession::new();
        session.script_result("document.readyState", Value::from("complete"));
        assert!(matches!(
            DocumentComplete.evaluate(&session).await,
            ConditionEval::Satisfied(())
        ));
    }

    #[tokio::test]
    async fn dom_quiet_requires_age_beyond_the_window() {
        let session = StubSession::new();
        session.script_result("lastMutation", Value::from(200));
        let probe = DomQuiet {
            stability_window_ms: 500,
        };
        assert!(matches!(
            probe.evaluate(&session).await,
            ConditionEval::Pending
        ));

        let session = StubSession::new();
        session.script_result("lastMutation", Value::from(750));
        assert!(matches!(
            probe.evaluate(&session).await,
            ConditionEval::Satisfied(())
        ));
    }

    #[tokio::test]
    async fn missing_probe_reads_as_pending() {
        let session = StubSession::new();
        session.script_result("lastMutation", Value::Null);
        let probe = DomQuiet {
            stability_window_ms: 500,
        };
        assert!(matches!(
            probe.evaluate(&session).await,
            ConditionEval::Pending
        ));
    }

    #[test]
    fn only_document_complete_is_mandatory() {
        assert!(ReadinessSignal::DocumentComplete.is_mandatory());
        assert!(!ReadinessSignal::LegacyAjaxIdle.is_mandatory());
        assert!(!ReadinessSignal::FrameworkDigestIdle.is_mandatory());
        assert!(!ReadinessSignal::DomMutationQuiet.is_mandatory());
    }
}
