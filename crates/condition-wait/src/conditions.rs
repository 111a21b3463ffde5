//! The condition contract and a few reusable probes.
//!
//! A condition is a pure read over the session: it never mutates page state
//! and may be evaluated any number of times. Specialized probes live next to
//! their consumers; the ones here are shared across components.

use std::fmt;

use async_trait::async_trait;
use pagesync_core_types::{BrowserSession, ElementHandle, Locator, SessionError};
use serde_json::Value;

/// Outcome of one condition probe.
#[derive(Debug)]
pub enum ConditionEval<T> {
    /// The condition holds; the wait ends with this value.
    Satisfied(T),
    /// Not yet. Includes transient evaluation errors: a detached node seen
    /// mid-check is indistinguishable from a page that has not settled.
    Pending,
    /// The condition can never hold; the wait ends immediately.
    Fatal(String),
}

impl<T> ConditionEval<T> {
    /// Absorb transient session errors into `Pending`, per the core's
    /// propagation policy: a detached node or busy backend seen mid-poll is
    /// "not yet satisfied". Errors that cannot resolve themselves, like a
    /// failed navigation, end the wait as `Fatal`.
    pub fn absorb(result: Result<Option<T>, SessionError>) -> Self {
        match result {
            Ok(Some(value)) => ConditionEval::Satisfied(value),
            Ok(None) => ConditionEval::Pending,
            Err(err) if err.is_transient() => {
                tracing::debug!("condition probe error absorbed as pending: {}", err);
                ConditionEval::Pending
            }
            Err(err) => ConditionEval::Fatal(err.to_string()),
        }
    }
}

/// A repeatedly evaluated predicate over the browser session.
#[async_trait]
pub trait Condition: Send + Sync + fmt::Debug {
    type Output: Send;

    async fn evaluate(&self, session: &dyn BrowserSession) -> ConditionEval<Self::Output>;
}

/// At least one element matches the locator. Presence only; visibility is
/// not required.
#[derive(Debug, Clone)]
pub struct ElementsPresent {
    pub locator: Locator,
}

#[async_trait]
impl Condition for ElementsPresent {
    type Output = Vec<ElementHandle>;

    async fn evaluate(&self, session: &dyn BrowserSession) -> ConditionEval<Self::Output> {
        ConditionEval::absorb(
            session
                .find_elements(&self.locator)
                .await
                .map(|handles| (!handles.is_empty()).then_some(handles)),
        )
    }
}

/// The current location contains a substring, case-sensitive.
#[derive(Debug, Clone)]
pub struct UrlContains {
    pub needle: String,
}

#[async_trait]
impl Condition for UrlContains {
    type Output = String;

    async fn evaluate(&self, session: &dyn BrowserSession) -> ConditionEval<Self::Output> {
        ConditionEval::absorb(
            session
                .current_url()
                .await
                .map(|url| url.contains(&self.needle).then_some(url)),
        )
    }
}

/// A page script evaluates to boolean `true`. Anything else, including a
/// non-boolean result, counts as pending.
#[derive(Debug, Clone)]
pub struct ScriptReturnsTrue {
    pub script: String,
}

impl ScriptReturnsTrue {
    pub fn new(script: impl Into<String>) -> Self {
        Self {
            script: script.into(),
        }
    }
}

#[async_trait]
impl Condition for ScriptReturnsTrue {
    type Output = ();

    async fn evaluate(&self, session: &dyn BrowserSession) -> ConditionEval<Self::Output> {
        ConditionEval::absorb(
            session
                .execute_script(&self.script)
                .await
                .map(|value| matches!(value, Value::Bool(true)).then_some(())),
        )
    }
}
