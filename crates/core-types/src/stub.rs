//! Scripted in-memory session for unit tests of the core.
//!
//! The stub plays back a small world: a current URL, element sets per
//! locator, canned script results, and staged DOM changes that become
//! visible after a configured number of polls. Every interaction is
//! recorded so tests can assert on which strategy actually landed.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::locator::Locator;
use crate::session::{BrowserSession, ElementHandle, SessionError};

/// Blueprint for one stubbed element.
#[derive(Clone, Debug)]
pub struct StubElement {
    pub text: String,
    pub displayed: bool,
    pub interactable: bool,
    pub native_click_fails: bool,
}

impl StubElement {
    /// Visible and interactable.
    pub fn visible(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            displayed: true,
            interactable: true,
            native_click_fails: false,
        }
    }

    /// Present in the DOM but not displayed.
    pub fn hidden(text: impl Into<String>) -> Self {
        Self {
            displayed: false,
            interactable: false,
            ..Self::visible(text)
        }
    }

    /// Displayed but covered by an overlay: visible, not interactable.
    pub fn obscured(text: impl Into<String>) -> Self {
        Self {
            interactable: false,
            ..Self::visible(text)
        }
    }

    /// Native pointer clicks fail on this element; script clicks land.
    pub fn with_native_click_failure(mut self) -> Self {
        self.native_click_fails = true;
        self
    }
}

struct StagedUpdate {
    locator: Locator,
    elements: Vec<StubElement>,
    polls_remaining: u32,
}

struct ScriptPlan {
    needle: String,
    results: VecDeque<Value>,
    sticky: Option<Value>,
}

#[derive(Default)]
struct Inner {
    url: String,
    title: String,
    next_handle: u64,
    catalog: HashMap<Locator, Vec<u64>>,
    elements: HashMap<u64, StubElement>,
    staged: Vec<StagedUpdate>,
    scripts: Vec<ScriptPlan>,
    native_clicks: Vec<u64>,
    script_clicks: Vec<u64>,
    cleared: Vec<u64>,
    typed: Vec<(u64, String)>,
    navigations: Vec<String>,
}

pub struct StubSession {
    inner: Mutex<Inner>,
}

impl StubSession {
    pub fn new() -> Self {
        let session = Self {
            inner: Mutex::new(Inner::default()),
        };
        session.set_url("about:blank");
        session
    }

    pub fn set_url(&self, url: impl Into<String>) {
        self.lock().url = url.into();
    }

    pub fn set_title(&self, title: impl Into<String>) {
        self.lock().title = title.into();
    }

    /// Replace the element set for a locator. Previous handles go stale.
    pub fn insert_elements(
        &self,
        locator: Locator,
        elements: Vec<StubElement>,
    ) -> Vec<ElementHandle> {
        let mut inner = self.lock();
        let handles = Self::install(&mut inner, &locator, elements);
        handles.iter().copied().map(ElementHandle).collect()
    }

    /// Replace the element set for a locator after `after_polls` further
    /// `find_elements` calls on it still saw the old state.
    pub fn stage_elements(&self, locator: Locator, elements: Vec<StubElement>, after_polls: u32) {
        self.lock().staged.push(StagedUpdate {
            locator,
            elements,
            polls_remaining: after_polls,
        });
    }

    /// Canned result for any script containing `needle`; repeats forever.
    pub fn script_result(&self, needle: impl Into<String>, value: Value) {
        self.lock().scripts.push(ScriptPlan {
            needle: needle.into(),
            results: VecDeque::new(),
            sticky: Some(value),
        });
    }

    /// Canned results played back in order; the last one repeats.
    pub fn script_sequence(&self, needle: impl Into<String>, values: Vec<Value>) {
        self.lock().scripts.push(ScriptPlan {
            needle: needle.into(),
            results: values.into(),
            sticky: None,
        });
    }

    pub fn native_clicks(&self) -> Vec<u64> {
        self.lock().native_clicks.clone()
    }

    pub fn script_clicks(&self) -> Vec<u64> {
        self.lock().script_clicks.clone()
    }

    pub fn cleared(&self) -> Vec<u64> {
        self.lock().cleared.clone()
    }

    pub fn typed(&self) -> Vec<(u64, String)> {
        self.lock().typed.clone()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.lock().navigations.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("stub session state poisoned")
    }

    fn install(inner: &mut Inner, locator: &Locator, elements: Vec<StubElement>) -> Vec<u64> {
        if let Some(old) = inner.catalog.remove(locator) {
            for id in old {
                inner.elements.remove(&id);
            }
        }
        let mut handles = Vec::with_capacity(elements.len());
        for element in elements {
            let id = inner.next_handle;
            inner.next_handle += 1;
            inner.elements.insert(id, element);
            handles.push(id);
        }
        inner.catalog.insert(locator.clone(), handles.clone());
        handles
    }

    fn apply_due_stages(inner: &mut Inner, locator: &Locator) {
        let mut due = Vec::new();
        let mut index = 0;
        while index < inner.staged.len() {
            if &inner.staged[index].locator != locator {
                index += 1;
                continue;
            }
            if inner.staged[index].polls_remaining == 0 {
                due.push(inner.staged.remove(index).elements);
            } else {
                inner.staged[index].polls_remaining -= 1;
                index += 1;
            }
        }
        for elements in due {
            Self::install(inner, locator, elements);
        }
    }

    fn element<'a>(
        inner: &'a Inner,
        handle: &ElementHandle,
    ) -> Result<&'a StubElement, SessionError> {
        inner
            .elements
            .get(&handle.0)
            .ok_or(SessionError::StaleElement)
    }
}

impl Default for StubSession {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BrowserSession for StubSession {
    async fn navigate(&self, url: &str) -> Result<(), SessionError> {
        let mut inner = self.lock();
        inner.navigations.push(url.to_string());
        inner.url = url.to_string();
        Ok(())
    }

    async fn current_url(&self) -> Result<String, SessionError> {
        Ok(self.lock().url.clone())
    }

    async fn title(&self) -> Result<String, SessionError> {
        Ok(self.lock().title.clone())
    }

    async fn find_elements(&self, locator: &Locator) -> Result<Vec<ElementHandle>, SessionError> {
        let mut inner = self.lock();
        Self::apply_due_stages(&mut inner, locator);
        Ok(inner
            .catalog
            .get(locator)
            .map(|handles| handles.iter().copied().map(ElementHandle).collect())
            .unwrap_or_default())
    }

    async fn execute_script(&self, script: &str) -> Result<Value, SessionError> {
        let mut inner = self.lock();
        for plan in inner.scripts.iter_mut() {
            if !script.contains(&plan.needle) {
                continue;
            }
            if let Some(next) = plan.results.pop_front() {
                if plan.results.is_empty() && plan.sticky.is_none() {
                    plan.sticky = Some(next.clone());
                }
                return Ok(next);
            }
            if let Some(sticky) = &plan.sticky {
                return Ok(sticky.clone());
            }
        }
        Ok(Value::Null)
    }

    async fn click(&self, element: &ElementHandle) -> Result<(), SessionError> {
        let mut inner = self.lock();
        let spec = Self::element(&inner, element)?;
        if spec.native_click_fails || !spec.interactable {
            return Err(SessionError::NotInteractable);
        }
        inner.native_clicks.push(element.0);
        Ok(())
    }

    async fn script_click(&self, element: &ElementHandle) -> Result<(), SessionError> {
        let mut inner = self.lock();
        Self::element(&inner, element)?;
        inner.script_clicks.push(element.0);
        Ok(())
    }

    async fn clear(&self, element: &ElementHandle) -> Result<(), SessionError> {
        let mut inner = self.lock();
        Self::element(&inner, element)?;
        inner.cleared.push(element.0);
        if let Some(spec) = inner.elements.get_mut(&element.0) {
            spec.text.clear();
        }
        Ok(())
    }

    async fn type_text(&self, element: &ElementHandle, text: &str) -> Result<(), SessionError> {
        let mut inner = self.lock();
        Self::element(&inner, element)?;
        inner.typed.push((element.0, text.to_string()));
        if let Some(spec) = inner.elements.get_mut(&element.0) {
            spec.text.push_str(text);
        }
        Ok(())
    }

    async fn text(&self, element: &ElementHandle) -> Result<String, SessionError> {
        let inner = self.lock();
        Ok(Self::element(&inner, element)?.text.clone())
    }

    async fn is_displayed(&self, element: &ElementHandle) -> Result<bool, SessionError> {
        let inner = self.lock();
        Ok(Self::element(&inner, element)?.displayed)
    }

    async fn is_interactable(&self, element: &ElementHandle) -> Result<bool, SessionError> {
        let inner = self.lock();
        Ok(Self::element(&inner, element)?.interactable)
    }
}
