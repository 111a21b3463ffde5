//! Per-tier probes for the verification cascade.

use async_trait::async_trait;
use condition_wait::{Condition, ConditionEval};
use pagesync_core_types::{BrowserSession, Locator};
use serde_json::Value;

/// The primary landmark is visible and its text carries the expected
/// fragment, case-insensitive. A visible element with the wrong text stays
/// pending; the cascade falls through to weaker tiers instead of failing.
#[derive(Debug, Clone)]
pub struct PrimaryMatches {
    pub locator: Locator,
    pub expected_text: String,
}

#[async_trait]
impl Condition for PrimaryMatches {
    type Output = ();

    async fn evaluate(&self, session: &dyn BrowserSession) -> ConditionEval<Self::Output> {
        let handles = match session.find_elements(&self.locator).await {
            Ok(handles) => handles,
            Err(_) => return ConditionEval::Pending,
        };
        let expected = self.expected_text.to_lowercase();
        for handle in handles {
            if !session.is_displayed(&handle).await.unwrap_or(false) {
                continue;
            }
            if let Ok(text) = session.text(&handle).await {
                if text.to_lowercase().contains(&expected) {
                    return ConditionEval::Satisfied(());
                }
            }
        }
        ConditionEval::Pending
    }
}

/// Any of the fallback selectors resolves to at least one element. Presence
/// only; the landmark may still be fading in. Yields the index of the first
/// selector that matched.
#[derive(Debug, Clone)]
pub struct AnyAlternativePresent {
    pub locators: Vec<Locator>,
}

#[async_trait]
impl Condition for AnyAlternativePresent {
    type Output = usize;

    async fn evaluate(&self, session: &dyn BrowserSession) -> ConditionEval<Self::Output> {
        for (index, locator) in self.locators.iter().enumerate() {
            match session.find_elements(locator).await {
                Ok(handles) if !handles.is_empty() => {
                    return ConditionEval::Satisfied(index);
                }
                Ok(_) | Err(_) => {}
            }
        }
        ConditionEval::Pending
    }
}

/// Any keyword appears among the page's visible text nodes,
/// case-insensitive. The scan is bounded so a long page cannot turn one
/// probe into a full-DOM walk.
#[derive(Debug, Clone)]
pub struct KeywordVisible {
    pub keywords: Vec<String>,
    pub max_text_nodes: usize,
}

impl KeywordVisible {
    fn scan_script(&self) -> String {
        format!(
            "var limit = {limit};\
             var out = [];\
             var walker = document.createTreeWalker(document.body, NodeFilter.SHOW_TEXT);\
             var node;\
             while ((node = walker.nextNode()) && out.length < limit) {{\
               var text = node.textContent.trim();\
               if (!text) continue;\
               var el = node.parentElement;\
               if (!el) continue;\
               var style = window.getComputedStyle(el);\
               if (style.display === 'none' || style.visibility === 'hidden') continue;\
               out.push(text);\
             }}\
             return out;",
            limit = self.max_text_nodes
        )
    }
}

#[async_trait]
impl Condition for KeywordVisible {
    type Output = ();

    async fn evaluate(&self, session: &dyn BrowserSession) -> ConditionEval<Self::Output> {
        let value = match session.execute_script(&self.scan_script()).await {
            Ok(value) => value,
            Err(_) => return ConditionEval::Pending,
        };
        let Value::Array(nodes) = value else {
            return ConditionEval::Pending;
        };
        let needles: Vec<String> = self.keywords.iter().map(|k| k.to_lowercase()).collect();
        for node in nodes {
            let Some(text) = node.as_str() else { continue };
            let text = text.to_lowercase();
            if needles.iter().any(|needle| text.contains(needle)) {
                return ConditionEval::Satisfied(());
            }
        }
        ConditionEval::Pending
    }
}
