use pagesync_core_types::Locator;
use serde::{Deserialize, Serialize};

use crate::errors::VerifyError;

/// How many visible text nodes the keyword tier scans per probe.
pub const DEFAULT_MAX_TEXT_NODES: usize = 50;

/// Declarative description of what "we arrived" looks like for one
/// destination. Built once per destination and kept in a catalog; the
/// verifier never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VerificationSpec {
    /// Path fragment the current location must contain, case-sensitive.
    pub url_path_segment: Option<String>,
    /// The landmark element and the text it should carry.
    pub primary: Option<PrimaryIndicator>,
    /// Fallback selectors for the same landmark, tried in order.
    pub alternatives: Vec<Locator>,
    /// Last-resort keywords scanned over visible page text.
    pub keywords: Vec<String>,
    /// Cap on the visible text nodes scanned by the keyword tier.
    pub max_text_nodes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrimaryIndicator {
    pub locator: Locator,
    /// Matched case-insensitively against the element's text.
    pub expected_text: String,
}

impl Default for VerificationSpec {
    fn default() -> Self {
        Self {
            url_path_segment: None,
            primary: None,
            alternatives: Vec::new(),
            keywords: Vec::new(),
            max_text_nodes: DEFAULT_MAX_TEXT_NODES,
        }
    }
}

impl VerificationSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn url_path_segment(mut self, segment: impl Into<String>) -> Self {
        self.url_path_segment = Some(segment.into());
        self
    }

    pub fn primary(mut self, locator: Locator, expected_text: impl Into<String>) -> Self {
        self.primary = Some(PrimaryIndicator {
            locator,
            expected_text: expected_text.into(),
        });
        self
    }

    pub fn alternative(mut self, locator: Locator) -> Self {
        self.alternatives.push(locator);
        self
    }

    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keywords.push(keyword.into());
        self
    }

    pub fn max_text_nodes(mut self, cap: usize) -> Self {
        self.max_text_nodes = cap;
        self
    }

    /// A spec must carry at least one strong evidence source. Alternatives
    /// and keywords only refine a real expectation; on their own they would
    /// confirm nearly any page.
    pub fn validate(&self) -> Result<(), VerifyError> {
        if self.url_path_segment.is_none() && self.primary.is_none() {
            return Err(VerifyError::InvalidSpec(
                "needs a url path segment or a primary indicator".into(),
            ));
        }
        Ok(())
    }
}

/// Which evidence tier confirmed the navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerificationTier {
    Url,
    PrimaryElement,
    AlternativeElement,
    TextHeuristic,
    /// Nothing held within the budget.
    None,
}

/// Outcome of one verification run. Immutable once returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationResult {
    pub confirmed: bool,
    pub tier: VerificationTier,
    /// Which alternative selector matched, when that tier confirmed.
    pub alternative_index: Option<usize>,
    pub latency_ms: u64,
}

impl NavigationResult {
    pub(crate) fn confirmed(tier: VerificationTier, latency_ms: u64) -> Self {
        Self {
            confirmed: true,
            tier,
            alternative_index: None,
            latency_ms,
        }
    }

    pub(crate) fn via_alternative(index: usize, latency_ms: u64) -> Self {
        Self {
            alternative_index: Some(index),
            ..Self::confirmed(VerificationTier::AlternativeElement, latency_ms)
        }
    }

    pub(crate) fn unconfirmed(latency_ms: u64) -> Self {
        Self {
            confirmed: false,
            tier: VerificationTier::None,
            alternative_index: None,
            latency_ms,
        }
    }
}
