use std::fmt;

use serde::{Deserialize, Serialize};

/// Selector expression used to find elements in the page.
///
/// Two locators with the same strategy and selector string are
/// interchangeable: equality and hashing go by the string, so a locator can
/// serve as a catalog map key.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Locator {
    /// CSS selector, e.g. `.TasksPage_container__r7VvT`.
    Css(String),
    /// Structural path, e.g. `//a[@data-tooltip-content='Actions']`.
    XPath(String),
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    pub fn xpath(path: impl Into<String>) -> Self {
        Self::XPath(path.into())
    }

    /// The raw selector string, without the strategy tag.
    pub fn selector(&self) -> &str {
        match self {
            Self::Css(s) | Self::XPath(s) => s,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(s) => write!(f, "css={}", s),
            Self::XPath(s) => write!(f, "xpath={}", s),
        }
    }
}
