use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::locator::Locator;

/// Opaque per-session element identity. Only meaningful to the session that
/// produced it; a handle outlives the element it points at only as a stale
/// reference.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct ElementHandle(pub u64);

/// Errors surfaced by the browser boundary.
#[derive(Debug, Error, Clone)]
pub enum SessionError {
    #[error("element reference went stale")]
    StaleElement,
    #[error("element is not interactable")]
    NotInteractable,
    #[error("script evaluation failed: {0}")]
    ScriptFailed(String),
    #[error("navigation failed: {0}")]
    NavigationFailed(String),
    #[error("browser backend error: {0}")]
    Backend(String),
}

impl SessionError {
    /// Whether a polling caller may absorb this error and try again.
    /// Stale references and transiently obscured elements resolve themselves
    /// as the page settles; script and backend failures may too, but a
    /// navigation failure never does.
    pub fn is_transient(&self) -> bool {
        !matches!(self, SessionError::NavigationFailed(_))
    }
}

/// The sole boundary between the synchronization core and the browser.
///
/// Supplied by the session-lifecycle layer; swapped for [`crate::stub::StubSession`]
/// in unit tests. Beyond the page-level capabilities, the port carries
/// exactly the element operations the core needs, nothing page-object
/// specific.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    async fn navigate(&self, url: &str) -> Result<(), SessionError>;

    async fn current_url(&self) -> Result<String, SessionError>;

    async fn title(&self) -> Result<String, SessionError>;

    /// All elements currently matching the locator, in document order.
    /// An empty vec is not an error.
    async fn find_elements(&self, locator: &Locator) -> Result<Vec<ElementHandle>, SessionError>;

    /// Evaluate a script in the page context and return its JSON result.
    async fn execute_script(&self, script: &str) -> Result<Value, SessionError>;

    /// Native pointer click on a resolved element.
    async fn click(&self, element: &ElementHandle) -> Result<(), SessionError>;

    /// Script-dispatched click event on the same resolved element. Bypasses
    /// pointer-event interception by overlays.
    async fn script_click(&self, element: &ElementHandle) -> Result<(), SessionError>;

    async fn clear(&self, element: &ElementHandle) -> Result<(), SessionError>;

    async fn type_text(&self, element: &ElementHandle, text: &str) -> Result<(), SessionError>;

    async fn text(&self, element: &ElementHandle) -> Result<String, SessionError>;

    async fn is_displayed(&self, element: &ElementHandle) -> Result<bool, SessionError>;

    /// Displayed *and* accepting pointer events. Stricter than visibility:
    /// an element mid-animation or under an overlay is displayed but not
    /// interactable.
    async fn is_interactable(&self, element: &ElementHandle) -> Result<bool, SessionError>;
}
