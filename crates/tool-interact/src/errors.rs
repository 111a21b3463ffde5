use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why an interaction did not land. Carried inside [`crate::ActionOutcome`];
/// the caller decides whether it is fatal to the scenario.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionError {
    /// The page never reached the mandatory ready state before the action.
    #[error("page readiness precheck failed")]
    PageNotReady,

    /// The target never became present and interactable within the budget.
    #[error("target never became interactable")]
    TargetUnavailable,

    /// Every strategy in the fallback chain failed.
    #[error("all interaction strategies exhausted")]
    InteractionFailed,
}
