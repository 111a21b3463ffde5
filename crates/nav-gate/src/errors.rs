use thiserror::Error;

/// Verification failures that are the caller's fault, not the page's.
/// An unconfirmed navigation is a result, never an error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerifyError {
    /// The spec carries no usable evidence for its strongest tiers.
    #[error("invalid verification spec: {0}")]
    InvalidSpec(String),
}
