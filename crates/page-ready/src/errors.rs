use std::time::Duration;

use thiserror::Error;

/// The only fatal readiness outcome: the host document never reached the
/// "complete" load state. Every other signal degrades to satisfied.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReadyError {
    #[error("document did not reach complete state within {waited:?}")]
    NotReady { waited: Duration },
}
