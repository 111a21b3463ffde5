//! Layered page readiness detection.
//!
//! A page counts as ready when the host document has finished loading and
//! the legacy activity signals that apply to it have drained: jQuery's
//! request counter, Angular's pending HTTP queue, and DOM mutation
//! quiescence observed through a one-time instrumentation probe. Absence of
//! a framework is not a failure; only the document-complete signal is
//! mandatory.

pub mod detector;
pub mod errors;
pub mod scripts;
pub mod signals;

pub use detector::{DeniedResponse, ReadinessDetector, ReadinessScope};
pub use errors::ReadyError;
pub use signals::ReadinessSignal;
