//! Detecting arrival of streamed content, and judging its quality.
//!
//! The two concerns are deliberately orthogonal: [`ResponseWatcher`] only
//! answers "did something new arrive before the deadline", while
//! [`ReplyClassifier`] is a pure function over the retrieved text. Either
//! can be tested without the other.

pub mod classify;
pub mod watcher;

pub use classify::{ReplyClassifier, ReplyQuality};
pub use watcher::ResponseWatcher;
