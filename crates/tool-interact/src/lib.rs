//! Resilient interaction execution.
//!
//! Overlay and animation timing on the target application frequently makes
//! elements briefly non-interactable despite being visible, and native
//! pointer clicks intermittently bounce off them. The executor models the
//! recovery as an ordered strategy list (native pointer click first, then
//! a script-dispatched click on the same resolved element) and reports
//! which strategy landed in a structured [`ActionOutcome`].

pub mod errors;
pub mod executor;
pub mod model;

pub use errors::InteractionError;
pub use executor::InteractionExecutor;
pub use model::{ActionOutcome, ClickTarget, Strategy};
