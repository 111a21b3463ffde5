//! Poll-until-satisfied primitive for the PageSync core.
//!
//! Every bounded wait in the core goes through [`ConditionWaiter`]: evaluate
//! a [`Condition`] against the session, sleep a poll interval, repeat until
//! the condition yields a value or the budget runs out. Timeouts are typed
//! ([`WaitError::TimedOut`]) and carry the elapsed duration; transient
//! evaluation errors are absorbed as "not yet satisfied".

pub mod conditions;
pub mod errors;
pub mod waiter;

pub use conditions::{Condition, ConditionEval, ElementsPresent, ScriptReturnsTrue, UrlContains};
pub use errors::WaitError;
pub use waiter::ConditionWaiter;
