//! Navigation verification against markup that will not hold still.
//!
//! The target application renames CSS classes across deployments, so no
//! single selector is trustworthy evidence of arrival. The verifier checks
//! a cascade of tiers in descending reliability: the URL path, a primary
//! indicator element, alternative selectors for the same landmark, and
//! finally a keyword scan over visible text. The first tier that holds
//! confirms the navigation and is reported in the result.

pub mod conditions;
pub mod errors;
pub mod types;
pub mod verifier;

pub use errors::VerifyError;
pub use types::{NavigationResult, VerificationSpec, VerificationTier};
pub use verifier::NavigationVerifier;
