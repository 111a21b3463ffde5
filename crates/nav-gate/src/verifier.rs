use std::time::Duration;

use condition_wait::{ConditionWaiter, UrlContains, WaitError};
use pagesync_core_types::{BrowserSession, SyncConfig};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::conditions::{AnyAlternativePresent, KeywordVisible, PrimaryMatches};
use crate::errors::VerifyError;
use crate::types::{NavigationResult, VerificationSpec, VerificationTier};

/// Confirms arrival at a destination through a tiered evidence cascade.
///
/// Applicable tiers split the overall budget evenly; tiers the spec carries
/// no evidence for are skipped, so their share flows to the rest. The first
/// tier that holds short-circuits the cascade. Exhausting every tier is a
/// negative result, not an error, so the caller can retry the navigation.
pub struct NavigationVerifier {
    waiter: ConditionWaiter,
}

impl NavigationVerifier {
    pub fn new(config: &SyncConfig) -> Self {
        Self {
            waiter: ConditionWaiter::from_config(config),
        }
    }

    pub async fn verify(
        &self,
        session: &dyn BrowserSession,
        spec: &VerificationSpec,
        timeout: Duration,
    ) -> Result<NavigationResult, VerifyError> {
        spec.validate()?;
        let started = Instant::now();
        let tiers = Self::applicable_tiers(spec);
        let share = timeout / tiers.len() as u32;
        debug!(tiers = tiers.len(), share_ms = share.as_millis() as u64, "verifying navigation");

        for tier in tiers {
            match self.check_tier(session, spec, tier, share).await {
                Ok(alternative_index) => {
                    let latency_ms = started.elapsed().as_millis() as u64;
                    info!(?tier, latency_ms, "navigation confirmed");
                    return Ok(match alternative_index {
                        Some(index) => NavigationResult::via_alternative(index, latency_ms),
                        None => NavigationResult::confirmed(tier, latency_ms),
                    });
                }
                Err(err) => {
                    debug!(?tier, "tier not satisfied: {}", err);
                }
            }
        }

        let latency_ms = started.elapsed().as_millis() as u64;
        warn!(latency_ms, "navigation unconfirmed; every tier exhausted");
        Ok(NavigationResult::unconfirmed(latency_ms))
    }

    /// Runs one tier within its budget share. A confirming alternative tier
    /// reports which selector matched.
    async fn check_tier(
        &self,
        session: &dyn BrowserSession,
        spec: &VerificationSpec,
        tier: VerificationTier,
        budget: Duration,
    ) -> Result<Option<usize>, WaitError> {
        match tier {
            VerificationTier::Url => {
                let segment = spec
                    .url_path_segment
                    .clone()
                    .ok_or_else(|| WaitError::Fatal("tier without evidence".into()))?;
                self.waiter
                    .wait_for(session, &UrlContains { needle: segment }, budget)
                    .await
                    .map(|_| None)
            }
            VerificationTier::PrimaryElement => {
                let primary = spec
                    .primary
                    .clone()
                    .ok_or_else(|| WaitError::Fatal("tier without evidence".into()))?;
                let probe = PrimaryMatches {
                    locator: primary.locator,
                    expected_text: primary.expected_text,
                };
                self.waiter
                    .wait_for(session, &probe, budget)
                    .await
                    .map(|_| None)
            }
            VerificationTier::AlternativeElement => {
                let probe = AnyAlternativePresent {
                    locators: spec.alternatives.clone(),
                };
                self.waiter
                    .wait_for(session, &probe, budget)
                    .await
                    .map(Some)
            }
            VerificationTier::TextHeuristic => {
                let probe = KeywordVisible {
                    keywords: spec.keywords.clone(),
                    max_text_nodes: spec.max_text_nodes,
                };
                self.waiter
                    .wait_for(session, &probe, budget)
                    .await
                    .map(|_| None)
            }
            VerificationTier::None => Err(WaitError::Fatal("tier without evidence".into())),
        }
    }

    fn applicable_tiers(spec: &VerificationSpec) -> Vec<VerificationTier> {
        let mut tiers = Vec::with_capacity(4);
        if spec.url_path_segment.is_some() {
            tiers.push(VerificationTier::Url);
        }
        if spec.primary.is_some() {
            tiers.push(VerificationTier::PrimaryElement);
        }
        if !spec.alternatives.is_empty() {
            tiers.push(VerificationTier::AlternativeElement);
        }
        if !spec.keywords.is_empty() {
            tiers.push(VerificationTier::TextHeuristic);
        }
        tiers
    }
}
