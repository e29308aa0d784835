use async_trait::async_trait;
use osprey_core::{SourceOutcome, Target};
use serde_json::Value;

/// A single external intelligence provider.
///
/// Implementations issue at most one outbound request per call, bounded
/// by a provider-specific timeout, and settle into a three-way
/// [`SourceOutcome`] at their own boundary - an error in one source must
/// never abort a sibling. The orchestrator only depends on this trait, so
/// tests can stand in for any provider without touching the others.
#[async_trait]
pub trait IntelSource: Send + Sync {
    /// Stable identifier used in logs
    fn name(&self) -> &'static str;

    /// Gather raw intelligence for the target. Never retries.
    async fn fetch(&self, target: &Target) -> SourceOutcome<Value>;
}
