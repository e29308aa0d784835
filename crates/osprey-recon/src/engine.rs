//! The reconnaissance engine: three-source fan-out, independent
//! settlement, and narrative selection.

use crate::narrator::{is_quota_error, Narrator};
use crate::network::{NetworkIntel, NetworkIntelSource};
use crate::quota::QuotaBreaker;
use crate::report;
use chrono::Utc;
use osprey_core::{
    Findings, NarrativeKind, ReconReport, Result, SourceOutcome, Target, SOURCE_NETWORK,
    SOURCE_THREAT, SOURCE_WHOIS,
};
use osprey_providers::{
    Credentials, IntelSource, IpInfoClient, UrlVoidClient, VirusTotalClient, WhoisXmlClient,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Orchestrates one reconnaissance pass per request.
///
/// All three top-level sources are dispatched concurrently and settle
/// independently: the engine itself never fails once the target is
/// validated, and total latency tracks the slowest source rather than
/// the sum. The only cross-request state is the quota breaker.
pub struct ReconEngine {
    registration: Arc<dyn IntelSource>,
    threat: Arc<dyn IntelSource>,
    network: Arc<dyn NetworkIntelSource>,
    narrator: Option<Narrator>,
    breaker: QuotaBreaker,
}

impl ReconEngine {
    /// Assemble the engine from injected parts (used by tests and by
    /// [`Self::from_credentials`])
    #[must_use]
    pub fn new(
        registration: Arc<dyn IntelSource>,
        threat: Arc<dyn IntelSource>,
        network: Arc<dyn NetworkIntelSource>,
        narrator: Option<Narrator>,
        breaker: QuotaBreaker,
    ) -> Self {
        Self {
            registration,
            threat,
            network,
            narrator,
            breaker,
        }
    }

    /// Wire the production adapters from the configured credentials.
    #[must_use]
    pub fn from_credentials(credentials: &Credentials) -> Self {
        let geolocation = Arc::new(IpInfoClient::new(credentials.ipinfo.clone()));
        let reputation = Arc::new(UrlVoidClient::new(credentials.urlvoid.clone()));

        Self::new(
            Arc::new(WhoisXmlClient::new(credentials.whoisxml.clone())),
            Arc::new(VirusTotalClient::new(credentials.virustotal.clone())),
            Arc::new(NetworkIntel::new(geolocation, reputation)),
            credentials.openai.clone().map(Narrator::new),
            QuotaBreaker::new(),
        )
    }

    /// The shared quota breaker (exposed for tests and diagnostics)
    #[must_use]
    pub const fn breaker(&self) -> &QuotaBreaker {
        &self.breaker
    }

    /// Fan out to all three sources and settle them independently.
    ///
    /// Always returns populated findings - possibly empty of data and
    /// full of errors, but never an error itself.
    pub async fn gather(&self, target: &Target) -> Findings {
        info!(target = %target, kind = ?target.kind(), "starting reconnaissance");

        let (whois, threat, network) = futures_util::future::join3(
            self.registration.fetch(target),
            self.threat.fetch(target),
            self.network.gather(target),
        )
        .await;

        let mut findings = Findings::default();

        match whois {
            SourceOutcome::Success(value) => {
                debug!("registration data retrieved");
                findings.whois = Some(value);
            }
            SourceOutcome::Failure(message) => {
                warn!(error = %message, "registration lookup failed");
                findings.record_failure(SOURCE_WHOIS, message);
            }
            SourceOutcome::NotApplicable => {}
        }

        match threat {
            SourceOutcome::Success(value) => {
                debug!("threat scan retrieved");
                findings.threat = Some(value);
            }
            SourceOutcome::Failure(message) => {
                warn!(error = %message, "threat scan failed");
                findings.record_failure(SOURCE_THREAT, message);
            }
            SourceOutcome::NotApplicable => {}
        }

        match network {
            SourceOutcome::Success(record) => {
                debug!("network intelligence aggregated");
                findings.network = Some(record);
            }
            SourceOutcome::Failure(message) => {
                warn!(error = %message, "network intelligence failed");
                findings.record_failure(SOURCE_NETWORK, message);
            }
            SourceOutcome::NotApplicable => {}
        }

        findings
    }

    /// Full pipeline: validate the target, gather findings, synthesize
    /// both narratives, and select one.
    ///
    /// Only an invalid target (or an internal fault) errors; provider
    /// failures are carried inside the report's error map.
    pub async fn analyze(&self, raw_target: &str) -> Result<ReconReport> {
        let target = Target::parse(raw_target)?;
        let findings = self.gather(&target).await;
        let timestamp = Utc::now();

        // The deterministic narrative renders first, unconditionally.
        let fallback_report = report::render(target.as_str(), &findings, timestamp);
        let (ai_report, report_type) = self.generate_narrative(&target, &findings).await;

        Ok(ReconReport {
            target,
            whois: findings.whois,
            threat: findings.threat,
            network: findings.network,
            ai_report,
            fallback_report,
            report_type,
            errors: findings.errors,
            timestamp,
        })
    }

    async fn generate_narrative(
        &self,
        target: &Target,
        findings: &Findings,
    ) -> (Option<String>, NarrativeKind) {
        let Some(narrator) = &self.narrator else {
            debug!("generative narrative skipped: no credentials");
            return (None, NarrativeKind::Fallback);
        };

        if self.breaker.is_blocked() {
            info!("generative narrative skipped: quota cooldown active");
            return (None, NarrativeKind::Fallback);
        }

        match narrator.generate(target.as_str(), findings).await {
            Ok(text) => {
                info!("generative narrative selected");
                (Some(text), NarrativeKind::Ai)
            }
            Err(err) => {
                warn!(error = %err, "generative narrative failed");
                if is_quota_error(&err.to_string()) {
                    info!("model quota exhausted - cooling down");
                    self.breaker.trip();
                }
                (None, NarrativeKind::Fallback)
            }
        }
    }
}
