use super::{network::NetworkRecord, target::Target};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Overall risk classification of a target
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    /// No significant indicators
    Low,
    /// Some indicators warrant attention
    Medium,
    /// Strong indicators, urgent attention
    High,
    /// Confirmed hostile indicators
    Critical,
}

impl RiskLevel {
    /// Raise the level to at least `floor`; never downgrades
    #[must_use]
    pub fn escalate(self, floor: Self) -> Self {
        self.max(floor)
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        };
        f.write_str(s)
    }
}

/// Which narrative strategy produced the selected report text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NarrativeKind {
    /// Generative-model narrative
    Ai,
    /// Deterministic rule-based narrative
    Fallback,
}

/// Final reconnaissance response for one target.
///
/// The deterministic narrative is always present; the generative one is
/// optional and, when present and selected, takes precedence. Serializes
/// to the dashboard wire contract (`aiReport`, `fallbackReport`,
/// `reportType`, source keys `whois`/`virustotal`/`shodan`).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconReport {
    /// The analyzed target (not part of the wire payload)
    #[serde(skip_serializing)]
    pub target: Target,

    /// Raw registration-lookup payload
    pub whois: Option<Value>,

    /// Raw threat-scan payload
    #[serde(rename = "virustotal")]
    pub threat: Option<Value>,

    /// Normalized network intelligence
    #[serde(rename = "shodan")]
    pub network: Option<NetworkRecord>,

    /// Generative narrative, when one was produced
    pub ai_report: Option<String>,

    /// Deterministic narrative, always present
    pub fallback_report: String,

    /// Which narrative is selected
    pub report_type: NarrativeKind,

    /// Failure message per failed source
    pub errors: BTreeMap<String, String>,

    /// When the report was generated
    pub timestamp: DateTime<Utc>,
}

impl ReconReport {
    /// The selected narrative text
    #[must_use]
    pub fn narrative(&self) -> &str {
        match self.report_type {
            NarrativeKind::Ai => self
                .ai_report
                .as_deref()
                .unwrap_or(&self.fallback_report),
            NarrativeKind::Fallback => &self.fallback_report,
        }
    }
}
