use super::network::NetworkRecord;
use serde_json::Value;
use std::collections::BTreeMap;

/// Wire name of the registration-lookup source
pub const SOURCE_WHOIS: &str = "whois";
/// Wire name of the threat-scan source
pub const SOURCE_THREAT: &str = "virustotal";
/// Wire name of the network-intelligence source
pub const SOURCE_NETWORK: &str = "shodan";

/// Aggregated per-source results of one reconnaissance pass.
///
/// Each top-level source is either present (it succeeded) or absent with
/// an entry in `errors` (it failed) or absent without one (not
/// applicable). Built once per request and never persisted. Raw provider
/// payloads stay opaque [`Value`]s; only network intelligence is
/// normalized.
#[derive(Debug, Clone, Default)]
pub struct Findings {
    /// Raw registration-lookup payload
    pub whois: Option<Value>,

    /// Raw threat-scan payload
    pub threat: Option<Value>,

    /// Normalized network intelligence
    pub network: Option<NetworkRecord>,

    /// Failure message per failed source, keyed by wire name
    pub errors: BTreeMap<String, String>,
}

impl Findings {
    /// Returns true if at least one source produced data
    #[must_use]
    pub const fn has_data(&self) -> bool {
        self.whois.is_some() || self.threat.is_some() || self.network.is_some()
    }

    /// Record a source failure
    pub fn record_failure(&mut self, source: &str, message: impl Into<String>) {
        self.errors.insert(source.to_string(), message.into());
    }

    /// Number of engines that flagged the target in the threat scan
    #[must_use]
    pub fn threat_positives(&self) -> u64 {
        self.threat
            .as_ref()
            .and_then(|v| v.get("positives"))
            .and_then(Value::as_u64)
            .unwrap_or(0)
    }

    /// Number of engines consulted in the threat scan
    #[must_use]
    pub fn threat_total(&self) -> u64 {
        self.threat
            .as_ref()
            .and_then(|v| v.get("total"))
            .and_then(Value::as_u64)
            .unwrap_or(0)
    }

    /// The registration record object inside the raw whois payload
    #[must_use]
    pub fn whois_record(&self) -> Option<&Value> {
        self.whois.as_ref().and_then(|v| v.get("WhoisRecord"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_findings() {
        let findings = Findings::default();
        assert!(!findings.has_data());
        assert_eq!(findings.threat_positives(), 0);
        assert!(findings.whois_record().is_none());
    }

    #[test]
    fn test_threat_counters() {
        let findings = Findings {
            threat: Some(json!({ "positives": 7, "total": 70 })),
            ..Default::default()
        };
        assert!(findings.has_data());
        assert_eq!(findings.threat_positives(), 7);
        assert_eq!(findings.threat_total(), 70);
    }

    #[test]
    fn test_record_failure() {
        let mut findings = Findings::default();
        findings.record_failure(SOURCE_WHOIS, "WHOIS lookup only available for domains");
        assert_eq!(
            findings.errors.get(SOURCE_WHOIS).map(String::as_str),
            Some("WHOIS lookup only available for domains")
        );
    }
}
