//! Deterministic rule-based narrative synthesis.
//!
//! A pure function of the aggregated findings: always succeeds, degrades
//! section by section as sources drop out, and produces byte-identical
//! text for identical findings and timestamp.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use osprey_core::{Findings, RiskLevel, SOURCE_NETWORK, SOURCE_THREAT, SOURCE_WHOIS};
use serde_json::Value;
use std::fmt::Write as _;

/// Maximum recommendations emitted in a report
const MAX_RECOMMENDATIONS: usize = 5;

/// Risk evaluation derived from the findings
#[derive(Debug, Clone)]
pub struct Assessment {
    /// Final escalated risk level
    pub risk: RiskLevel,
    /// Human-readable factors that drove the level
    pub factors: Vec<String>,
    /// Accumulated recommendations, unlimited here, capped at render time
    pub recommendations: Vec<String>,
}

/// Evaluate risk from whatever data is present.
///
/// Escalation only ever raises the level: threat-scan detections set the
/// base tier, a malicious network reputation lifts LOW to MEDIUM, and a
/// domain registered less than a year ago adds a recommendation without
/// touching the level.
#[must_use]
pub fn assess(findings: &Findings, now: DateTime<Utc>) -> Assessment {
    let mut risk = RiskLevel::Low;
    let mut factors = Vec::new();
    let mut recommendations = Vec::new();

    let positives = findings.threat_positives();
    if positives > 0 {
        risk = if positives > 5 {
            RiskLevel::Critical
        } else if positives > 2 {
            RiskLevel::High
        } else {
            RiskLevel::Medium
        };
        factors.push(format!("Malware detected ({positives} engines)"));
        recommendations.push("Block or restrict access immediately".to_string());
        recommendations.push("Implement enhanced monitoring".to_string());
    }

    if let Some(reputation) = findings.network.as_ref().map(|n| &n.reputation) {
        if reputation.malicious {
            risk = risk.escalate(RiskLevel::Medium);
            factors.push(format!(
                "Domain reputation issues ({} detections)",
                reputation.detections
            ));
            recommendations
                .push("Investigate domain reputation and potential threats".to_string());
        }
    }

    if let Some(age) = domain_age_years(findings, now) {
        if age < 1 {
            recommendations.push("Monitor recently registered domain closely".to_string());
        }
    }

    Assessment {
        risk,
        factors,
        recommendations,
    }
}

/// Render the full narrative for the findings.
///
/// Every section that depends on a source is omitted when that source's
/// data is absent; with no data at all the report still renders with a
/// no-data findings section and standard-practice recommendations.
#[must_use]
pub fn render(target: &str, findings: &Findings, timestamp: DateTime<Utc>) -> String {
    let assessment = assess(findings, timestamp);
    let mut out = String::new();

    let _ = write!(
        out,
        "OSPREY RECONNAISSANCE REPORT\n\
         ============================\n\
         Target: {target}\n\
         Generated: {}\n\
         Classification: WEB RECONNAISSANCE\n\n\
         EXECUTIVE SUMMARY\n\
         =================\n\
         Automated reconnaissance completed for {target}. This report provides\n\
         security intelligence based on available data sources for defensive\n\
         analysis.\n\n",
        timestamp.to_rfc3339()
    );

    render_collection_status(&mut out, findings);
    render_threat_assessment(&mut out, &assessment);
    render_key_findings(&mut out, target, findings, timestamp);
    render_recommendations(&mut out, &assessment);
    render_immediate_actions(&mut out, assessment.risk);

    out.push_str("END OF REPORT\n");
    out
}

fn render_collection_status(out: &mut String, findings: &Findings) {
    if findings.errors.is_empty() {
        return;
    }

    out.push_str("DATA COLLECTION STATUS\n======================\n");
    for (source, error) in &findings.errors {
        let _ = writeln!(out, "[FAILED] {}: {error}", source.to_uppercase());
    }
    if findings.whois.is_some() {
        let _ = writeln!(
            out,
            "[OK] {}: Data retrieved successfully",
            SOURCE_WHOIS.to_uppercase()
        );
    }
    if findings.threat.is_some() {
        let _ = writeln!(out, "[OK] {}: Scan completed", SOURCE_THREAT.to_uppercase());
    }
    if findings.network.is_some() {
        let _ = writeln!(
            out,
            "[OK] {}: Analysis completed",
            SOURCE_NETWORK.to_uppercase()
        );
    }
    out.push('\n');
}

fn render_threat_assessment(out: &mut String, assessment: &Assessment) {
    let factors = if assessment.factors.is_empty() {
        "No significant risks identified".to_string()
    } else {
        assessment.factors.join(", ")
    };
    let _ = write!(
        out,
        "THREAT ASSESSMENT\n\
         =================\n\
         Overall Risk Level: {}\n\
         Risk Factors: {factors}\n\n",
        assessment.risk
    );
}

fn render_key_findings(
    out: &mut String,
    target: &str,
    findings: &Findings,
    now: DateTime<Utc>,
) {
    out.push_str("KEY FINDINGS\n============\n");

    if !findings.has_data() {
        out.push_str("No data sources responded; no significant data available.\n\n");
        return;
    }

    if let Some(record) = findings.whois_record() {
        let text = |key: &str| {
            record
                .get(key)
                .and_then(Value::as_str)
                .map(String::from)
        };
        let age = domain_age_years(findings, now)
            .map_or_else(|| "Unknown".to_string(), |years| format!("{years} years"));
        let organization = record
            .pointer("/registrant/organization")
            .and_then(Value::as_str)
            .unwrap_or("Not disclosed");
        let _ = write!(
            out,
            "* Domain Registration: {}\n\
             \x20 - Registrar: {}\n\
             \x20 - Age: {age}\n\
             \x20 - Organization: {organization}\n",
            text("domainName").unwrap_or_else(|| target.to_string()),
            text("registrarName").unwrap_or_else(|| "Unknown".to_string()),
        );
    }

    if let Some(threat) = &findings.threat {
        let positives = findings.threat_positives();
        let status = if positives > 0 {
            "THREATS DETECTED"
        } else {
            "CLEAN"
        };
        let _ = write!(
            out,
            "* Threat Intelligence: {positives}/{} security engines flagged this target\n\
             \x20 - Status: {status}\n\
             \x20 - Last Scan: {}\n",
            findings.threat_total(),
            threat
                .get("scan_date")
                .and_then(Value::as_str)
                .unwrap_or("Unknown"),
        );
        if let Some(urls) = threat.get("detected_urls").and_then(Value::as_array) {
            if !urls.is_empty() {
                let _ = writeln!(out, "  - Malicious URLs: {} detected", urls.len());
            }
        }
    }

    if let Some(network) = &findings.network {
        let sources: Vec<&str> = [
            ("ipinfo", network.sources.ipinfo),
            ("urlvoid", network.sources.urlvoid),
        ]
        .iter()
        .filter(|(_, present)| *present)
        .map(|(name, _)| *name)
        .collect();
        let sources = if sources.is_empty() {
            "None".to_string()
        } else {
            sources.join(", ")
        };
        let reputation = if network.reputation.malicious {
            format!("{} detections", network.reputation.detections)
        } else {
            "Clean".to_string()
        };
        let _ = write!(
            out,
            "* Network Intelligence: {}\n\
             \x20 - Organization: {}\n\
             \x20 - Location: {}, {}\n\
             \x20 - Data Sources: {sources}\n\
             \x20 - Reputation: {reputation}\n",
            network.ip.as_deref().unwrap_or("IP not resolved"),
            network.org.as_deref().unwrap_or("Unknown"),
            network.city.as_deref().unwrap_or("Unknown"),
            network.country.as_deref().unwrap_or("Unknown"),
        );
    }

    out.push('\n');
}

fn render_recommendations(out: &mut String, assessment: &Assessment) {
    out.push_str("SECURITY RECOMMENDATIONS\n========================\n");

    let defaults = [
        "Continue standard security monitoring",
        "Regular vulnerability assessments",
        "Maintain current security controls",
    ];
    let recommendations: Vec<&str> = if assessment.recommendations.is_empty() {
        defaults.to_vec()
    } else {
        assessment
            .recommendations
            .iter()
            .map(String::as_str)
            .take(MAX_RECOMMENDATIONS)
            .collect()
    };

    for (index, recommendation) in recommendations.iter().enumerate() {
        let _ = writeln!(out, "{}. {recommendation}", index + 1);
    }
    out.push('\n');
}

fn render_immediate_actions(out: &mut String, risk: RiskLevel) {
    out.push_str("IMMEDIATE ACTIONS REQUIRED\n==========================\n");
    let block = match risk {
        RiskLevel::Critical => {
            "CRITICAL RISK - IMMEDIATE ACTION:\n\
             - Implement emergency security measures\n\
             - Consider service isolation or shutdown\n\
             - Activate incident response procedures\n\
             - Executive notification required\n\
             - Enhanced monitoring and alerting\n"
        }
        RiskLevel::High => {
            "HIGH RISK - URGENT ATTENTION:\n\
             - Prioritize security updates\n\
             - Implement additional controls\n\
             - Increase monitoring frequency\n\
             - Review access controls\n"
        }
        RiskLevel::Medium => {
            "MEDIUM RISK - ENHANCED SECURITY:\n\
             - Schedule security improvements\n\
             - Regular vulnerability assessments\n\
             - Update security policies\n"
        }
        RiskLevel::Low => {
            "LOW RISK - MAINTAIN POSTURE:\n\
             - Continue standard monitoring\n\
             - Regular security reviews\n\
             - Periodic reassessment\n"
        }
    };
    out.push_str(block);
    out.push('\n');
}

/// Whole years since the registration date, if the whois record carries
/// a parsable one.
fn domain_age_years(findings: &Findings, now: DateTime<Utc>) -> Option<i64> {
    let created = findings
        .whois_record()?
        .get("createdDate")
        .and_then(Value::as_str)?;
    let created = parse_created(created)?;
    Some((now - created).num_days() / 365)
}

fn parse_created(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    // Some registries report a bare date.
    value
        .get(..10)
        .and_then(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok())
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use osprey_core::{NetworkRecord, Reputation, ReputationStatus};
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn clean_findings() -> Findings {
        Findings {
            whois: Some(json!({
                "WhoisRecord": {
                    "domainName": "example.com",
                    "registrarName": "Example Registrar",
                    "createdDate": "1995-08-14T04:00:00Z",
                    "registrant": { "organization": "Example Org" }
                }
            })),
            threat: Some(json!({ "positives": 0, "total": 70, "scan_date": "2025-05-30" })),
            network: Some(NetworkRecord {
                ip: Some("93.184.216.34".into()),
                org: Some("Edgecast".into()),
                city: Some("Norwell".into()),
                country: Some("US".into()),
                sources: osprey_core::SourcePresence {
                    ipinfo: true,
                    urlvoid: true,
                },
                reputation: Reputation {
                    status: ReputationStatus::Scanned,
                    ..Reputation::default()
                },
                ..NetworkRecord::default()
            }),
            ..Findings::default()
        }
    }

    #[test]
    fn test_clean_target_is_low_risk() {
        let assessment = assess(&clean_findings(), now());
        assert_eq!(assessment.risk, RiskLevel::Low);
        assert!(assessment.factors.is_empty());

        let report = render("example.com", &clean_findings(), now());
        assert!(report.contains("Overall Risk Level: LOW"));
        assert!(report.contains("No significant risks identified"));
        assert!(report.contains("LOW RISK - MAINTAIN POSTURE:"));
        // No failures: the collection-status section is omitted.
        assert!(!report.contains("DATA COLLECTION STATUS"));
    }

    #[test]
    fn test_escalation_tiers() {
        for (positives, expected) in [
            (1, RiskLevel::Medium),
            (3, RiskLevel::High),
            (6, RiskLevel::Critical),
            (7, RiskLevel::Critical),
        ] {
            let findings = Findings {
                threat: Some(json!({ "positives": positives, "total": 70 })),
                ..Findings::default()
            };
            assert_eq!(assess(&findings, now()).risk, expected, "{positives}");
        }
    }

    #[test]
    fn test_heavily_flagged_target_renders_critical_block() {
        let findings = Findings {
            threat: Some(json!({ "positives": 7, "total": 70 })),
            ..Findings::default()
        };
        let report = render("malware-test.com", &findings, now());
        assert!(report.contains("Overall Risk Level: CRITICAL"));
        assert!(report.contains("Block or restrict access immediately"));
        assert!(report.contains("CRITICAL RISK - IMMEDIATE ACTION:"));
        assert!(report.contains("Malware detected (7 engines)"));
        assert!(report.contains("7/70 security engines flagged this target"));
        assert!(report.contains("THREATS DETECTED"));
    }

    #[test]
    fn test_malicious_reputation_escalates_low_to_medium() {
        let mut findings = clean_findings();
        if let Some(network) = &mut findings.network {
            network.reputation.malicious = true;
            network.reputation.detections = 4;
        }
        let assessment = assess(&findings, now());
        assert_eq!(assessment.risk, RiskLevel::Medium);
        assert!(assessment
            .factors
            .iter()
            .any(|f| f.contains("reputation issues (4 detections)")));
    }

    #[test]
    fn test_reputation_never_downgrades() {
        let mut findings = clean_findings();
        findings.threat = Some(json!({ "positives": 7, "total": 70 }));
        if let Some(network) = &mut findings.network {
            network.reputation.malicious = true;
        }
        assert_eq!(assess(&findings, now()).risk, RiskLevel::Critical);
    }

    #[test]
    fn test_young_domain_adds_recommendation() {
        let mut findings = clean_findings();
        findings.whois = Some(json!({
            "WhoisRecord": { "createdDate": "2025-03-01T00:00:00Z" }
        }));
        let assessment = assess(&findings, now());
        assert!(assessment
            .recommendations
            .contains(&"Monitor recently registered domain closely".to_string()));
        // Risk level itself is untouched.
        assert_eq!(assessment.risk, RiskLevel::Low);
    }

    #[test]
    fn test_degrades_to_no_data_text_when_everything_fails() {
        let mut findings = Findings::default();
        findings.record_failure(SOURCE_WHOIS, "WHOIS lookup failed");
        findings.record_failure(SOURCE_THREAT, "VirusTotal request timed out after 15s");
        findings.record_failure(SOURCE_NETWORK, "Network intelligence lookup failed");

        let report = render("example.com", &findings, now());
        assert!(report.contains("no significant data available"));
        assert!(report.contains("[FAILED] WHOIS: WHOIS lookup failed"));
        assert!(report.contains("Overall Risk Level: LOW"));
        // Sections for absent sources are omitted, not blanked.
        assert!(!report.contains("Domain Registration"));
        assert!(!report.contains("Threat Intelligence:"));
        assert!(!report.contains("Network Intelligence:"));
        // Default recommendations fill in.
        assert!(report.contains("1. Continue standard security monitoring"));
    }

    #[test]
    fn test_sections_reference_only_surviving_sources() {
        let mut findings = clean_findings();
        findings.whois = None;
        findings.record_failure(SOURCE_WHOIS, "WHOIS lookup only available for domains");

        let report = render("8.8.8.8", &findings, now());
        assert!(!report.contains("Domain Registration"));
        assert!(report.contains("Threat Intelligence:"));
        assert!(report.contains("Network Intelligence:"));
        assert!(report.contains("[FAILED] WHOIS: WHOIS lookup only available for domains"));
        assert!(report.contains("[OK] VIRUSTOTAL: Scan completed"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let findings = clean_findings();
        let first = render("example.com", &findings, now());
        let second = render("example.com", &findings, now());
        assert_eq!(first, second);
    }

    #[test]
    fn test_recommendations_are_capped() {
        let mut findings = Findings {
            threat: Some(json!({ "positives": 7, "total": 70 })),
            ..Findings::default()
        };
        findings.whois = Some(json!({
            "WhoisRecord": { "createdDate": "2025-05-01T00:00:00Z" }
        }));
        if let Some(network) = &mut findings.network {
            network.reputation.malicious = true;
        }
        let report = render("example.com", &findings, now());
        assert!(!report.contains("6. "));
    }

    #[test]
    fn test_domain_age_parsing() {
        let findings = Findings {
            whois: Some(json!({
                "WhoisRecord": { "createdDate": "1995-08-14T04:00:00Z" }
            })),
            ..Findings::default()
        };
        assert_eq!(domain_age_years(&findings, now()), Some(29));

        let bare_date = Findings {
            whois: Some(json!({ "WhoisRecord": { "createdDate": "2024-06-10" } })),
            ..Findings::default()
        };
        assert_eq!(domain_age_years(&bare_date, now()), Some(0));

        let garbage = Findings {
            whois: Some(json!({ "WhoisRecord": { "createdDate": "not a date" } })),
            ..Findings::default()
        };
        assert_eq!(domain_age_years(&garbage, now()), None);
    }
}
