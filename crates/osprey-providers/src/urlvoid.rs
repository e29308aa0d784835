//! Domain reputation scans via the URLVoid API.

use crate::http::{build_client, transport_error};
use crate::source::IntelSource;
use async_trait::async_trait;
use osprey_core::{OspreyError, SourceOutcome, Target};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://api.urlvoid.com";

/// Per-request budget for reputation scans
const SCAN_TIMEOUT: Duration = Duration::from_secs(15);

/// Client for the URLVoid blacklist-reputation API.
///
/// Domain targets only; IPv4 targets and domains outside the scanner's
/// coverage (localhost, private ranges, internal/test suffixes) settle as
/// `NotApplicable` without a request. Provider responses that indicate an
/// unsupported domain are absorbed into `NotApplicable` as well - this
/// adapter reports a hard `Failure` only for missing credentials and
/// transport-level errors, which the aggregator renders as a reputation
/// status, never as a top-level source error.
#[derive(Debug, Clone)]
pub struct UrlVoidClient {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl UrlVoidClient {
    /// Create a client. The key is optional; scans without one fail
    /// per-request with a missing-credentials message.
    #[must_use]
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            http: build_client(SCAN_TIMEOUT),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Override the API endpoint (useful for testing)
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    async fn scan(&self, api_key: &str, domain: &str) -> SourceOutcome<Value> {
        debug!(domain, "fetching URLVoid reputation");

        let url = format!("{}/v1/pay-as-you-go/", self.base_url);
        let response = match self
            .http
            .get(&url)
            .query(&[("key", api_key), ("host", domain)])
            .header("Accept", "application/json")
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                return SourceOutcome::Failure(
                    transport_error("URLVoid", SCAN_TIMEOUT, &e).to_string(),
                )
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if status.as_u16() == 400 || is_unsupported_body(&body) {
                debug!(domain, %status, "URLVoid does not cover this domain");
                return SourceOutcome::NotApplicable;
            }
            return SourceOutcome::Failure(
                OspreyError::Api {
                    provider: "URLVoid",
                    message: status.to_string(),
                }
                .to_string(),
            );
        }

        let is_json = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("application/json"));
        if !is_json {
            // Unsupported-domain complaints arrive as plain text.
            debug!(domain, "URLVoid returned a non-JSON body");
            return SourceOutcome::NotApplicable;
        }

        let data: Value = match response.json().await {
            Ok(data) => data,
            Err(_) => return SourceOutcome::NotApplicable,
        };

        if data.get("error").is_some() {
            debug!(domain, "URLVoid reported an error payload");
            return SourceOutcome::NotApplicable;
        }

        SourceOutcome::Success(data)
    }
}

#[async_trait]
impl IntelSource for UrlVoidClient {
    fn name(&self) -> &'static str {
        "urlvoid"
    }

    async fn fetch(&self, target: &Target) -> SourceOutcome<Value> {
        if !target.is_domain() {
            return SourceOutcome::NotApplicable;
        }

        let domain = target.as_str();
        if !is_scannable_domain(domain) {
            debug!(domain, "domain not suitable for reputation scanning");
            return SourceOutcome::NotApplicable;
        }

        let Some(api_key) = self.api_key.clone() else {
            return SourceOutcome::Failure(
                OspreyError::MissingCredentials { provider: "URLVoid" }.to_string(),
            );
        };

        self.scan(&api_key, domain).await
    }
}

fn is_unsupported_body(body: &str) -> bool {
    ["Invalid request", "only public URLs", "not supported"]
        .iter()
        .any(|marker| body.contains(marker))
}

/// Whether a domain is worth sending to the reputation scanner.
///
/// Rejects localhost, private address prefixes, internal/test suffixes
/// and prefixes, single-label names, numeric or one-letter TLDs, and
/// very short names.
#[must_use]
pub fn is_scannable_domain(domain: &str) -> bool {
    let domain = domain.to_ascii_lowercase();

    if domain == "localhost" || domain.len() < 4 {
        return false;
    }

    const PREFIXES: [&str; 7] = ["127.", "192.168.", "10.", "test.", "staging.", "dev.", "demo."];
    if PREFIXES.iter().any(|p| domain.starts_with(p)) {
        return false;
    }

    // 172.16.0.0/12 private block.
    if let Some(rest) = domain.strip_prefix("172.") {
        if let Some((second, _)) = rest.split_once('.') {
            if second.parse::<u8>().is_ok_and(|n| (16..=31).contains(&n)) {
                return false;
            }
        }
    }

    const SUFFIXES: [&str; 6] = [
        ".local",
        ".internal",
        ".test",
        ".example",
        ".localhost",
        ".dev",
    ];
    if SUFFIXES.iter().any(|s| domain.ends_with(s)) {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }

    let tld = labels[labels.len() - 1];
    tld.len() >= 2 && tld.bytes().all(|b| b.is_ascii_alphabetic())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> UrlVoidClient {
        UrlVoidClient::new(Some("test-key".into())).with_base_url(server.uri())
    }

    #[test]
    fn test_suitability_filter() {
        for domain in ["example.com", "news.bbc.co.uk", "sub.domain.io"] {
            assert!(is_scannable_domain(domain), "{domain} should be scannable");
        }
        for domain in [
            "localhost",
            "internal.local",
            "corp.internal",
            "unit.test",
            "my.example",
            "app.localhost",
            "site.dev",
            "test.example.com",
            "staging.example.com",
            "dev.example.com",
            "demo.example.com",
            "192.168.1.50",
            "10.0.0.1",
            "172.16.4.2",
            "127.0.0.1",
            "single-label",
            "a.b",
            "domain.1x",
        ] {
            assert!(!is_scannable_domain(domain), "{domain} should be rejected");
        }
        // 172.x outside the private block is not caught by the prefix rule.
        assert!(!is_scannable_domain("172.15.0.1"), "numeric TLD still rejects");
    }

    #[tokio::test]
    async fn test_ipv4_target_is_not_applicable() {
        let client = UrlVoidClient::new(Some("test-key".into()));
        let target = Target::parse("8.8.8.8").unwrap();
        assert!(client.fetch(&target).await.is_not_applicable());
    }

    #[tokio::test]
    async fn test_unsuitable_domain_skips_the_request() {
        // No mock server: the filter must reject before any I/O.
        let client = UrlVoidClient::new(Some("test-key".into()))
            .with_base_url("http://127.0.0.1:9");
        let target = Target::parse("internal.local").unwrap();
        assert!(client.fetch(&target).await.is_not_applicable());
    }

    #[tokio::test]
    async fn test_scan_report_with_blacklists() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/pay-as-you-go/"))
            .and(query_param("host", "example.com"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "report": {
                        "blacklists": {
                            "detections": 2,
                            "engines": {
                                "0": { "name": "EngineA", "detected": true },
                                "1": { "name": "EngineB", "detected": false }
                            }
                        }
                    }
                }
            })))
            .mount(&server)
            .await;

        let target = Target::parse("example.com").unwrap();
        let value = client(&server).fetch(&target).await.success().unwrap();
        assert_eq!(value["data"]["report"]["blacklists"]["detections"], 2);
    }

    #[tokio::test]
    async fn test_public_urls_rejection_is_absorbed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/pay-as-you-go/"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_string("Invalid request: only public URLs are allowed"),
            )
            .mount(&server)
            .await;

        let target = Target::parse("public-site.com").unwrap();
        assert!(client(&server).fetch(&target).await.is_not_applicable());
    }

    #[tokio::test]
    async fn test_non_json_body_is_absorbed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/pay-as-you-go/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("Error: not supported"))
            .mount(&server)
            .await;

        let target = Target::parse("public-site.com").unwrap();
        assert!(client(&server).fetch(&target).await.is_not_applicable());
    }

    #[tokio::test]
    async fn test_server_error_is_a_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/pay-as-you-go/"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let target = Target::parse("public-site.com").unwrap();
        let outcome = client(&server).fetch(&target).await;
        assert!(outcome.failure().unwrap().starts_with("URLVoid API error:"));
    }

    #[tokio::test]
    async fn test_missing_key_is_a_failure() {
        let client = UrlVoidClient::new(None);
        let target = Target::parse("public-site.com").unwrap();
        let outcome = client.fetch(&target).await;
        assert_eq!(outcome.failure(), Some("URLVoid API key not configured"));
    }
}
