//! IP geolocation via the IPinfo API.

use crate::doh::DohResolver;
use crate::http::{build_client, transport_error};
use crate::source::IntelSource;
use async_trait::async_trait;
use osprey_core::{OspreyError, Result, SourceOutcome, Target};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://ipinfo.io";

/// Per-request budget for geolocation lookups
const LOCATE_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the IPinfo geolocation API.
///
/// Domain targets are first resolved to an IPv4 address through the
/// configured [`DohResolver`]; a resolution failure fails only this
/// adapter, never its siblings. IPv4 targets are queried directly. The
/// token is optional - IPinfo serves anonymous requests at a reduced
/// quota.
#[derive(Debug, Clone)]
pub struct IpInfoClient {
    http: reqwest::Client,
    token: Option<String>,
    base_url: String,
    resolver: DohResolver,
}

impl IpInfoClient {
    /// Create a client with the default DNS-over-HTTPS resolver
    #[must_use]
    pub fn new(token: Option<String>) -> Self {
        Self {
            http: build_client(LOCATE_TIMEOUT),
            token,
            base_url: DEFAULT_BASE_URL.to_string(),
            resolver: DohResolver::new(),
        }
    }

    /// Override the API endpoint (useful for testing)
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Replace the DNS resolver (useful for testing)
    #[must_use]
    pub fn with_resolver(mut self, resolver: DohResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Fetch geolocation data for an IP address.
    pub async fn locate(&self, ip: &str) -> Result<Value> {
        debug!(ip, "fetching geolocation data");

        let url = format!("{}/{}/json", self.base_url, ip);
        let mut request = self.http.get(&url).header("Accept", "application/json");
        if let Some(token) = &self.token {
            request = request.query(&[("token", token)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| transport_error("IPinfo", LOCATE_TIMEOUT, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(OspreyError::Api {
                provider: "IPinfo",
                message: status.to_string(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| transport_error("IPinfo", LOCATE_TIMEOUT, &e))
    }
}

#[async_trait]
impl IntelSource for IpInfoClient {
    fn name(&self) -> &'static str {
        "ipinfo"
    }

    async fn fetch(&self, target: &Target) -> SourceOutcome<Value> {
        let ip = if target.is_domain() {
            match self.resolver.resolve_a(target.as_str()).await {
                Ok(ip) => ip,
                Err(err) => return SourceOutcome::Failure(err.to_string()),
            }
        } else {
            target.as_str().to_string()
        };

        self.locate(&ip).await.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_ipv4_target_skips_resolution() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/8.8.8.8/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ip": "8.8.8.8",
                "org": "AS15169 Google LLC",
                "city": "Mountain View",
                "loc": "37.4056,-122.0775"
            })))
            .mount(&server)
            .await;

        // Resolver points nowhere; it must not be consulted for an IP.
        let client = IpInfoClient::new(None)
            .with_base_url(server.uri())
            .with_resolver(DohResolver::new().with_base_url("http://127.0.0.1:9"));

        let target = Target::parse("8.8.8.8").unwrap();
        let value = client.fetch(&target).await.success().unwrap();
        assert_eq!(value["city"], "Mountain View");
    }

    #[tokio::test]
    async fn test_domain_target_resolves_first() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/resolve"))
            .and(query_param("name", "example.com"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Answer": [ { "name": "example.com.", "type": 1, "data": "93.184.216.34" } ]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/93.184.216.34/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ip": "93.184.216.34",
                "org": "EDGECAST"
            })))
            .mount(&server)
            .await;

        let client = IpInfoClient::new(None)
            .with_base_url(server.uri())
            .with_resolver(DohResolver::new().with_base_url(server.uri()));

        let target = Target::parse("example.com").unwrap();
        let value = client.fetch(&target).await.success().unwrap();
        assert_eq!(value["ip"], "93.184.216.34");
    }

    #[tokio::test]
    async fn test_resolution_failure_fails_this_adapter_only() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/resolve"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Status": 3 })))
            .mount(&server)
            .await;

        let client = IpInfoClient::new(None)
            .with_base_url(server.uri())
            .with_resolver(DohResolver::new().with_base_url(server.uri()));

        let target = Target::parse("nxdomain.example").unwrap();
        let outcome = client.fetch(&target).await;
        assert_eq!(
            outcome.failure(),
            Some("DNS resolution failed: Could not resolve domain to IP")
        );
    }

    #[tokio::test]
    async fn test_token_is_sent_when_configured() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/1.1.1.1/json"))
            .and(query_param("token", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ip": "1.1.1.1" })))
            .mount(&server)
            .await;

        let client = IpInfoClient::new(Some("secret".into())).with_base_url(server.uri());
        let target = Target::parse("1.1.1.1").unwrap();
        assert!(client.fetch(&target).await.is_success());
    }
}
