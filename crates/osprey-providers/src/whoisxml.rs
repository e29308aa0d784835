//! Domain registration lookups via the WhoisXML API.

use crate::http::{build_client, transport_error};
use crate::source::IntelSource;
use async_trait::async_trait;
use osprey_core::{OspreyError, Result, SourceOutcome, Target};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://www.whoisxmlapi.com";

/// Per-request budget for registration lookups
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(15);

/// Client for the WhoisXML registration-record API.
///
/// Domain targets only; an IPv4 target settles as a failure before any
/// request is issued.
#[derive(Debug, Clone)]
pub struct WhoisXmlClient {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl WhoisXmlClient {
    /// Create a client. The key is optional; lookups without one fail
    /// per-request with a missing-credentials message.
    #[must_use]
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            http: build_client(LOOKUP_TIMEOUT),
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

    /// Fetch the registration record for a domain.
    pub async fn lookup(&self, domain: &str) -> Result<Value> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(OspreyError::MissingCredentials {
                provider: "WHOISXML",
            })?;

        debug!(domain, "fetching WHOIS record");

        let url = format!("{}/whoisserver/WhoisService", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("apiKey", api_key),
                ("domainName", domain),
                ("outputFormat", "JSON"),
            ])
            .send()
            .await
            .map_err(|e| transport_error("WHOIS", LOOKUP_TIMEOUT, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(OspreyError::Api {
                provider: "WHOIS",
                message: status.to_string(),
            });
        }

        let data: Value = response
            .json()
            .await
            .map_err(|e| transport_error("WHOIS", LOOKUP_TIMEOUT, &e))?;

        // The service reports failures inside a 200 body.
        if let Some(msg) = data.pointer("/ErrorMessage/msg").and_then(Value::as_str) {
            return Err(OspreyError::Api {
                provider: "WHOIS",
                message: msg.to_string(),
            });
        }

        Ok(data)
    }
}

#[async_trait]
impl IntelSource for WhoisXmlClient {
    fn name(&self) -> &'static str {
        "whois"
    }

    async fn fetch(&self, target: &Target) -> SourceOutcome<Value> {
        if !target.is_domain() {
            return SourceOutcome::Failure(
                "WHOIS lookup only available for domains".to_string(),
            );
        }
        self.lookup(target.as_str()).await.into()
    }
}
