//! DNS-over-HTTPS resolution for domain targets.

use crate::http::{build_client, encode, transport_error};
use osprey_core::{OspreyError, Result};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Default DNS-over-HTTPS endpoint
const DEFAULT_BASE_URL: &str = "https://dns.google";

/// Per-lookup budget; shares the geolocation adapter's allowance
const RESOLVE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct ResolveResponse {
    #[serde(rename = "Answer", default)]
    answer: Vec<AnswerRecord>,
}

#[derive(Debug, Deserialize)]
struct AnswerRecord {
    data: String,
}

/// Resolves hostnames to IPv4 addresses over DNS-over-HTTPS.
#[derive(Debug, Clone)]
pub struct DohResolver {
    http: reqwest::Client,
    base_url: String,
}

impl Default for DohResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl DohResolver {
    /// Create a resolver against the default endpoint
    #[must_use]
    pub fn new() -> Self {
        Self {
            http: build_client(RESOLVE_TIMEOUT),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Override the resolver endpoint (useful for testing)
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Resolve a hostname to its first A record.
    ///
    /// An empty answer section is a [`OspreyError::Dns`] failure; it fails
    /// only the caller, never sibling lookups.
    pub async fn resolve_a(&self, name: &str) -> Result<String> {
        let url = format!(
            "{}/resolve?name={}&type=A",
            self.base_url,
            encode(name)
        );
        debug!(name, "resolving A record over DoH");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| match transport_error("DNS", RESOLVE_TIMEOUT, &e) {
                OspreyError::Timeout { .. } => OspreyError::Dns(format!(
                    "lookup for {name} timed out after {}s",
                    RESOLVE_TIMEOUT.as_secs()
                )),
                other => OspreyError::Dns(other.to_string()),
            })?;

        if !response.status().is_success() {
            return Err(OspreyError::Dns(format!(
                "resolver returned {}",
                response.status()
            )));
        }

        let parsed: ResolveResponse = response
            .json()
            .await
            .map_err(|e| OspreyError::Dns(e.to_string()))?;

        parsed
            .answer
            .into_iter()
            .next()
            .map(|record| record.data)
            .ok_or_else(|| OspreyError::Dns("Could not resolve domain to IP".to_string()))
    }
}
