//! Threat-reputation scans via the VirusTotal domain-report API.

use crate::http::{build_client, transport_error};
use crate::source::IntelSource;
use async_trait::async_trait;
use osprey_core::{OspreyError, Result, SourceOutcome, Target};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://www.virustotal.com";

/// Per-request budget for threat scans
const SCAN_TIMEOUT: Duration = Duration::from_secs(15);

/// Client for the VirusTotal v2 domain-report endpoint.
///
/// Valid for both domain and IPv4 targets. A target the service has never
/// seen (`response_code == 0`) is a failure, not an empty success.
#[derive(Debug, Clone)]
pub struct VirusTotalClient {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl VirusTotalClient {
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

    /// Fetch the scan report for a target.
    pub async fn report(&self, target: &str) -> Result<Value> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(OspreyError::MissingCredentials {
                provider: "VirusTotal",
            })?;

        debug!(target, "fetching VirusTotal report");

        let url = format!("{}/vtapi/v2/domain/report", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[("apikey", api_key), ("domain", target)])
            .send()
            .await
            .map_err(|e| transport_error("VirusTotal", SCAN_TIMEOUT, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(OspreyError::Api {
                provider: "VirusTotal",
                message: status.to_string(),
            });
        }

        let data: Value = response
            .json()
            .await
            .map_err(|e| transport_error("VirusTotal", SCAN_TIMEOUT, &e))?;

        if data.get("response_code").and_then(Value::as_i64) == Some(0) {
            return Err(OspreyError::Api {
                provider: "VirusTotal",
                message: "target not found in database".to_string(),
            });
        }

        Ok(data)
    }
}

#[async_trait]
impl IntelSource for VirusTotalClient {
    fn name(&self) -> &'static str {
        "virustotal"
    }

    async fn fetch(&self, target: &Target) -> SourceOutcome<Value> {
        self.report(target.as_str()).await.into()
    }
}
