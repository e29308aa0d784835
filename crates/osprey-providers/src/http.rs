//! Shared HTTP plumbing for the provider clients.

use osprey_core::OspreyError;
use std::time::Duration;

/// User-Agent header sent with every outbound provider request
pub(crate) const USER_AGENT: &str = concat!("osprey-osint/", env!("CARGO_PKG_VERSION"));

/// Build a reqwest client with the given per-request budget.
pub(crate) fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .gzip(true)
        .build()
        .expect("Failed to build HTTP client")
}

/// Map a transport-level failure into the error taxonomy, distinguishing
/// the timeout race from other I/O failures.
pub(crate) fn transport_error(
    provider: &'static str,
    timeout: Duration,
    err: &reqwest::Error,
) -> OspreyError {
    if err.is_timeout() {
        OspreyError::Timeout {
            provider,
            seconds: timeout.as_secs(),
        }
    } else {
        OspreyError::Http {
            provider,
            message: err.to_string(),
        }
    }
}

/// Percent-encode a query-string value.
pub(crate) fn encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
