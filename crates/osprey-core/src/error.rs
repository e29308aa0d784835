use thiserror::Error;

/// Result type alias for osprey operations
pub type Result<T> = std::result::Result<T, OspreyError>;

/// Errors that can occur while gathering or aggregating intelligence
#[derive(Error, Debug)]
pub enum OspreyError {
    /// Input string is neither a domain name nor an IPv4 address
    #[error("Invalid domain or IP format")]
    InvalidTarget {
        /// The rejected input
        target: String,
    },

    /// A provider credential is not configured
    #[error("{provider} API key not configured")]
    MissingCredentials {
        /// Display name of the provider
        provider: &'static str,
    },

    /// Provider returned a non-success status or an error payload
    #[error("{provider} API error: {message}")]
    Api {
        /// Display name of the provider
        provider: &'static str,
        /// Error detail (status line or provider-reported message)
        message: String,
    },

    /// HTTP transport failed before a response was received
    #[error("{provider} request failed: {message}")]
    Http {
        /// Display name of the provider
        provider: &'static str,
        /// Transport error detail
        message: String,
    },

    /// Provider call exceeded its per-request budget
    #[error("{provider} request timed out after {seconds}s")]
    Timeout {
        /// Display name of the provider
        provider: &'static str,
        /// The budget that was exceeded
        seconds: u64,
    },

    /// JSON parsing/serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// DNS resolution failed
    #[error("DNS resolution failed: {0}")]
    Dns(String),

    /// Generic internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl OspreyError {
    /// Returns true if the error was caused by bad client input
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidTarget { .. })
    }

    /// Returns true if the error must terminate the request instead of
    /// being recorded as a per-source failure
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::InvalidTarget { .. } | Self::Internal(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_target_message() {
        let err = OspreyError::InvalidTarget {
            target: "not a host".into(),
        };
        assert_eq!(err.to_string(), "Invalid domain or IP format");
        assert!(err.is_client_error());
        assert!(err.is_terminal());
    }

    #[test]
    fn test_provider_errors_are_recordable() {
        let err = OspreyError::Timeout {
            provider: "VirusTotal",
            seconds: 15,
        };
        assert_eq!(err.to_string(), "VirusTotal request timed out after 15s");
        assert!(!err.is_terminal());

        let err = OspreyError::MissingCredentials { provider: "WHOISXML" };
        assert_eq!(err.to_string(), "WHOISXML API key not configured");
    }
}
