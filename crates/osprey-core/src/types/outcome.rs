use crate::error::OspreyError;

/// Three-way outcome of a single provider fetch.
///
/// Every adapter settles independently: a `Failure` carries the message
/// recorded in the per-source error map, while `NotApplicable` marks a
/// provider that does not cover the target at all (wrong target type,
/// unsuitable domain) and is deliberately not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOutcome<T> {
    /// The provider returned usable data
    Success(T),
    /// The provider was attempted and failed, with a human-readable reason
    Failure(String),
    /// The provider does not apply to this target; no data, no error
    NotApplicable,
}

impl<T> SourceOutcome<T> {
    /// Returns true for `Success`
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns true for `Failure`
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// Returns true for `NotApplicable`
    #[must_use]
    pub const fn is_not_applicable(&self) -> bool {
        matches!(self, Self::NotApplicable)
    }

    /// Consume the outcome, yielding the payload of a `Success`
    #[must_use]
    pub fn success(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    /// The failure message, if this outcome is a `Failure`
    #[must_use]
    pub fn failure(&self) -> Option<&str> {
        match self {
            Self::Failure(message) => Some(message),
            _ => None,
        }
    }

    /// Map the payload of a `Success`, preserving the other variants
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> SourceOutcome<U> {
        match self {
            Self::Success(value) => SourceOutcome::Success(f(value)),
            Self::Failure(message) => SourceOutcome::Failure(message),
            Self::NotApplicable => SourceOutcome::NotApplicable,
        }
    }
}

impl<T> From<Result<T, OspreyError>> for SourceOutcome<T> {
    /// Capture an adapter result at its boundary: errors become recorded
    /// failure messages, never propagated exceptions.
    fn from(result: Result<T, OspreyError>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(err) => Self::Failure(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_accessors() {
        let ok: SourceOutcome<u32> = SourceOutcome::Success(7);
        assert!(ok.is_success());
        assert_eq!(ok.success(), Some(7));

        let failed: SourceOutcome<u32> = SourceOutcome::Failure("boom".into());
        assert_eq!(failed.failure(), Some("boom"));
        assert!(!failed.is_not_applicable());

        let skipped: SourceOutcome<u32> = SourceOutcome::NotApplicable;
        assert!(skipped.is_not_applicable());
        assert_eq!(skipped.success(), None);
    }

    #[test]
    fn test_from_result_captures_error_text() {
        let result: Result<(), OspreyError> = Err(OspreyError::MissingCredentials {
            provider: "VirusTotal",
        });
        let outcome = SourceOutcome::from(result);
        assert_eq!(outcome.failure(), Some("VirusTotal API key not configured"));
    }

    #[test]
    fn test_map_preserves_variant() {
        let failed: SourceOutcome<u32> = SourceOutcome::Failure("nope".into());
        let mapped = failed.map(|n| n.to_string());
        assert_eq!(mapped.failure(), Some("nope"));
    }
}
