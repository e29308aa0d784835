use crate::error::{OspreyError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a reconnaissance target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// A hostname such as `example.com`
    Domain,
    /// A dotted-quad IPv4 address
    Ipv4,
}

/// A validated reconnaissance target.
///
/// Construction via [`Target::parse`] is the only entry point; a `Target`
/// is therefore always either a well-formed domain name or an IPv4
/// address, and the classification never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    raw: String,
    kind: TargetKind,
}

impl Target {
    /// Classify an input string as a domain or IPv4 address.
    ///
    /// Domains follow the label grammar: dot-separated labels of 1-63
    /// alphanumeric-or-hyphen characters with no leading or trailing
    /// hyphen. IPv4 addresses are four dot-separated octets in 0-255.
    /// Anything else fails with [`OspreyError::InvalidTarget`] before any
    /// network activity takes place.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();

        if is_ipv4(trimmed) {
            return Ok(Self {
                raw: trimmed.to_string(),
                kind: TargetKind::Ipv4,
            });
        }

        if is_domain(trimmed) {
            return Ok(Self {
                raw: trimmed.to_ascii_lowercase(),
                kind: TargetKind::Domain,
            });
        }

        Err(OspreyError::InvalidTarget {
            target: input.to_string(),
        })
    }

    /// The classification of this target
    #[must_use]
    pub const fn kind(&self) -> TargetKind {
        self.kind
    }

    /// The target as submitted (lowercased for domains)
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns true if the target is a domain name
    #[must_use]
    pub const fn is_domain(&self) -> bool {
        matches!(self.kind, TargetKind::Domain)
    }

    /// Returns true if the target is an IPv4 address
    #[must_use]
    pub const fn is_ipv4(&self) -> bool {
        matches!(self.kind, TargetKind::Ipv4)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Check for a dotted-quad IPv4 address with octets in 0-255
fn is_ipv4(s: &str) -> bool {
    let mut octets = 0usize;
    for part in s.split('.') {
        if part.is_empty() || part.len() > 3 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        match part.parse::<u16>() {
            Ok(v) if v <= 255 => octets += 1,
            _ => return false,
        }
    }
    octets == 4
}

/// Check the hostname label grammar
fn is_domain(s: &str) -> bool {
    if s.is_empty() || s.len() > 253 {
        return false;
    }
    let labels: Vec<&str> = s.split('.').collect();
    // Purely numeric label sequences are malformed addresses (e.g.
    // 999.999.999.999), not hostnames.
    if labels
        .iter()
        .all(|l| !l.is_empty() && l.bytes().all(|b| b.is_ascii_digit()))
    {
        return false;
    }
    labels.iter().all(|l| is_label(l))
}

fn is_label(label: &str) -> bool {
    if label.is_empty() || label.len() > 63 {
        return false;
    }
    let bytes = label.as_bytes();
    if bytes[0] == b'-' || bytes[bytes.len() - 1] == b'-' {
        return false;
    }
    bytes
        .iter()
        .all(|b| b.is_ascii_alphanumeric() || *b == b'-')
}
