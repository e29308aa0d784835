use serde::{Deserialize, Serialize};

/// Normalized network intelligence for one target.
///
/// Combines geolocation and domain-reputation data from whichever
/// sub-sources answered; every field defaults to empty/absent when its
/// source did not. Wire key names follow the dashboard response contract
/// (`ip_str`, `country_name`, `data`, ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkRecord {
    /// Resolved IPv4 address, if any
    #[serde(rename = "ip_str")]
    pub ip: Option<String>,

    /// Hostnames reported for the address
    #[serde(default)]
    pub hostnames: Vec<String>,

    /// Owning organization
    pub org: Option<String>,

    /// Internet service provider
    pub isp: Option<String>,

    /// Autonomous system number
    pub asn: Option<String>,

    /// Country name
    #[serde(rename = "country_name")]
    pub country: Option<String>,

    /// City name
    pub city: Option<String>,

    /// Region/state code
    #[serde(rename = "region_code")]
    pub region: Option<String>,

    /// Postal/ZIP code
    #[serde(rename = "postal_code")]
    pub postal: Option<String>,

    /// Latitude coordinate
    pub latitude: Option<f64>,

    /// Longitude coordinate
    pub longitude: Option<f64>,

    /// Ports listed in the illustrative service entries
    #[serde(default)]
    pub ports: Vec<u16>,

    /// Representative service entries (see [`ServiceEntry`]); these are
    /// placeholders, not measured scan data
    #[serde(rename = "data", default)]
    pub services: Vec<ServiceEntry>,

    /// Domain reputation summary
    #[serde(default)]
    pub reputation: Reputation,

    /// Which sub-sources contributed to this record
    #[serde(default)]
    pub sources: SourcePresence,

    /// When the target was last observed, if reported
    pub last_seen: Option<String>,
}

impl NetworkRecord {
    /// Returns the coordinates as a tuple if both are present
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }

    /// Returns true if any geolocation field was populated
    #[must_use]
    pub const fn has_geolocation(&self) -> bool {
        self.ip.is_some()
    }
}

/// An illustrative service entry synthesized for common web ports when an
/// address resolved. Not the result of a port scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceEntry {
    /// Port number
    pub port: u16,
    /// Transport protocol
    pub protocol: String,
    /// Service name
    pub service: String,
    /// Product description
    pub product: String,
    /// When the entry was synthesized (RFC 3339)
    pub timestamp: String,
    /// Representative banner text
    pub banner: String,
}

/// Which network-intelligence sub-sources answered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcePresence {
    /// Geolocation lookup answered
    pub ipinfo: bool,
    /// Domain reputation scan answered
    pub urlvoid: bool,
}

/// Domain reputation summary from the reputation scanner
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reputation {
    /// True when at least one engine flagged the target
    pub malicious: bool,

    /// Number of engines that flagged the target
    pub detections: u32,

    /// Names of the engines that flagged the target
    #[serde(default)]
    pub engines: Vec<String>,

    /// Number of engines consulted
    pub total_engines: u32,

    /// How far the reputation scan got
    #[serde(default)]
    pub status: ReputationStatus,
}

/// Outcome classification of the reputation scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReputationStatus {
    /// No reputation data was gathered
    #[default]
    Unknown,
    /// The scan completed and produced a blacklist report
    Scanned,
    /// The target is outside what the scanner covers
    Unsupported,
    /// The scan was attempted but no result came back
    Unavailable,
    /// A report came back but could not be interpreted
    Error,
}

impl std::fmt::Display for ReputationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Unknown => "unknown",
            Self::Scanned => "scanned",
            Self::Unsupported => "unsupported",
            Self::Unavailable => "unavailable",
            Self::Error => "error",
        };
        f.write_str(s)
    }
}
