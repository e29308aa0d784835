//! Network intelligence: concurrent geolocation + reputation gathering
//! and normalization into one record.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use osprey_core::{
    NetworkRecord, Reputation, ReputationStatus, ServiceEntry, SourceOutcome, SourcePresence,
    Target,
};
use osprey_providers::IntelSource;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// A source of normalized network intelligence.
///
/// The orchestrator depends on this trait rather than on the concrete
/// aggregator, so tests can exercise the network source failing or
/// being absent without any live sub-adapters.
#[async_trait]
pub trait NetworkIntelSource: Send + Sync {
    /// Gather and normalize network intelligence for the target
    async fn gather(&self, target: &Target) -> SourceOutcome<NetworkRecord>;
}

/// Combines the geolocation and reputation adapters.
///
/// The two sub-sources run concurrently and fail independently; the
/// normalized record is built from whichever subset answered. The
/// aggregator itself always produces a record - an empty one when both
/// sub-sources came back empty.
pub struct NetworkIntel {
    geolocation: Arc<dyn IntelSource>,
    reputation: Arc<dyn IntelSource>,
}

impl NetworkIntel {
    /// Compose the aggregator from its two sub-sources
    #[must_use]
    pub fn new(geolocation: Arc<dyn IntelSource>, reputation: Arc<dyn IntelSource>) -> Self {
        Self {
            geolocation,
            reputation,
        }
    }
}

#[async_trait]
impl NetworkIntelSource for NetworkIntel {
    async fn gather(&self, target: &Target) -> SourceOutcome<NetworkRecord> {
        // Settle both sub-sources; neither blocks or aborts the other.
        let (geo, reputation) = tokio::join!(
            self.geolocation.fetch(target),
            self.reputation.fetch(target)
        );
        SourceOutcome::Success(normalize(geo, reputation, Utc::now()))
    }
}

/// Map the raw sub-source outcomes onto the canonical record.
#[must_use]
pub fn normalize(
    geo: SourceOutcome<Value>,
    reputation: SourceOutcome<Value>,
    now: DateTime<Utc>,
) -> NetworkRecord {
    let mut record = NetworkRecord {
        sources: SourcePresence {
            ipinfo: geo.is_success(),
            urlvoid: reputation.is_success(),
        },
        ..NetworkRecord::default()
    };

    if let SourceOutcome::Success(geo) = &geo {
        apply_geolocation(&mut record, geo);
    }

    record.reputation = normalize_reputation(&reputation);

    // Representative entries for common web ports, synthesized only when
    // an address resolved. These are placeholders, not scan results.
    if record.ip.is_some() {
        record.ports = vec![80, 443];
        record.services = vec![
            ServiceEntry {
                port: 80,
                protocol: "tcp".to_string(),
                service: "http".to_string(),
                product: "Web Server (assumed)".to_string(),
                timestamp: now.to_rfc3339(),
                banner: "HTTP/1.1 Server".to_string(),
            },
            ServiceEntry {
                port: 443,
                protocol: "tcp".to_string(),
                service: "https".to_string(),
                product: "HTTPS Server (assumed)".to_string(),
                timestamp: now.to_rfc3339(),
                banner: "HTTPS/1.1 Secure Server".to_string(),
            },
        ];
    }

    record
}

fn apply_geolocation(record: &mut NetworkRecord, geo: &Value) {
    let field = |key: &str| geo.get(key).and_then(Value::as_str).map(String::from);

    record.ip = field("ip");
    record.org = field("org");
    record.city = field("city");
    record.region = field("region");
    record.country = field("country");
    record.postal = field("postal");

    // Coordinates arrive as one "lat,lon" string.
    if let Some(loc) = geo.get("loc").and_then(Value::as_str) {
        if let Some((lat, lon)) = loc.split_once(',') {
            record.latitude = lat.trim().parse().ok();
            record.longitude = lon.trim().parse().ok();
        }
    }

    if let Some(hostname) = field("hostname") {
        record.hostnames = vec![hostname];
    }
}

/// Derive the reputation summary, with status precedence: absent
/// sub-source first, then unsupported, then unusable payload, then a
/// completed scan.
fn normalize_reputation(reputation: &SourceOutcome<Value>) -> Reputation {
    match reputation {
        SourceOutcome::NotApplicable => Reputation {
            status: ReputationStatus::Unsupported,
            ..Reputation::default()
        },
        SourceOutcome::Failure(message) => {
            warn!(error = %message, "reputation scan unavailable");
            Reputation {
                status: ReputationStatus::Unavailable,
                ..Reputation::default()
            }
        }
        SourceOutcome::Success(payload) => {
            let Some(data) = payload.get("data") else {
                return Reputation {
                    status: ReputationStatus::Unavailable,
                    ..Reputation::default()
                };
            };

            let Some(blacklists) = data.pointer("/report/blacklists") else {
                // A report without blacklist data carries no verdict.
                debug!("reputation payload has no blacklist section");
                return Reputation::default();
            };

            let engine_map = match blacklists.get("engines") {
                None => serde_json::Map::new(),
                Some(engines) => match engines.as_object() {
                    Some(map) => map.clone(),
                    None => {
                        return Reputation {
                            status: ReputationStatus::Error,
                            ..Reputation::default()
                        }
                    }
                },
            };

            let detections = blacklists
                .get("detections")
                .and_then(Value::as_u64)
                .unwrap_or(0);

            let engines: Vec<String> = engine_map
                .iter()
                .filter(|(_, engine)| {
                    engine
                        .get("detected")
                        .and_then(Value::as_bool)
                        .unwrap_or(false)
                })
                .map(|(name, _)| name.clone())
                .collect();

            Reputation {
                malicious: detections > 0,
                detections: u32::try_from(detections).unwrap_or(u32::MAX),
                total_engines: u32::try_from(engine_map.len()).unwrap_or(u32::MAX),
                engines,
                status: ReputationStatus::Scanned,
            }
        }
    }
}
