//! Server configuration, read from the environment.

use crate::error::SrvError;
use osprey_providers::Credentials;
use std::net::SocketAddr;

/// Environment variable naming the listen address.
const LISTEN_VAR: &str = "OSPREY_LISTEN";

/// Runtime configuration for the reconnaissance server.
///
/// Provider credentials are read here but their absence is never a
/// startup error - an unconfigured adapter fails per-request instead.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen address (default: 0.0.0.0:8080).
    pub listen: SocketAddr,

    /// External provider credentials.
    pub credentials: Credentials,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            credentials: Credentials::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from the environment.
    pub fn from_env() -> crate::Result<Self> {
        Self::from_vars(std::env::var(LISTEN_VAR).ok(), Credentials::from_env())
    }

    fn from_vars(listen: Option<String>, credentials: Credentials) -> crate::Result<Self> {
        let listen = match listen {
            Some(value) => value
                .parse()
                .map_err(|e| SrvError::Config(format!("invalid {LISTEN_VAR} ({value}): {e}")))?,
            None => default_listen(),
        };
        Ok(Self {
            listen,
            credentials,
        })
    }
}

fn default_listen() -> SocketAddr {
    "0.0.0.0:8080".parse().expect("valid default addr")
}
