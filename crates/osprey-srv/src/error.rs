//! Error types for the reconnaissance HTTP server.

use thiserror::Error;

/// Errors that can occur while running the server.
#[derive(Error, Debug)]
pub enum SrvError {
    /// Server failed to bind or serve.
    #[error("server error: {0}")]
    Server(String),

    /// Configuration is invalid.
    #[error("config error: {0}")]
    Config(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
