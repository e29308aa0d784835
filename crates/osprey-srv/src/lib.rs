//! osprey-srv: HTTP surface for the reconnaissance engine.
//!
//! A thin axum layer over [`osprey_recon::ReconEngine`]:
//!
//! - `POST /api/reconnaissance` accepts `{ "target": "<domain-or-ip>" }`
//!   and returns the combined report with per-source data and errors
//! - `GET /health` is a liveness probe
//!
//! Provider failures never surface as HTTP errors - a valid target
//! always yields 200 with best-effort data plus an error map. Only a
//! missing/invalid target (400) and unexpected internal faults (500)
//! terminate a request.

pub mod config;
pub mod error;
pub mod routes;
pub mod server;

// Re-exports for convenience.
pub use config::ServerConfig;
pub use error::SrvError;
pub use server::{router, serve};

/// Result type for osprey-srv operations.
pub type Result<T> = std::result::Result<T, SrvError>;
