//! Core types and errors for the osprey reconnaissance engine.
//!
//! This crate provides the foundational pieces shared across the workspace:
//!
//! - **Types**: target classification, per-source outcomes, normalized
//!   network intelligence, and the final report shape
//! - **Errors**: comprehensive error handling with [`OspreyError`]
//!
//! It performs no I/O; the provider adapters and the orchestration engine
//! live in `osprey-providers` and `osprey-recon`.

mod error;
pub mod types;

pub use error::{OspreyError, Result};
pub use types::*;
