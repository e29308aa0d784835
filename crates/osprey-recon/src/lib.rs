//! Reconnaissance orchestration for osprey.
//!
//! This crate ties the provider adapters together:
//!
//! - [`ReconEngine`] fans out to the three top-level sources, settles
//!   them independently, and synthesizes the final report
//! - [`NetworkIntel`] combines geolocation and reputation into one
//!   normalized record
//! - [`report`] renders the deterministic narrative; [`Narrator`]
//!   produces the optional generative one
//! - [`QuotaBreaker`] cools the generative path down for 24 hours after
//!   the model API reports quota exhaustion

mod engine;
mod narrator;
mod network;
mod quota;
pub mod report;

pub use engine::ReconEngine;
pub use narrator::Narrator;
pub use network::{NetworkIntel, NetworkIntelSource};
pub use quota::{Clock, QuotaBreaker, SystemClock};
