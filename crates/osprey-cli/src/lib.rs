//! # osprey-cli
//!
//! Single-shot OSINT reconnaissance from the command line: validates the
//! target, fans out to the configured providers, and prints the selected
//! narrative (or the full JSON payload with `--json`).
//!
//! Provider credentials come from the environment (`WHOISXML_API_KEY`,
//! `VIRUSTOTAL_API_KEY`, `IPINFO_TOKEN`, `URLVOID_API_KEY`,
//! `OPENAI_API_KEY`); a missing credential simply marks that source as
//! failed in the output.

pub mod cli;

pub use cli::run;
