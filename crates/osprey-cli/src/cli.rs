//! CLI argument parsing and the single reconnaissance command.

use anyhow::{bail, Result};
use clap::Parser;
use colored::Colorize;
use osprey_core::{NarrativeKind, OspreyError};
use osprey_providers::Credentials;
use osprey_recon::ReconEngine;
use tracing_subscriber::EnvFilter;

/// OSINT reconnaissance for a domain or IPv4 address
///
/// Queries WHOIS registration, threat scanning, geolocation and domain
/// reputation in parallel, then prints a combined risk narrative.
#[derive(Parser, Debug)]
#[command(name = "osprey")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Domain or IPv4 address to analyze
    pub target: String,

    /// Print the full JSON response instead of the narrative
    #[arg(long)]
    pub json: bool,

    /// Increase verbosity
    #[arg(short, long)]
    pub verbose: bool,
}

/// Run the CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    let engine = ReconEngine::from_credentials(&Credentials::from_env());

    let report = match engine.analyze(&cli.target).await {
        Ok(report) => report,
        Err(err @ OspreyError::InvalidTarget { .. }) => bail!("{err}: {}", cli.target),
        Err(err) => return Err(err.into()),
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let banner = match report.report_type {
        NarrativeKind::Ai => "generative narrative".green(),
        NarrativeKind::Fallback => "rule-based narrative".yellow(),
    };
    eprintln!("{} {} ({banner})", "analyzed".bold(), report.target);
    if !report.errors.is_empty() {
        for (source, message) in &report.errors {
            eprintln!("{} {source}: {message}", "source failed".red());
        }
    }

    println!("{}", report.narrative());
    Ok(())
}
