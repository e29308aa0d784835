//! osprey - OSINT reconnaissance from the command line.

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    osprey_cli::run().await
}
