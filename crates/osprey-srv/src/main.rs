//! osprey-srv binary entrypoint.

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> osprey_srv::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = osprey_srv::ServerConfig::from_env()?;
    osprey_srv::serve(config).await
}
