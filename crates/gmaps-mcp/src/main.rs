use anyhow::{Context, Result};
use gmaps_lib::MapsConfig;
use gmaps_mcp::logging::{init_logging, LoggingConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Logging MUST go to stderr to avoid stdout protocol corruption
    init_logging(&LoggingConfig::from_env())?;

    let config = MapsConfig::from_env().context("failed to load configuration")?;
    gmaps_mcp::serve_stdio(config).await
}
