use std::process::ExitCode;

use anyhow::{Context, Result};
use gmaps_lib::MapsConfig;

/// Serve MCP over stdio until EOF or Ctrl-C.
pub async fn run() -> Result<ExitCode> {
    let config = MapsConfig::from_env().context("failed to load configuration")?;
    gmaps_mcp::serve_stdio(config).await?;
    Ok(ExitCode::SUCCESS)
}
