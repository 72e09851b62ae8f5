use std::process::ExitCode;

use anyhow::{Context, Result};
use gmaps_lib::MapsConfig;
use gmaps_mcp::MapsServer;
use serde_json::Value;

/// Dispatch one tool call. The result text goes to stdout either way; the
/// exit status is 1 when the envelope is flagged as an error.
pub async fn run(tool: &str, args: &str) -> Result<ExitCode> {
    let arguments: Value =
        serde_json::from_str(args).context("--args must be a valid JSON object")?;
    let config = MapsConfig::from_env().context("failed to load configuration")?;
    let server = MapsServer::new(config).context("failed to build HTTP client")?;
    tracing::debug!(tool, "dispatching single tool call");

    let result = server.call_tool(tool, arguments).await;
    println!("{}", result.text_content());

    Ok(if result.is_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
