use std::process::ExitCode;

use anyhow::Result;

/// Print every tool descriptor as pretty JSON. Needs no API key.
pub fn run() -> Result<ExitCode> {
    let registry = serde_json::to_string_pretty(gmaps_mcp::tool_descriptors())?;
    println!("{}", registry);
    Ok(ExitCode::SUCCESS)
}
