//! MCP (Model Context Protocol) server for the Google Maps tools.
//!
//! # Architecture
//!
//! - `tools`: the fixed registry of seven tool descriptors
//! - `types`: typed tool inputs and their validation
//! - `server`: tool dispatch and JSON-RPC method handling
//! - `transport`: newline-framed JSON-RPC over stdio
//! - `logging`: stderr-only tracing setup
//! - `error`: JSON-RPC error objects
//!
//! # Transport
//!
//! The server communicates via stdio using JSON-RPC 2.0 messages, one per
//! line. All logging is redirected to stderr to prevent stdout protocol
//! corruption.

pub mod error;
pub mod logging;
pub mod server;
pub mod tools;
pub mod transport;
pub mod types;

pub use error::{Result, RpcError};
pub use server::MapsServer;
pub use tools::{tool_descriptors, ToolDescriptor};
pub use transport::{run_server_loop, StdioTransport};

use anyhow::Context;
use gmaps_lib::MapsConfig;

/// Serve MCP over stdio until the client disconnects.
///
/// The configuration is read before anything else so a missing API key
/// fails before the first request is accepted.
pub async fn serve_stdio(config: MapsConfig) -> anyhow::Result<()> {
    let server = MapsServer::new(config).context("failed to build HTTP client")?;
    tracing::info!(
        tools = server.list_tools().len(),
        version = env!("CARGO_PKG_VERSION"),
        "starting google-maps MCP server"
    );
    let mut transport = StdioTransport::new();
    run_server_loop(&mut transport, &server).await
}
