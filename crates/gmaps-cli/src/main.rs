use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use gmaps_mcp::logging::{init_logging, LoggingConfig};

mod commands;

#[derive(Parser, Debug)]
#[command(author, version, about = "Google Maps tools over MCP and the command line")]
struct Cli {
    /// Log filter (overrides RUST_LOG), e.g. `debug` or `gmaps_lib=trace`.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the MCP server over stdin/stdout.
    Serve,
    /// Print the tool registry as JSON.
    Tools,
    /// Run a single tool call and print its result.
    Call {
        /// Tool name, e.g. `maps_geocode`.
        tool: String,
        /// Tool arguments as a JSON object.
        #[arg(long, default_value = "{}")]
        args: String,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env();
    if let Some(level) = cli.log_level.as_deref() {
        logging = logging.with_level(level);
    }
    init_logging(&logging)?;

    match cli.command {
        Command::Serve => commands::serve::run().await,
        Command::Tools => commands::tools::run(),
        Command::Call { tool, args } => commands::call::run(&tool, &args).await,
    }
}
