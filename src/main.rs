//! Admin Console MCP Server - Main Entry Point
//!
//! This is the main entry point for the admin console server application.
//! The actual implementation is in the `admin_console` library.

use admin_console::logging::{init_logging, parse_level};
use admin_console::{ConsoleServerHandler, load_config};
use anyhow::Result;
use clap::{CommandFactory, Parser};
use mcp_attr::server::serve_stdio;
use tracing::info;

/// Admin Console MCP Server - schema-driven business record administration via Model Context Protocol
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the console configuration file (TOML); built-in modules are used if it does not exist
    config: String,

    /// Commit every change of file-backed modules to git and push on exit
    #[arg(long)]
    sync_git: bool,

    /// Log level written to stderr (trace, debug, info, warn, error, off); RUST_LOG overrides it
    #[arg(long, default_value = "info", value_parser = parse_level)]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Bare invocation: print usage and exit like a usage error
    if std::env::args().len() == 1 {
        Args::command().print_help().ok();
        println!();
        std::process::exit(2);
    }

    let args = Args::parse();
    init_logging(&args.log_level);

    let config = load_config(&args.config)?;
    info!(
        config = %args.config,
        modules = config.modules.len(),
        sync_git = args.sync_git,
        "starting admin console"
    );

    let handler = ConsoleServerHandler::new(config, args.sync_git)?;
    serve_stdio(handler).await?;
    Ok(())
}
