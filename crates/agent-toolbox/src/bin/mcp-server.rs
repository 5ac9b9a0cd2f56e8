//! MCP tool server over stdio
//!
//! # Usage
//!
//! ```bash
//! # Product tools read their settings from the environment (or .env)
//! export S4PRODUCT_MASTER_ENDPOINT="https://host/sap/opu/odata4/.../0001"
//! export S4HANA_USER="user"
//! export S4HANA_PASSWORD="password"
//!
//! cargo run --bin mcp-server -p agent-toolbox
//! cargo run --bin mcp-server -p agent-toolbox -- --calculator-only
//! ```
//!
//! stdout carries the protocol; logs go to stderr.

use agent_mcp::MCPServer;
use agent_toolbox::{
    CALCULATOR_SERVER_NAME, ProductApiConfig, ReqwestUpstream, SERVER_NAME, build_registry,
    calculator_registry,
};
use agent_utils::{LogFormat, init_tracing, load_dotenv};
use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "mcp-server", version, about = "Calculator and product catalog MCP server")]
struct Args {
    /// Serve only the arithmetic tools
    #[arg(long)]
    calculator_only: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let dotenv = load_dotenv();
    let format = if args.log_json {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    init_tracing("warn", format);
    if let Some(path) = dotenv {
        info!(path = %path.display(), "Loaded environment file");
    }

    let (name, registry) = if args.calculator_only {
        (CALCULATOR_SERVER_NAME, calculator_registry())
    } else {
        let config = ProductApiConfig::from_env();
        if config.base_url().is_none() {
            warn!("S4PRODUCT_MASTER_ENDPOINT is not set; product tools will report an error");
        }
        (SERVER_NAME, build_registry(config, Arc::new(ReqwestUpstream::new())))
    };
    let registry = registry.context("Failed to register tools")?;

    info!(server = name, tools = registry.len(), "Starting MCP server");

    MCPServer::new(name, env!("CARGO_PKG_VERSION"), Arc::new(registry))
        .serve_stdio()
        .await
        .context("MCP server stopped with an error")?;

    Ok(())
}
