//! ReAct chat client for agent-rs
//!
//! Spawns the `mcp-server` binary, loads its tools and answers questions
//! with an OpenAI-compatible model.
//!
//! # Usage
//!
//! ```bash
//! export OPENAI_API_KEY="sk-..."
//! # Optional: OPENAI_API_BASE, LLM_MODEL, LLM_MAX_TOKENS, LLM_TEMPERATURE
//!
//! cargo build --bin mcp-server
//! cargo run --bin agent-cli -- --verbose
//! ```

mod chat;
mod config;

use agent_core::Context;
use agent_core::context::DEFAULT_SESSION_ID;
use agent_llm::providers::OpenAIProvider;
use agent_mcp::client::MCPClient;
use agent_mcp::{StdioMCPClient, load_mcp_tools};
use agent_runtime::{AgentExecutor, ReactAgent};
use agent_tools::ToolRegistry;
use agent_utils::{LogFormat, init_tracing, load_dotenv};
use anyhow::Context as _;
use clap::Parser;
use comfy_table::Table;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::chat::{VerbosePrinter, run_chat};
use crate::config::ClientConfig;

const SERVER_BINARY: &str = "mcp-server";

#[derive(Parser, Debug)]
#[command(name = "agent-cli", version)]
#[command(about = "Chat with a ReAct agent that uses MCP tools", long_about = None)]
struct Args {
    /// Show tool calls and their results
    #[arg(short, long)]
    verbose: bool,

    /// Path of the MCP server executable (default: mcp-server next to this binary)
    #[arg(long)]
    server: Option<PathBuf>,

    /// Extra argument passed to the server (repeatable)
    #[arg(long = "server-arg", allow_hyphen_values = true)]
    server_args: Vec<String>,

    /// Start the server with the arithmetic tools only
    #[arg(long)]
    calculator_only: bool,

    /// Forget previous turns
    #[arg(long)]
    no_memory: bool,

    /// Conversation id used for memory
    #[arg(long, default_value = DEFAULT_SESSION_ID)]
    session_id: String,

    /// Maximum LLM calls per question
    #[arg(long, default_value_t = 10)]
    max_iterations: usize,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

fn default_server_path() -> anyhow::Result<PathBuf> {
    let exe = std::env::current_exe().context("Cannot locate the agent-cli executable")?;
    Ok(exe.with_file_name(format!("{SERVER_BINARY}{}", std::env::consts::EXE_SUFFIX)))
}

fn print_tools(registry: &ToolRegistry) {
    let mut table = Table::new();
    table.set_header(vec!["Tool", "Description"]);
    for operation in registry.list_operations() {
        let summary = operation.description.lines().next().unwrap_or_default().to_string();
        table.add_row(vec![operation.name, summary]);
    }

    println!("✅ Loaded {} tools from MCP server:", registry.len());
    println!("{table}");
    println!("{}", "-".repeat(50));
}

fn print_banner(verbose: bool) {
    println!("\n🤖 React Agent Ready!");
    println!("Ask me math or product questions and I'll use the available tools.");
    if verbose {
        println!("📋 Verbose mode ON - showing tool calls");
    }
    println!("Type 'quit' or press Enter on empty line to exit.\n");
}

/// Load the server's tools and run the conversation
async fn chat(
    args: &Args,
    config: &ClientConfig,
    provider: OpenAIProvider,
    client: Arc<StdioMCPClient>,
) -> anyhow::Result<()> {
    let registry = load_mcp_tools(client)
        .await
        .context("Failed to list the server's tools")?;
    print_tools(&registry);

    let mut builder = AgentExecutor::builder()
        .provider(Arc::new(provider))
        .tool_registry(Arc::new(registry))
        .config(config.executor_config(args.max_iterations));
    if args.verbose {
        builder = builder.event_handler(Arc::new(VerbosePrinter));
    }
    let executor = builder.build().context("Failed to build the agent")?;
    let agent = ReactAgent::new(executor, "assistant").with_memory(!args.no_memory);

    info!(model = %config.model, memory = agent.has_memory(), "Agent ready");
    print_banner(args.verbose);

    let mut context = Context::new().with_session_id(args.session_id.clone());
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    run_chat(&agent, &mut context, stdin, &mut std::io::stdout()).await
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

    let config = ClientConfig::from_env().context("Invalid LLM configuration")?;
    let provider = OpenAIProvider::from_env().context("Failed to configure the LLM provider")?;

    let server = match &args.server {
        Some(path) => path.clone(),
        None => default_server_path()?,
    };
    let mut server_args = args.server_args.clone();
    if args.calculator_only {
        server_args.push("--calculator-only".to_string());
    }

    println!("🔌 Connecting to MCP server...");
    println!("{}", "-".repeat(50));

    let client = Arc::new(StdioMCPClient::new(
        server.to_string_lossy().into_owned(),
        server_args,
    ));
    client
        .connect()
        .await
        .with_context(|| format!("Failed to start MCP server `{}`", client.command_line()))?;

    if let Some(server_info) = client.server_info().await {
        info!(name = %server_info.name, version = %server_info.version, "Connected to MCP server");
    }

    let result = chat(&args, &config, provider, client.clone()).await;

    if let Err(e) = client.disconnect().await {
        warn!(error = %e, "Failed to shut down MCP server cleanly");
    }

    result
}
