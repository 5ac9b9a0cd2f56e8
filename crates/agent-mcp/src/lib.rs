//! Model Context Protocol (MCP) integration for agent-rs
//!
//! - [`client`]: connect to an MCP server over stdio (or any byte stream)
//!   and call its tools
//! - [`server`]: serve a [`agent_tools::ToolRegistry`] over stdio
//! - [`MCPTool`]: expose a remote tool through the local `Tool` trait
//!
//! # Example
//!
//! ```no_run
//! use agent_mcp::client::{MCPClient, StdioMCPClient};
//! use agent_mcp::load_mcp_tools;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Arc::new(StdioMCPClient::new("mcp-server", vec![]));
//! client.connect().await?;
//!
//! let tools = load_mcp_tools(client.clone()).await?;
//! println!("Discovered {} tools", tools.len());
//!
//! client.disconnect().await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod protocol;
pub mod server;
pub mod tool;

pub use client::{MCPClient, MCPSession, StdioMCPClient};
pub use error::MCPError;
pub use server::MCPServer;
pub use tool::{MCPTool, load_mcp_tools};

/// Result type for MCP operations
pub type Result<T> = std::result::Result<T, MCPError>;
