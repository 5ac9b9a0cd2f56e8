//! Error types for MCP operations

use serde_json::Value;
use thiserror::Error;

/// Errors that can occur during MCP operations
#[derive(Error, Debug)]
pub enum MCPError {
    /// MCP connection failed
    #[error("MCP connection failed: {0}")]
    ConnectionFailed(String),

    /// MCP initialization failed
    #[error("MCP initialization failed: {0}")]
    InitializationFailed(String),

    /// Not connected to MCP server
    #[error("Not connected to MCP server")]
    NotConnected,

    /// The peer answered with a JSON-RPC error
    #[error("JSON-RPC error {code}: {message}")]
    Rpc {
        code: i64,
        message: String,
        data: Option<Value>,
    },

    /// The peer sent something that is not valid MCP
    #[error("Protocol error: {0}")]
    ProtocolError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Convert MCPError to agent_core::Error
impl From<MCPError> for agent_core::Error {
    fn from(err: MCPError) -> Self {
        match err {
            MCPError::ConnectionFailed(_)
            | MCPError::InitializationFailed(_)
            | MCPError::NotConnected
            | MCPError::IoError(_) => agent_core::Error::ConnectionFailed(err.to_string()),
            _ => agent_core::Error::ProcessingFailed(err.to_string()),
        }
    }
}
