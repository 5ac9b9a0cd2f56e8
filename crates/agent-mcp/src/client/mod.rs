//! MCP client implementations

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::Result;

pub mod session;
pub mod stdio;

pub use session::MCPSession;
pub use stdio::StdioMCPClient;

/// MCP client trait - abstracts over different transports
///
/// All methods take `&self` so a client can be shared through `Arc`;
/// implementations keep their connection state behind interior mutability.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MCPClient: Send + Sync {
    /// Open the connection and perform the initialize handshake
    async fn connect(&self) -> Result<()>;

    /// Check if client is connected
    fn is_connected(&self) -> bool;

    /// Disconnect from server
    async fn disconnect(&self) -> Result<()>;

    /// List available tools
    async fn list_tools(&self) -> Result<Vec<MCPToolDefinition>>;

    /// Call a tool
    async fn call_tool(&self, name: &str, arguments: Value) -> Result<MCPToolResult>;

    /// Get server info (from initialize response)
    async fn server_info(&self) -> Option<MCPServerInfo>;
}

/// MCP tool definition (from tools/list)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MCPToolDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// MCP tool result (from tools/call)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MCPToolResult {
    #[serde(default)]
    pub content: Vec<MCPContent>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "isError")]
    pub is_error: Option<bool>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        rename = "structuredContent"
    )]
    pub structured_content: Option<Value>,
}

impl MCPToolResult {
    /// Concatenated text of all text content blocks
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|c| match c {
                MCPContent::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// MCP content block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MCPContent {
    Text {
        text: String,
    },
    Image {
        data: String,
        #[serde(rename = "mimeType")]
        mime_type: String,
    },
    /// Content types this client does not interpret
    #[serde(other)]
    Unsupported,
}

/// MCP server info (from initialize)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MCPServerInfo {
    pub name: String,
    pub version: String,
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    pub capabilities: MCPServerCapabilities,
}

/// MCP server capabilities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MCPServerCapabilities {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<ToolsCapability>,
}

/// Tools capability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ToolsCapability {
    #[serde(default, rename = "listChanged")]
    pub list_changed: bool,
}

/// Type alias for Arc-wrapped MCP client
pub type ArcMCPClient = Arc<dyn MCPClient>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_result_parsing() {
        let raw = json!({
            "content": [
                {"type": "text", "text": "84"},
                {"type": "resource", "resource": {"uri": "file:///x"}}
            ],
            "isError": false
        });

        let result: MCPToolResult = serde_json::from_value(raw).unwrap();
        assert_eq!(result.content.len(), 2);
        assert_eq!(result.content[1], MCPContent::Unsupported);
        assert_eq!(result.text(), "84");
        assert_eq!(result.is_error, Some(false));
        assert!(result.structured_content.is_none());
    }

    #[test]
    fn test_tool_definition_parsing() {
        let raw = json!({
            "name": "add",
            "inputSchema": {"type": "object"}
        });
        let def: MCPToolDefinition = serde_json::from_value(raw).unwrap();
        assert_eq!(def.name, "add");
        assert!(def.description.is_none());
    }
}
