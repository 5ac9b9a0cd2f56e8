//! MCPTool wrapper that implements the Tool trait

use agent_tools::{Tool, ToolError, ToolRegistry, ToolResult};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::client::{MCPClient, MCPToolDefinition, MCPToolResult};
use crate::error::MCPError;

/// Wrapper that implements agent-tools::Tool for a remote MCP tool
///
/// Execution is delegated to the server through the shared client. Remote
/// failure descriptors are turned back into the matching [`ToolError`], so
/// callers see the same error taxonomy as with local tools.
pub struct MCPTool {
    definition: MCPToolDefinition,
    client: Arc<dyn MCPClient>,
}

impl MCPTool {
    pub fn new(definition: MCPToolDefinition, client: Arc<dyn MCPClient>) -> Self {
        Self { definition, client }
    }

    /// Convert an MCP tool result to a tool value
    ///
    /// Text content holding JSON is decoded, other text is kept as a string.
    fn convert_result(result: MCPToolResult) -> ToolResult<Value> {
        let text = result.text();

        if result.is_error.unwrap_or(false) {
            let descriptor = result
                .structured_content
                .as_ref()
                .and_then(|content| content.get("error"));
            return Err(descriptor
                .and_then(ToolError::from_descriptor)
                .unwrap_or(ToolError::ExecutionFailed(text)));
        }

        if text.is_empty() {
            return Ok(result.structured_content.unwrap_or(Value::Null));
        }

        Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
    }
}

impl From<MCPError> for ToolError {
    fn from(err: MCPError) -> Self {
        if let MCPError::Rpc {
            data: Some(data), ..
        } = &err
        {
            if let Some(tool_error) = ToolError::from_descriptor(data) {
                return tool_error;
            }
        }
        ToolError::ExecutionFailed(format!("MCP tool call failed: {err}"))
    }
}

#[async_trait]
impl Tool for MCPTool {
    async fn execute(&self, params: Value) -> ToolResult<Value> {
        let result = self
            .client
            .call_tool(&self.definition.name, params)
            .await?;
        Self::convert_result(result)
    }

    fn name(&self) -> &str {
        &self.definition.name
    }

    fn description(&self) -> &str {
        self.definition
            .description
            .as_deref()
            .unwrap_or("No description available")
    }

    fn input_schema(&self) -> Value {
        self.definition.input_schema.clone()
    }
}

/// Discover the server's tools and wrap them in a registry
///
/// Tools keep the order the server lists them in.
pub async fn load_mcp_tools(client: Arc<dyn MCPClient>) -> crate::Result<ToolRegistry> {
    let definitions = client.list_tools().await?;
    let mut registry = ToolRegistry::new();

    for definition in definitions {
        tracing::debug!(tool = %definition.name, "Discovered MCP tool");
        registry
            .register(Arc::new(MCPTool::new(definition, Arc::clone(&client))))
            .map_err(|e| MCPError::ProtocolError(e.to_string()))?;
    }

    Ok(registry)
}
