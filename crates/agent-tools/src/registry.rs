//! Tool registry for managing available tools

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::{Tool, ToolError, ToolResult, schema};

/// Public description of a registered operation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationInfo {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// Registry for managing tools
///
/// Tools are kept in registration order, which is also the order in which
/// they are advertised. The registry is filled once at startup and then
/// shared read-only (usually behind an `Arc`).
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Create a new tool registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool
    ///
    /// Fails with [`ToolError::DuplicateOperation`] if the name is taken.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> ToolResult<()> {
        let name = tool.name().to_string();
        if self.index.contains_key(&name) {
            return Err(ToolError::DuplicateOperation(name));
        }
        tracing::debug!(tool = %name, "Registering tool");
        self.index.insert(name, self.tools.len());
        self.tools.push(tool);
        Ok(())
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.index.get(name).map(|&i| Arc::clone(&self.tools[i]))
    }

    /// List all registered tools in registration order
    pub fn list_tools(&self) -> Vec<Arc<dyn Tool>> {
        self.tools.clone()
    }

    /// Describe every registered operation in registration order
    pub fn list_operations(&self) -> Vec<OperationInfo> {
        self.tools
            .iter()
            .map(|tool| OperationInfo {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                input_schema: tool.input_schema(),
            })
            .collect()
    }

    /// Validate the arguments and run the named tool
    pub async fn invoke(&self, name: &str, arguments: Value) -> ToolResult<Value> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::UnknownOperation(name.to_string()))?;

        let arguments = schema::validate_arguments(arguments, &tool.input_schema())?;

        tracing::debug!(tool = %name, "Invoking tool");
        let result = tool.execute(arguments).await;
        if let Err(e) = &result {
            tracing::debug!(tool = %name, error = %e, "Tool returned an error");
        }
        result
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.tools.iter().map(|t| t.name()).collect();
        f.debug_struct("ToolRegistry").field("tools", &names).finish()
    }
}
