//! Tool trait definition

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{ToolError, ToolResult};

/// A named operation callable by the decision component
///
/// Tools are registered once and never mutated afterwards, so `execute`
/// takes `&self` and must not rely on state shared between calls.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Execute the tool
    ///
    /// `params` has already been checked against [`Tool::input_schema`] by the
    /// registry; handlers still parse it into their own typed arguments.
    async fn execute(&self, params: Value) -> ToolResult<Value>;

    /// Unique name within a [`crate::ToolRegistry`]
    fn name(&self) -> &str;

    /// Human-readable description the LLM uses to decide when to call the tool
    fn description(&self) -> &str;

    /// Input schema (JSON Schema object)
    ///
    /// # Example
    ///
    /// ```
    /// use agent_tools::schema;
    /// use serde_json::json;
    ///
    /// let schema = schema::object(
    ///     json!({
    ///         "a": schema::number(Some("First number")),
    ///         "b": schema::number(Some("Second number")),
    ///     }),
    ///     vec!["a", "b"],
    /// );
    /// assert_eq!(schema["required"][1], "b");
    /// ```
    fn input_schema(&self) -> Value;
}

/// Deserialize tool arguments into a typed struct
///
/// Serde defaults on the target type fill in optional parameters; any
/// mismatch becomes [`ToolError::InvalidArguments`].
pub fn parse_arguments<T: DeserializeOwned>(params: Value) -> ToolResult<T> {
    let params = if params.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        params
    };
    serde_json::from_value(params).map_err(|e| ToolError::InvalidArguments(e.to_string()))
}
