use agent_tools::{Tool, ToolResult, schema};
use async_trait::async_trait;
use serde_json::{Value, json};

use crate::docs::product_api_documentation;

/// Returns the product API reference guide
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductApiDocsTool;

#[async_trait]
impl Tool for ProductApiDocsTool {
    async fn execute(&self, _params: Value) -> ToolResult<Value> {
        Ok(Value::String(product_api_documentation()))
    }

    fn name(&self) -> &str {
        "get_product_api_documentation"
    }

    fn description(&self) -> &str {
        "Get the reference guide for the product master API.\n\n\
         Explains the difference between product IDs and descriptions, the \
         supported OData query options and useful query patterns. Read it \
         before building filters for query_products."
    }

    fn input_schema(&self) -> Value {
        schema::object(json!({}), vec![])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_returns_documentation() {
        let result = ProductApiDocsTool.execute(Value::Null).await.unwrap();
        assert_eq!(result.as_str(), Some(product_api_documentation().as_str()));
    }
}
