//! Calculator and product-catalog tools
//!
//! This crate provides the tools exposed by the `mcp-server` binary:
//!
//! - `add`, `multiply`, `subtract`, `divide`
//! - `search_product_descriptions` and `query_products`, a read-only proxy to
//!   a product-master OData API
//! - `get_product_api_documentation`, a static guide to that API
//!
//! # Example
//!
//! ```
//! # tokio_test::block_on(async {
//! use serde_json::json;
//!
//! let registry = agent_toolbox::calculator_registry().unwrap();
//! let product = registry.invoke("multiply", json!({"a": 12, "b": 7})).await.unwrap();
//! assert_eq!(product, json!(84));
//! # });
//! ```

pub mod config;
pub mod docs;
pub mod envelope;
pub mod product;
pub mod tools;
pub mod upstream;

pub use config::ProductApiConfig;
pub use envelope::QueryEnvelope;
pub use product::ProductCatalog;
pub use upstream::{ReqwestUpstream, UpstreamClient, UpstreamError};

use agent_tools::{ToolRegistry, ToolResult};
use std::sync::Arc;

use tools::{CalculatorTool, ProductApiDocsTool, QueryProductsTool, SearchDescriptionsTool};

/// Server name announced with the full tool set
pub const SERVER_NAME: &str = "Calculator and Product Catalog Server";

/// Server name announced in calculator-only mode
pub const CALCULATOR_SERVER_NAME: &str = "Calculator Server";

/// Registry with the four arithmetic tools
pub fn calculator_registry() -> ToolResult<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    for tool in CalculatorTool::all() {
        registry.register(tool)?;
    }
    Ok(registry)
}

/// Registry with every tool, product tools going through `upstream`
pub fn build_registry(
    config: ProductApiConfig,
    upstream: Arc<dyn UpstreamClient>,
) -> ToolResult<ToolRegistry> {
    let catalog = Arc::new(ProductCatalog::new(config, upstream));

    let mut registry = calculator_registry()?;
    registry.register(Arc::new(SearchDescriptionsTool::new(Arc::clone(&catalog))))?;
    registry.register(Arc::new(ProductApiDocsTool))?;
    registry.register(Arc::new(QueryProductsTool::new(catalog)))?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::{MockUpstreamClient, UpstreamResponse};
    use agent_tools::ToolError;
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};

    fn names(registry: &ToolRegistry) -> Vec<String> {
        registry.list_operations().into_iter().map(|op| op.name).collect()
    }

    #[test]
    fn test_calculator_registry() {
        let registry = assert_ok!(calculator_registry());
        assert_eq!(names(&registry), ["add", "multiply", "subtract", "divide"]);
    }

    #[test]
    fn test_full_registry_order() {
        let registry = assert_ok!(build_registry(
            ProductApiConfig::default(),
            Arc::new(MockUpstreamClient::new())
        ));
        assert_eq!(
            names(&registry),
            [
                "add",
                "multiply",
                "subtract",
                "divide",
                "search_product_descriptions",
                "get_product_api_documentation",
                "query_products",
            ]
        );
    }

    #[tokio::test]
    async fn test_invoke_validates_arguments() {
        let registry = assert_ok!(calculator_registry());

        let error = assert_err!(registry.invoke("add", json!({"a": 1, "b": "two"})).await);
        assert!(matches!(error, ToolError::InvalidArguments(_)));

        let error = assert_err!(registry.invoke("pow", json!({"a": 1, "b": 2})).await);
        assert_eq!(error, ToolError::UnknownOperation("pow".to_string()));

        let error = assert_err!(registry.invoke("divide", json!({"a": 1, "b": 0})).await);
        assert_eq!(error, ToolError::DivisionByZero);
    }

    #[tokio::test]
    async fn test_product_tool_through_registry() {
        let mut upstream = MockUpstreamClient::new();
        upstream.expect_get().times(1).returning(|_| {
            Ok(UpstreamResponse {
                status: 200,
                body: r#"{"value":[{"Product":"A1"}],"@odata.count":5}"#.to_string(),
            })
        });
        let config = ProductApiConfig::builder()
            .endpoint("https://erp.example.com/api")
            .user("alice")
            .password("secret")
            .build();
        let registry = assert_ok!(build_registry(config, Arc::new(upstream)));

        let result = assert_ok!(
            registry
                .invoke("search_product_descriptions", json!({"search_text": "cat"}))
                .await
        );
        assert_eq!(result["success"], true);
        assert_eq!(result["count"], 1);
        assert_eq!(result["total_available"], 5);
        assert_eq!(result["search_info"]["search_text"], "cat");
    }
}
