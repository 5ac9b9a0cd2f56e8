//! Tools backed by the product catalog

use agent_tools::{Tool, ToolError, ToolResult, parse_arguments, schema};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::envelope::QueryEnvelope;
use crate::product::{DescriptionSearch, ProductCatalog, ProductQuery};

fn to_value(envelope: &QueryEnvelope) -> ToolResult<Value> {
    serde_json::to_value(envelope).map_err(|e| ToolError::ExecutionFailed(e.to_string()))
}

/// `search_product_descriptions`
pub struct SearchDescriptionsTool {
    catalog: Arc<ProductCatalog>,
}

impl SearchDescriptionsTool {
    pub fn new(catalog: Arc<ProductCatalog>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl Tool for SearchDescriptionsTool {
    async fn execute(&self, params: Value) -> ToolResult<Value> {
        let search: DescriptionSearch = parse_arguments(params)?;
        to_value(&self.catalog.search_descriptions(&search).await)
    }

    fn name(&self) -> &str {
        "search_product_descriptions"
    }

    fn description(&self) -> &str {
        "Search products by the text of their description (their readable name).\n\n\
         Use this to find products by words like 'cat food' or 'battery'. \
         Product IDs are technical codes, so searching them for names finds \
         nothing. Returns Product ID, Language and ProductDescription for each match."
    }

    fn input_schema(&self) -> Value {
        schema::object(
            json!({
                "search_text": schema::string(Some("Text the description must contain")),
                "language": schema::with_default(
                    schema::string(Some("Language code such as EN, DE or JA")),
                    json!("EN"),
                ),
                "top": schema::with_default(
                    schema::integer(Some("Maximum number of results")),
                    json!(20),
                ),
            }),
            vec!["search_text"],
        )
    }
}

/// `query_products`
pub struct QueryProductsTool {
    catalog: Arc<ProductCatalog>,
}

impl QueryProductsTool {
    pub fn new(catalog: Arc<ProductCatalog>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl Tool for QueryProductsTool {
    async fn execute(&self, params: Value) -> ToolResult<Value> {
        let query: ProductQuery = parse_arguments(params)?;
        to_value(&self.catalog.query_products(&query).await)
    }

    fn name(&self) -> &str {
        "query_products"
    }

    fn description(&self) -> &str {
        "Query the Product entity set with OData options.\n\n\
         filter_expression filters on Product fields only (e.g. \
         \"ProductType eq 'FERT'\" or \"startswith(Product,'APJ')\"). \
         Set expand to '_ProductDescription' to include product names. \
         Call get_product_api_documentation for syntax and patterns."
    }

    fn input_schema(&self) -> Value {
        schema::object(
            json!({
                "filter_expression": schema::with_default(
                    schema::string(Some("OData $filter expression")),
                    json!(""),
                ),
                "select_fields": schema::with_default(
                    schema::string(Some("Comma-separated fields for $select")),
                    json!(""),
                ),
                "top": schema::with_default(
                    schema::integer(Some("Maximum number of records")),
                    json!(10),
                ),
                "skip": schema::with_default(
                    schema::integer(Some("Number of records to skip")),
                    json!(0),
                ),
                "orderby": schema::with_default(
                    schema::string(Some("OData $orderby expression, e.g. 'Product asc'")),
                    json!(""),
                ),
                "expand": schema::with_default(
                    schema::string(Some("Navigation properties to expand, e.g. '_ProductDescription'")),
                    json!(""),
                ),
            }),
            vec![],
        )
    }
}
