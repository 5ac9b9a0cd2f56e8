//! Product-master OData proxy
//!
//! Every call ends in a [`QueryEnvelope`]; configuration gaps, HTTP errors
//! and transport failures are reported inside it rather than returned as
//! `Err`.

use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{info, warn};
use url::Url;

use crate::config::{ENDPOINT_VAR, PASSWORD_VAR, ProductApiConfig, USER_VAR};
use crate::envelope::QueryEnvelope;
use crate::upstream::{UpstreamClient, UpstreamError, UpstreamRequest};

const DESCRIPTION_ENTITY: &str = "ProductDescription";
const PRODUCT_ENTITY: &str = "Product";
const DESCRIPTION_FIELDS: &str = "Product,Language,ProductDescription";
const ERROR_BODY_LIMIT: usize = 500;

const SEARCH_TIMEOUT_MESSAGE: &str = "Request timed out.";
const QUERY_TIMEOUT_MESSAGE: &str =
    "Request timed out. Try reducing $top or simplifying the filter.";

fn default_language() -> String {
    "EN".to_string()
}

fn default_search_top() -> u32 {
    20
}

fn default_query_top() -> u32 {
    10
}

/// Arguments of `search_product_descriptions`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DescriptionSearch {
    pub search_text: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_search_top")]
    pub top: u32,
}

/// Arguments of `query_products`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProductQuery {
    #[serde(default)]
    pub filter_expression: String,
    #[serde(default)]
    pub select_fields: String,
    #[serde(default = "default_query_top")]
    pub top: u32,
    #[serde(default)]
    pub skip: u32,
    #[serde(default)]
    pub orderby: String,
    #[serde(default)]
    pub expand: String,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            filter_expression: String::new(),
            select_fields: String::new(),
            top: default_query_top(),
            skip: 0,
            orderby: String::new(),
            expand: String::new(),
        }
    }
}

/// OData filter matching descriptions that contain `search_text`
///
/// ```
/// use agent_toolbox::product::description_filter;
///
/// assert_eq!(
///     description_filter("O'Brien", "de"),
///     "contains(ProductDescription,'O''Brien') and Language eq 'DE'"
/// );
/// ```
pub fn description_filter(search_text: &str, language: &str) -> String {
    format!(
        "contains(ProductDescription,'{}') and Language eq '{}'",
        search_text.replace('\'', "''"),
        language.to_uppercase()
    )
}

fn non_empty(value: &str) -> Option<&str> {
    Some(value).filter(|v| !v.is_empty())
}

/// Client for the product-master entity sets
pub struct ProductCatalog {
    config: ProductApiConfig,
    upstream: Arc<dyn UpstreamClient>,
}

impl ProductCatalog {
    pub fn new(config: ProductApiConfig, upstream: Arc<dyn UpstreamClient>) -> Self {
        Self { config, upstream }
    }

    pub fn config(&self) -> &ProductApiConfig {
        &self.config
    }

    /// Search product descriptions by text and language
    pub async fn search_descriptions(&self, search: &DescriptionSearch) -> QueryEnvelope {
        let filter = description_filter(&search.search_text, &search.language);
        let top = search.top.to_string();
        let params = [
            ("$filter", filter.as_str()),
            ("$select", DESCRIPTION_FIELDS),
            ("$top", top.as_str()),
            ("$count", "true"),
        ];

        let info = json!({
            "search_text": search.search_text,
            "language": search.language.to_uppercase(),
        });

        let envelope = self
            .fetch(DESCRIPTION_ENTITY, &params, SEARCH_TIMEOUT_MESSAGE)
            .await;
        echo(envelope, "search_info", info)
    }

    /// Query the product entity set with caller-supplied OData options
    pub async fn query_products(&self, query: &ProductQuery) -> QueryEnvelope {
        let top = query.top.to_string();
        let skip = query.skip.to_string();

        let mut params: Vec<(&str, &str)> = Vec::new();
        if let Some(filter) = non_empty(&query.filter_expression) {
            params.push(("$filter", filter));
        }
        if let Some(select) = non_empty(&query.select_fields) {
            params.push(("$select", select));
        }
        if query.top != 0 {
            params.push(("$top", top.as_str()));
        }
        if query.skip != 0 {
            params.push(("$skip", skip.as_str()));
        }
        if let Some(orderby) = non_empty(&query.orderby) {
            params.push(("$orderby", orderby));
        }
        if let Some(expand) = non_empty(&query.expand) {
            params.push(("$expand", expand));
        }
        params.push(("$count", "true"));

        let info = json!({
            "filter": non_empty(&query.filter_expression).unwrap_or("(none)"),
            "select": non_empty(&query.select_fields).unwrap_or("(all fields)"),
            "top": query.top,
            "skip": query.skip,
        });

        let envelope = self.fetch(PRODUCT_ENTITY, &params, QUERY_TIMEOUT_MESSAGE).await;
        echo(envelope, "query_used", info)
    }

    async fn fetch(
        &self,
        entity: &str,
        params: &[(&str, &str)],
        timeout_message: &str,
    ) -> QueryEnvelope {
        let Some(base_url) = self.config.base_url() else {
            warn!("Product API endpoint is not configured");
            return QueryEnvelope::failure(format!("{ENDPOINT_VAR} not configured"));
        };
        let Some((username, password)) = self.config.credentials() else {
            warn!("Product API credentials are not configured");
            return QueryEnvelope::failure(format!("{USER_VAR} or {PASSWORD_VAR} not configured"));
        };

        let mut url = match Url::parse(&format!("{base_url}/{entity}")) {
            Ok(url) => url,
            Err(e) => return QueryEnvelope::failure(format!("Request failed: {e}")),
        };
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in params {
                query.append_pair(key, value);
            }
        }

        let request = UpstreamRequest {
            url,
            username: username.to_string(),
            password: password.to_string(),
            timeout: self.config.request_timeout,
        };

        let response = match self.upstream.get(request).await {
            Ok(response) => response,
            Err(UpstreamError::Timeout) => {
                warn!(entity, "Product API request timed out");
                return QueryEnvelope::failure(timeout_message);
            }
            Err(UpstreamError::Transport(message)) => {
                warn!(entity, error = %message, "Product API request failed");
                return QueryEnvelope::failure(format!("Request failed: {message}"));
            }
        };

        info!(entity, status = response.status, "Product API responded");

        if response.status != 200 {
            let excerpt: String = response.body.chars().take(ERROR_BODY_LIMIT).collect();
            return QueryEnvelope::failure(format!(
                "API returned status {}: {excerpt}",
                response.status
            ));
        }

        match serde_json::from_str::<Value>(&response.body) {
            Ok(mut body) => {
                let data = match body.get_mut("value").map(Value::take) {
                    Some(Value::Array(records)) => records,
                    _ => Vec::new(),
                };
                let total = body.get("@odata.count").and_then(Value::as_u64);
                QueryEnvelope::success(data, total)
            }
            Err(e) => QueryEnvelope::failure(format!("Request failed: {e}")),
        }
    }
}

/// Success envelopes echo the query; failures stay minimal
fn echo(envelope: QueryEnvelope, key: &str, value: Value) -> QueryEnvelope {
    if envelope.is_success() {
        envelope.with_info(key, value)
    } else {
        envelope
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::{MockUpstreamClient, UpstreamResponse};
    use std::collections::HashMap;
    use std::time::Duration;

    fn configured() -> ProductApiConfig {
        ProductApiConfig::builder()
            .endpoint("https://erp.example.com/odata/product/")
            .user("alice")
            .password("secret")
            .build()
    }

    fn catalog(config: ProductApiConfig, upstream: MockUpstreamClient) -> ProductCatalog {
        ProductCatalog::new(config, Arc::new(upstream))
    }

    fn query_map(url: &Url) -> HashMap<String, String> {
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    fn search(text: &str) -> DescriptionSearch {
        DescriptionSearch {
            search_text: text.to_string(),
            language: default_language(),
            top: default_search_top(),
        }
    }

    fn respond(status: u16, body: &str) -> MockUpstreamClient {
        let body = body.to_string();
        let mut upstream = MockUpstreamClient::new();
        upstream
            .expect_get()
            .times(1)
            .returning(move |_| Ok(UpstreamResponse { status, body: body.clone() }));
        upstream
    }

    fn assert_envelope_invariant(envelope: &QueryEnvelope) {
        assert_eq!(envelope.count(), envelope.data().len());
        if !envelope.is_success() {
            assert!(envelope.data().is_empty());
            assert!(envelope.error().is_some());
        }
    }

    #[test]
    fn test_description_filter_escapes_quotes() {
        assert_eq!(
            description_filter("O'Brien's", "en"),
            "contains(ProductDescription,'O''Brien''s') and Language eq 'EN'"
        );
    }

    #[tokio::test]
    async fn test_missing_endpoint_skips_upstream() {
        let mut upstream = MockUpstreamClient::new();
        upstream.expect_get().times(0);
        let config = ProductApiConfig::builder().user("a").password("b").build();

        let envelope = catalog(config, upstream).search_descriptions(&search("bike")).await;

        assert!(!envelope.is_success());
        assert_eq!(envelope.error(), Some("S4PRODUCT_MASTER_ENDPOINT not configured"));
        assert_envelope_invariant(&envelope);
    }

    #[tokio::test]
    async fn test_missing_credentials_skips_upstream() {
        let mut upstream = MockUpstreamClient::new();
        upstream.expect_get().times(0);
        let config = ProductApiConfig::builder()
            .endpoint("https://erp.example.com/api")
            .user("alice")
            .build();

        let envelope = catalog(config, upstream)
            .query_products(&ProductQuery::default())
            .await;

        assert_eq!(
            envelope.error(),
            Some("S4HANA_USER or S4HANA_PASSWORD not configured")
        );
        assert_envelope_invariant(&envelope);
    }

    #[tokio::test]
    async fn test_search_success() {
        let upstream = respond(200, r#"{"value":[{"Product":"A1"}],"@odata.count":5}"#);

        let envelope = catalog(configured(), upstream)
            .search_descriptions(&search("bike"))
            .await;

        assert!(envelope.is_success());
        assert_eq!(envelope.count(), 1);
        assert_eq!(envelope.total_available(), 5);
        assert_eq!(envelope.data()[0]["Product"], "A1");
        assert!(envelope.error().is_none());
        assert_eq!(envelope.info("search_info").unwrap()["language"], "EN");
        assert_envelope_invariant(&envelope);
    }

    #[tokio::test]
    async fn test_missing_value_yields_empty_data() {
        let upstream = respond(200, "{}");

        let envelope = catalog(configured(), upstream)
            .query_products(&ProductQuery::default())
            .await;

        assert!(envelope.is_success());
        assert!(envelope.data().is_empty());
        assert_eq!(envelope.total_available(), 0);
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let upstream = respond(404, "not found");

        let envelope = catalog(configured(), upstream)
            .search_descriptions(&search("bike"))
            .await;

        let error = envelope.error().unwrap();
        assert!(error.contains("404"));
        assert!(error.contains("not found"));
        assert!(envelope.info("search_info").is_none());
        assert_envelope_invariant(&envelope);
    }

    #[tokio::test]
    async fn test_error_body_is_truncated() {
        let body = "x".repeat(2000);
        let upstream = respond(500, &body);

        let envelope = catalog(configured(), upstream)
            .query_products(&ProductQuery::default())
            .await;

        let expected = format!("API returned status 500: {}", "x".repeat(500));
        assert_eq!(envelope.error(), Some(expected.as_str()));
    }

    #[tokio::test]
    async fn test_timeouts() {
        let mut upstream = MockUpstreamClient::new();
        upstream
            .expect_get()
            .times(2)
            .returning(|_| Err(UpstreamError::Timeout));
        let catalog = catalog(configured(), upstream);

        let envelope = catalog.search_descriptions(&search("bike")).await;
        assert_eq!(envelope.error(), Some("Request timed out."));

        let envelope = catalog.query_products(&ProductQuery::default()).await;
        assert_eq!(
            envelope.error(),
            Some("Request timed out. Try reducing $top or simplifying the filter.")
        );
    }

    #[tokio::test]
    async fn test_transport_and_parse_failures() {
        let mut upstream = MockUpstreamClient::new();
        upstream
            .expect_get()
            .times(1)
            .returning(|_| Err(UpstreamError::Transport("connection refused".to_string())));

        let envelope = catalog(configured(), upstream)
            .search_descriptions(&search("bike"))
            .await;
        assert_eq!(envelope.error(), Some("Request failed: connection refused"));

        let envelope = catalog(configured(), respond(200, "<html>"))
            .search_descriptions(&search("bike"))
            .await;
        assert!(envelope.error().unwrap().starts_with("Request failed: "));
        assert_envelope_invariant(&envelope);
    }

    #[tokio::test]
    async fn test_search_request_shape() {
        let mut upstream = MockUpstreamClient::new();
        upstream
            .expect_get()
            .withf(|request| {
                let query = query_map(&request.url);
                request.url.path() == "/odata/product/ProductDescription"
                    && request.username == "alice"
                    && request.password == "secret"
                    && request.timeout == Duration::from_secs(30)
                    && query["$filter"]
                        == "contains(ProductDescription,'O''Brien''s') and Language eq 'DE'"
                    && query["$select"] == "Product,Language,ProductDescription"
                    && query["$top"] == "5"
                    && query["$count"] == "true"
            })
            .times(1)
            .returning(|_| {
                Ok(UpstreamResponse {
                    status: 200,
                    body: r#"{"value":[]}"#.to_string(),
                })
            });

        let request = DescriptionSearch {
            search_text: "O'Brien's".to_string(),
            language: "de".to_string(),
            top: 5,
        };
        let envelope = catalog(configured(), upstream).search_descriptions(&request).await;
        assert!(envelope.is_success());
    }

    #[tokio::test]
    async fn test_query_request_shape() {
        let mut upstream = MockUpstreamClient::new();
        upstream
            .expect_get()
            .withf(|request| {
                let query = query_map(&request.url);
                request.url.path() == "/odata/product/Product"
                    && query["$filter"] == "ProductType eq 'FERT'"
                    && query["$orderby"] == "Product desc"
                    && query["$count"] == "true"
                    && !query.contains_key("$top")
                    && !query.contains_key("$skip")
                    && !query.contains_key("$select")
                    && !query.contains_key("$expand")
            })
            .times(1)
            .returning(|_| {
                Ok(UpstreamResponse {
                    status: 200,
                    body: r#"{"value":[{"Product":"P1"},{"Product":"P2"}]}"#.to_string(),
                })
            });

        let query = ProductQuery {
            filter_expression: "ProductType eq 'FERT'".to_string(),
            top: 0,
            orderby: "Product desc".to_string(),
            ..ProductQuery::default()
        };
        let envelope = catalog(configured(), upstream).query_products(&query).await;

        assert_eq!(envelope.count(), 2);
        assert_eq!(envelope.total_available(), 2);
        let echo = envelope.info("query_used").unwrap();
        assert_eq!(echo["filter"], "ProductType eq 'FERT'");
        assert_eq!(echo["select"], "(all fields)");
    }
}
