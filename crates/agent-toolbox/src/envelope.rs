//! Uniform result shape of the proxy tools

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Normalised result of a product-catalog query
///
/// Only constructible through [`QueryEnvelope::success`] and
/// [`QueryEnvelope::failure`]: a failed envelope never carries data and
/// `count` always equals the number of records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryEnvelope {
    success: bool,
    data: Vec<Value>,
    count: usize,
    total_available: u64,
    /// Echo of the query (`search_info` / `query_used`)
    #[serde(flatten)]
    info: Map<String, Value>,
    error: Option<String>,
}

impl QueryEnvelope {
    /// Successful result; `total_available` falls back to the record count
    pub fn success(data: Vec<Value>, total_available: Option<u64>) -> Self {
        let count = data.len();
        Self {
            success: true,
            total_available: total_available.unwrap_or(count as u64),
            data,
            count,
            info: Map::new(),
            error: None,
        }
    }

    /// Failed result with an explanatory message
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: Vec::new(),
            count: 0,
            total_available: 0,
            info: Map::new(),
            error: Some(error.into()),
        }
    }

    /// Attach an informational echo of the query
    pub fn with_info(mut self, key: impl Into<String>, value: Value) -> Self {
        self.info.insert(key.into(), value);
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn data(&self) -> &[Value] {
        &self.data
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn total_available(&self) -> u64 {
        self.total_available
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn info(&self, key: &str) -> Option<&Value> {
        self.info.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_shape() {
        let envelope = QueryEnvelope::success(vec![json!({"Product": "A1"})], Some(5))
            .with_info("search_info", json!({"search_text": "cat", "language": "EN"}));

        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["count"], 1);
        assert_eq!(value["total_available"], 5);
        assert!(value["error"].is_null());
        assert_eq!(value["search_info"]["language"], "EN");
    }

    #[test]
    fn test_total_falls_back_to_count() {
        let envelope = QueryEnvelope::success(vec![json!(1), json!(2)], None);
        assert_eq!(envelope.total_available(), 2);
        assert_eq!(envelope.count(), 2);
    }

    #[test]
    fn test_failure_shape() {
        let envelope = QueryEnvelope::failure("Request timed out.");
        assert!(!envelope.is_success());
        assert!(envelope.data().is_empty());
        assert_eq!(envelope.count(), 0);
        assert_eq!(envelope.error(), Some("Request timed out."));

        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["data"], json!([]));
        assert!(value.get("search_info").is_none());
    }
}
