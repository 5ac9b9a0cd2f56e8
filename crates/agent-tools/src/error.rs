//! Error types for tool registration and invocation

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

/// Result of invoking a tool
pub type ToolResult<T> = std::result::Result<T, ToolError>;

/// Failure category, stable across the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolErrorKind {
    UnknownOperation,
    InvalidArguments,
    DivisionByZero,
    DuplicateOperation,
    ExecutionFailed,
}

/// Errors raised by the registry or by a tool handler
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ToolError {
    /// No tool with this name is registered
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    /// Arguments are missing, mistyped, or not an object
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Divisor was exactly zero
    #[error("Cannot divide by zero")]
    DivisionByZero,

    /// A tool with this name is already registered
    #[error("Operation already registered: {0}")]
    DuplicateOperation(String),

    /// Any other handler failure
    #[error("{0}")]
    ExecutionFailed(String),
}

impl ToolError {
    /// Failure category
    pub fn kind(&self) -> ToolErrorKind {
        match self {
            Self::UnknownOperation(_) => ToolErrorKind::UnknownOperation,
            Self::InvalidArguments(_) => ToolErrorKind::InvalidArguments,
            Self::DivisionByZero => ToolErrorKind::DivisionByZero,
            Self::DuplicateOperation(_) => ToolErrorKind::DuplicateOperation,
            Self::ExecutionFailed(_) => ToolErrorKind::ExecutionFailed,
        }
    }

    fn detail(&self) -> &str {
        match self {
            Self::UnknownOperation(d)
            | Self::InvalidArguments(d)
            | Self::DuplicateOperation(d)
            | Self::ExecutionFailed(d) => d,
            Self::DivisionByZero => "",
        }
    }

    /// Structured failure descriptor sent over the wire
    ///
    /// ```
    /// use agent_tools::ToolError;
    ///
    /// let descriptor = ToolError::DivisionByZero.descriptor();
    /// assert_eq!(descriptor["kind"], "DivisionByZero");
    /// assert_eq!(descriptor["message"], "Cannot divide by zero");
    /// ```
    pub fn descriptor(&self) -> Value {
        json!({
            "kind": self.kind(),
            "message": self.to_string(),
            "detail": self.detail(),
        })
    }

    /// Rebuild an error from a descriptor produced by [`ToolError::descriptor`]
    pub fn from_descriptor(descriptor: &Value) -> Option<Self> {
        let kind: ToolErrorKind = serde_json::from_value(descriptor.get("kind")?.clone()).ok()?;
        let detail = descriptor
            .get("detail")
            .and_then(Value::as_str)
            .or_else(|| descriptor.get("message").and_then(Value::as_str))
            .unwrap_or_default()
            .to_string();

        Some(match kind {
            ToolErrorKind::UnknownOperation => Self::UnknownOperation(detail),
            ToolErrorKind::InvalidArguments => Self::InvalidArguments(detail),
            ToolErrorKind::DivisionByZero => Self::DivisionByZero,
            ToolErrorKind::DuplicateOperation => Self::DuplicateOperation(detail),
            ToolErrorKind::ExecutionFailed => Self::ExecutionFailed(detail),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            ToolError::UnknownOperation("pow".to_string()).to_string(),
            "Unknown operation: pow"
        );
        assert_eq!(ToolError::DivisionByZero.to_string(), "Cannot divide by zero");
    }

    #[test]
    fn test_descriptor_round_trip() {
        let errors = [
            ToolError::UnknownOperation("pow".to_string()),
            ToolError::InvalidArguments("missing required argument 'b'".to_string()),
            ToolError::DivisionByZero,
            ToolError::ExecutionFailed("boom".to_string()),
        ];

        for error in errors {
            let rebuilt = ToolError::from_descriptor(&error.descriptor()).unwrap();
            assert_eq!(rebuilt, error);
        }
    }

    #[test]
    fn test_from_descriptor_rejects_garbage() {
        assert!(ToolError::from_descriptor(&json!({"kind": "Nope"})).is_none());
        assert!(ToolError::from_descriptor(&json!("text")).is_none());
    }
}
