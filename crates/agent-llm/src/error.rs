//! Error types for LLM operations

use thiserror::Error;

/// Result type for LLM operations
pub type Result<T> = std::result::Result<T, LLMError>;

/// Failures talking to a language model
#[derive(Error, Debug)]
pub enum LLMError {
    /// Any non-specific HTTP or provider failure
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// HTTP 401
    #[error("Invalid API key or authentication failed")]
    AuthenticationFailed,

    /// HTTP 429
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// HTTP 400, usually an unsupported parameter or malformed tool schema
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Transport failure before a status was received
    #[cfg(feature = "openai")]
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Response body did not have the expected shape
    #[error("Unexpected response format: {0}")]
    UnexpectedResponse(String),

    /// Missing API key or similar setup problem
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}
