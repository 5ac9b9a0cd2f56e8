//! LLM provider trait definition

use crate::{CompletionRequest, CompletionResponse, Result};
use async_trait::async_trait;

/// Trait for LLM providers
///
/// The executor only talks to this trait, so tests can drive the
/// conversation loop with a scripted provider.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Generate a completion for the conversation in `request`
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Provider name (e.g. "openai")
    fn name(&self) -> &str;
}
