//! Core Agent trait definition

use crate::{Context, Result};
use async_trait::async_trait;

/// A conversational agent: one user message in, one final answer out
///
/// Implementations may call tools any number of times while producing the
/// answer. The `Context` identifies the conversation the turn belongs to.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Process one user turn and return the final answer text
    async fn process(&self, input: String, context: &mut Context) -> Result<String>;

    /// Get the agent's name
    fn name(&self) -> &str;
}
