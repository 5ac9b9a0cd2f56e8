//! LLM provider abstraction layer for agent-rs
//!
//! - Message types for LLM communication (text, tool use, tool results)
//! - Completion request/response types
//! - Tool definitions for function calling
//! - Provider trait, with an OpenAI-compatible implementation behind the
//!   `openai` feature

pub mod completion;
pub mod error;
pub mod messages;
pub mod provider;
pub mod tools;

pub use completion::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};
pub use error::{LLMError, Result};
pub use messages::{ContentBlock, Message, MessageContent, Role};
pub use provider::LLMProvider;
pub use tools::ToolDefinition;

#[cfg(feature = "openai")]
pub mod providers;
