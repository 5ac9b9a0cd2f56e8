//! Agent runtime for agent-rs
//!
//! Provides the [`AgentExecutor`] (the ReAct loop over an LLM provider and a
//! tool registry), the [`ReactAgent`] that runs one executor turn per input
//! with optional per-session memory, and the in-memory
//! [`ConversationStore`].

pub mod agents;
pub mod executor;
pub mod session;

pub use agents::ReactAgent;
pub use executor::{
    AgentExecutor, AgentExecutorBuilder, ExecutorConfig, ExecutorEventHandler, NoOpEventHandler,
    TurnOutcome,
};
pub use session::ConversationStore;
