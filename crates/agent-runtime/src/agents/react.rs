//! ReAct agent implementation (wraps AgentExecutor)

use crate::executor::AgentExecutor;
use crate::session::ConversationStore;
use agent_core::{Agent, Context, Result};
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

/// An agent that answers each input with a full ReAct turn
///
/// With memory enabled the agent keeps one conversation per session id
/// (taken from the [`Context`]) and replays it on every turn. Without
/// memory every turn starts from an empty history.
///
/// # Example
///
/// ```no_run
/// use agent_core::{Agent, Context};
/// use agent_runtime::{AgentExecutor, ReactAgent};
/// # use std::sync::Arc;
///
/// # async fn example(provider: Arc<dyn agent_llm::LLMProvider>) -> agent_core::Result<()> {
/// let executor = AgentExecutor::builder().provider(provider).build()?;
/// let agent = ReactAgent::new(executor, "assistant").with_memory(true);
///
/// let mut context = Context::new();
/// let answer = agent.process("what is 12 times 7?".to_string(), &mut context).await?;
/// # Ok(())
/// # }
/// ```
pub struct ReactAgent {
    executor: AgentExecutor,
    name: String,
    memory: Option<Mutex<ConversationStore>>,
}

impl ReactAgent {
    /// Create a stateless agent
    pub fn new(executor: AgentExecutor, name: impl Into<String>) -> Self {
        Self {
            executor,
            name: name.into(),
            memory: None,
        }
    }

    /// Enable or disable conversation memory
    pub fn with_memory(mut self, enabled: bool) -> Self {
        self.memory = enabled.then(|| Mutex::new(ConversationStore::new()));
        self
    }

    pub fn has_memory(&self) -> bool {
        self.memory.is_some()
    }

    /// Get a reference to the underlying executor
    pub fn executor(&self) -> &AgentExecutor {
        &self.executor
    }

    /// Stored history of a session (empty without memory)
    pub async fn history(&self, session_id: &str) -> Vec<agent_llm::Message> {
        match &self.memory {
            Some(store) => store.lock().await.history(session_id),
            None => Vec::new(),
        }
    }
}

#[async_trait]
impl Agent for ReactAgent {
    async fn process(&self, input: String, context: &mut Context) -> Result<String> {
        let turn = context.begin_turn();
        let session_id = context.session_id().to_string();
        debug!(session = %session_id, turn, "Processing turn");

        let history = self.history(&session_id).await;
        let outcome = self.executor.run_turn(history, input).await?;

        if let Some(store) = &self.memory {
            store.lock().await.save(&session_id, outcome.messages);
        }

        Ok(outcome.answer)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::tests::{ScriptedProvider, registry, tool_call};
    use agent_llm::Message;
    use serde_json::json;
    use std::sync::Arc;

    fn agent(provider: Arc<ScriptedProvider>, memory: bool) -> ReactAgent {
        let executor = AgentExecutor::builder()
            .provider(provider)
            .tool_registry(registry())
            .build()
            .unwrap();
        ReactAgent::new(executor, "assistant").with_memory(memory)
    }

    #[tokio::test]
    async fn test_memory_carries_history() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            tool_call("call_1", "multiply", json!({"a": 12, "b": 7})),
            Message::assistant("84"),
            Message::assistant("Still 84"),
        ]));
        let agent = agent(provider.clone(), true);
        let mut context = Context::new().with_session_id("s1");

        assert_eq!(agent.process("12*7?".to_string(), &mut context).await.unwrap(), "84");
        assert_eq!(
            agent.process("and again?".to_string(), &mut context).await.unwrap(),
            "Still 84"
        );
        assert_eq!(context.turn(), 2);

        // user, tool call, observation, answer, user
        let requests = provider.requests.lock().unwrap();
        assert_eq!(requests[2].messages.len(), 5);
        drop(requests);
        assert_eq!(agent.history("s1").await.len(), 6);
        assert!(agent.history("other").await.is_empty());
    }

    #[tokio::test]
    async fn test_without_memory_each_turn_is_fresh() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Message::assistant("first"),
            Message::assistant("second"),
        ]));
        let agent = agent(provider.clone(), false);
        let mut context = Context::new();

        agent.process("one".to_string(), &mut context).await.unwrap();
        agent.process("two".to_string(), &mut context).await.unwrap();

        let requests = provider.requests.lock().unwrap();
        assert_eq!(requests[1].messages.len(), 1);
        assert!(!agent.has_memory());
        assert_eq!(agent.name(), "assistant");
    }
}
