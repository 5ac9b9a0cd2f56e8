//! Agent executor for running agent loops
//!
//! The AgentExecutor implements the ReAct loop:
//! 1. Call the LLM with the conversation and the available tools
//! 2. If the reply requests tools, run the whole batch, record every
//!    observation and loop back
//! 3. Otherwise the reply text is the turn's final answer

use agent_core::Result;
use agent_llm::{
    CompletionRequest, ContentBlock, LLMProvider, Message, TokenUsage, ToolDefinition,
};
use agent_tools::ToolRegistry;
use async_trait::async_trait;
use futures::future::join_all;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Answer returned when the iteration cap is hit
pub const MAX_ITERATIONS_ANSWER: &str = "Max iterations reached without completion";

/// Event handler for agent execution events
///
/// Implement this trait to observe a turn while it runs, e.g. to print
/// tool calls in verbose mode.
#[async_trait]
pub trait ExecutorEventHandler: Send + Sync {
    /// Called when a tool execution starts
    async fn on_tool_start(&self, _id: &str, _name: &str, _input: &Value) {}

    /// Called when a tool execution completes
    async fn on_tool_done(
        &self,
        _id: &str,
        _name: &str,
        _result: std::result::Result<&Value, &str>,
        _duration_ms: u64,
    ) {
    }

    /// Called with the final answer of a turn
    async fn on_complete(&self, _result: &str) {}
}

/// No-op event handler for when events are not needed
pub struct NoOpEventHandler;

#[async_trait]
impl ExecutorEventHandler for NoOpEventHandler {}

/// Configuration for agent execution
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Maximum number of LLM calls per turn (prevents infinite loops)
    pub max_iterations: usize,

    pub model: String,

    pub system_prompt: Option<String>,

    /// Max tokens per completion
    pub max_tokens: usize,

    pub temperature: Option<f32>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            model: "gpt-4.1".to_string(),
            system_prompt: None,
            max_tokens: 5000,
            temperature: Some(0.1),
        }
    }
}

/// Result of one conversational turn
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// Final answer text
    pub answer: String,

    /// The whole conversation including this turn
    pub messages: Vec<Message>,

    /// Number of LLM calls made
    pub iterations: usize,

    /// Tokens used across all LLM calls of the turn
    pub usage: TokenUsage,
}

/// Executes an agent loop: LLM → tool calls → execution → loop back
pub struct AgentExecutor {
    provider: Arc<dyn LLMProvider>,
    tool_registry: Arc<ToolRegistry>,
    config: ExecutorConfig,
    event_handler: Arc<dyn ExecutorEventHandler>,
}

impl AgentExecutor {
    /// Create a new agent executor
    pub fn new(
        provider: Arc<dyn LLMProvider>,
        tool_registry: Arc<ToolRegistry>,
        config: ExecutorConfig,
    ) -> Self {
        Self {
            provider,
            tool_registry,
            config,
            event_handler: Arc::new(NoOpEventHandler),
        }
    }

    /// Start building an executor
    pub fn builder() -> AgentExecutorBuilder {
        AgentExecutorBuilder::new()
    }

    /// Set the event handler for receiving execution events
    pub fn with_event_handler(mut self, handler: Arc<dyn ExecutorEventHandler>) -> Self {
        self.event_handler = handler;
        self
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    pub fn tool_registry(&self) -> &ToolRegistry {
        &self.tool_registry
    }

    /// Run a single turn without prior history
    pub async fn run(&self, user_message: impl Into<String>) -> Result<String> {
        self.run_turn(Vec::new(), user_message)
            .await
            .map(|outcome| outcome.answer)
    }

    /// Run one turn on top of `history`
    pub async fn run_turn(
        &self,
        history: Vec<Message>,
        user_message: impl Into<String>,
    ) -> Result<TurnOutcome> {
        let mut conversation = history;
        conversation.push(Message::user(user_message));
        let tools = self.build_tool_definitions();
        let mut usage = TokenUsage::default();

        for iteration in 1..=self.config.max_iterations {
            info!(
                iteration,
                max_iterations = self.config.max_iterations,
                model = %self.config.model,
                tool_count = tools.len(),
                "Sending request to LLM"
            );

            let mut builder = CompletionRequest::builder(&self.config.model)
                .messages(conversation.clone())
                .max_tokens(self.config.max_tokens)
                .tools(tools.clone());
            if let Some(system) = &self.config.system_prompt {
                builder = builder.system(system);
            }
            if let Some(temperature) = self.config.temperature {
                builder = builder.temperature(temperature);
            }

            let response = self
                .provider
                .complete(builder.build())
                .await
                .map_err(|e| agent_core::Error::DecisionFailed(e.to_string()))?;

            info!(
                stop_reason = ?response.stop_reason,
                input_tokens = response.usage.input_tokens,
                output_tokens = response.usage.output_tokens,
                "LLM response received"
            );
            usage += response.usage;

            let message = response.message;
            let has_tool_calls = message.has_tool_calls();
            conversation.push(message);

            if !has_tool_calls {
                let answer = conversation
                    .last()
                    .and_then(Message::text)
                    .unwrap_or_default();
                debug!(
                    iteration,
                    total_tokens = usage.total(),
                    answer_length = answer.len(),
                    "Turn completed"
                );
                self.event_handler.on_complete(&answer).await;
                return Ok(TurnOutcome {
                    answer,
                    messages: conversation,
                    iterations: iteration,
                    usage,
                });
            }

            let observations = match conversation.last() {
                Some(message) => self.execute_tools(message).await,
                None => Vec::new(),
            };
            conversation.push(Message::tool_results(observations));
        }

        warn!(
            max_iterations = self.config.max_iterations,
            "Max iterations reached, stopping"
        );
        let answer = MAX_ITERATIONS_ANSWER.to_string();
        self.event_handler.on_complete(&answer).await;
        conversation.push(Message::assistant(answer.clone()));
        Ok(TurnOutcome {
            answer,
            messages: conversation,
            iterations: self.config.max_iterations,
            usage,
        })
    }

    /// Build tool definitions from the registry, in registration order
    fn build_tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tool_registry
            .list_operations()
            .into_iter()
            .map(|op| ToolDefinition::new(op.name, op.description, op.input_schema))
            .collect()
    }

    /// Run every tool call of an assistant message concurrently
    ///
    /// Observations come back in request order. Failures are reported to the
    /// model as error observations so it can retry with other arguments.
    async fn execute_tools(&self, message: &Message) -> Vec<ContentBlock> {
        let calls = message.tool_calls();
        info!(tool_count = calls.len(), "Agent requested tool use");

        let runs = calls.into_iter().map(|call| async move {
            self.event_handler
                .on_tool_start(call.id, call.name, call.input)
                .await;

            let start_time = Instant::now();
            let result = self
                .tool_registry
                .invoke(call.name, call.input.clone())
                .await;
            let duration_ms = start_time.elapsed().as_millis() as u64;

            match result {
                Ok(value) => {
                    let text = match &value {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    info!(tool_name = %call.name, duration_ms, "Tool execution succeeded");
                    self.event_handler
                        .on_tool_done(call.id, call.name, Ok(&value), duration_ms)
                        .await;
                    ContentBlock::tool_result(call.id, text)
                }
                Err(e) => {
                    let error = format!("Error: {e}");
                    warn!(tool_name = %call.name, duration_ms, error = %e, "Tool execution failed");
                    self.event_handler
                        .on_tool_done(call.id, call.name, Err(&error), duration_ms)
                        .await;
                    ContentBlock::tool_error(call.id, error)
                }
            }
        });

        join_all(runs).await
    }
}

/// Builder for AgentExecutor
pub struct AgentExecutorBuilder {
    provider: Option<Arc<dyn LLMProvider>>,
    tool_registry: Arc<ToolRegistry>,
    config: ExecutorConfig,
    event_handler: Option<Arc<dyn ExecutorEventHandler>>,
}

impl AgentExecutorBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            provider: None,
            tool_registry: Arc::new(ToolRegistry::new()),
            config: ExecutorConfig::default(),
            event_handler: None,
        }
    }

    /// Set the LLM provider
    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the tool registry
    pub fn tool_registry(mut self, registry: Arc<ToolRegistry>) -> Self {
        self.tool_registry = registry;
        self
    }

    /// Set the full configuration
    pub fn config(mut self, config: ExecutorConfig) -> Self {
        self.config = config;
        self
    }

    /// Set maximum iterations
    pub fn max_iterations(mut self, max: usize) -> Self {
        self.config.max_iterations = max;
        self
    }

    /// Set the model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set the system prompt
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    /// Set the event handler
    pub fn event_handler(mut self, handler: Arc<dyn ExecutorEventHandler>) -> Self {
        self.event_handler = Some(handler);
        self
    }

    /// Build the executor
    pub fn build(self) -> Result<AgentExecutor> {
        let provider = self.provider.ok_or_else(|| {
            agent_core::Error::InitializationFailed("Provider not set".to_string())
        })?;

        let executor = AgentExecutor::new(provider, self.tool_registry, self.config);
        Ok(match self.event_handler {
            Some(handler) => executor.with_event_handler(handler),
            None => executor,
        })
    }
}

impl Default for AgentExecutorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
