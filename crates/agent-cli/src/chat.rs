//! Interactive chat loop

use agent_core::{Agent, Context};
use agent_runtime::ExecutorEventHandler;
use async_trait::async_trait;
use serde_json::Value;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::warn;

pub const PROMPT: &str = "You: ";
pub const GOODBYE: &str = "Goodbye! 👋";

/// True for input that ends the session: empty, `quit`, `exit` or `q`
pub fn is_exit_command(line: &str) -> bool {
    let line = line.trim();
    line.is_empty() || ["quit", "exit", "q"].iter().any(|c| line.eq_ignore_ascii_case(c))
}

/// Prints tool calls and their results as a turn runs
pub struct VerbosePrinter;

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[async_trait]
impl ExecutorEventHandler for VerbosePrinter {
    async fn on_tool_start(&self, _id: &str, name: &str, input: &Value) {
        println!("  🔧 Calling tool: {name}({input})");
    }

    async fn on_tool_done(
        &self,
        _id: &str,
        _name: &str,
        result: Result<&Value, &str>,
        duration_ms: u64,
    ) {
        match result {
            Ok(value) => println!("  ✅ Result: {} ({duration_ms} ms)", render(value)),
            Err(error) => println!("  ❌ Error: {error} ({duration_ms} ms)"),
        }
    }
}

/// Read questions from `input` until EOF or an exit command, answering each
/// through `agent`
///
/// A failed turn is reported and the loop continues.
pub async fn run_chat<A, R, W>(
    agent: &A,
    context: &mut Context,
    mut input: R,
    out: &mut W,
) -> anyhow::Result<()>
where
    A: Agent + ?Sized,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;

        let mut raw = Vec::new();
        if input.read_until(b'\n', &mut raw).await? == 0 {
            writeln!(out)?;
            break;
        }

        let Ok(line) = String::from_utf8(raw) else {
            warn!("Input line is not valid UTF-8");
            writeln!(out, "\nAssistant: Sorry, I could not read that line as text.\n")?;
            continue;
        };

        if is_exit_command(&line) {
            break;
        }

        match agent.process(line.trim().to_string(), context).await {
            Ok(answer) => writeln!(out, "\nAssistant: {answer}\n")?,
            Err(e) => {
                warn!(error = %e, turn = context.turn(), "Turn failed");
                writeln!(out, "\nAssistant: Sorry, I could not answer that: {e}\n")?;
            }
        }
    }

    writeln!(out, "\n{GOODBYE}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_llm::{
        CompletionRequest, CompletionResponse, ContentBlock, LLMError, LLMProvider, Message,
        MessageContent, Role, StopReason, TokenUsage,
    };
    use agent_mcp::client::MCPClient;
    use agent_mcp::{MCPServer, MCPSession, load_mcp_tools};
    use agent_runtime::{AgentExecutor, ReactAgent};
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    /// Asks for multiply(12, 7), then answers with whatever the tool returned
    struct CalculatingProvider {
        calls: Mutex<usize>,
    }

    fn last_observation(messages: &[Message]) -> Option<String> {
        match &messages.last()?.content {
            Some(MessageContent::Blocks(blocks)) => blocks.iter().find_map(|block| match block {
                ContentBlock::ToolResult { content, .. } => Some(content.clone()),
                _ => None,
            }),
            _ => None,
        }
    }

    #[async_trait]
    impl LLMProvider for CalculatingProvider {
        async fn complete(&self, request: CompletionRequest) -> agent_llm::Result<CompletionResponse> {
            *self.calls.lock().unwrap() += 1;

            if let Some(observation) = last_observation(&request.messages) {
                return Ok(CompletionResponse {
                    message: Message::assistant(format!("12 times 7 is {observation}.")),
                    stop_reason: StopReason::EndTurn,
                    usage: TokenUsage::default(),
                });
            }

            let offers_multiply = request
                .tools
                .iter()
                .flatten()
                .any(|tool| tool.name == "multiply");
            if !offers_multiply {
                return Err(LLMError::RequestFailed("multiply not offered".to_string()));
            }

            Ok(CompletionResponse {
                message: Message {
                    role: Role::Assistant,
                    content: Some(MessageContent::Blocks(vec![ContentBlock::ToolUse {
                        id: "call_1".to_string(),
                        name: "multiply".to_string(),
                        input: json!({"a": 12, "b": 7}),
                    }])),
                },
                stop_reason: StopReason::ToolUse,
                usage: TokenUsage::default(),
            })
        }

        fn name(&self) -> &str {
            "calculating"
        }
    }

    struct Failing;

    #[async_trait]
    impl Agent for Failing {
        async fn process(&self, _input: String, _context: &mut Context) -> agent_core::Result<String> {
            Err(agent_core::Error::ProcessingFailed("boom".to_string()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    #[test]
    fn test_exit_commands() {
        for line in ["", "  \n", "quit", "EXIT", "Q\n"] {
            assert!(is_exit_command(line), "{line:?}");
        }
        assert!(!is_exit_command("what is 2 + 2?"));
        assert!(!is_exit_command("quitting"));
    }

    #[tokio::test]
    async fn test_failed_turn_keeps_session_alive() {
        let mut out = Vec::new();
        let mut context = Context::new();

        run_chat(&Failing, &mut context, &b"hello\nbye?\n"[..], &mut out)
            .await
            .unwrap();

        let transcript = String::from_utf8(out).unwrap();
        assert_eq!(transcript.matches("Sorry").count(), 2);
        assert!(transcript.ends_with(&format!("{GOODBYE}\n")));
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_is_skipped() {
        let mut out = Vec::new();
        let mut context = Context::new();

        run_chat(&Failing, &mut context, &b"\xff\xfe\nquit\n"[..], &mut out)
            .await
            .unwrap();

        let transcript = String::from_utf8(out).unwrap();
        assert!(transcript.contains("could not read that line"), "{transcript}");
        assert!(!transcript.contains("could not answer"), "{transcript}");
        assert!(transcript.ends_with(&format!("{GOODBYE}\n")));
    }

    #[tokio::test]
    async fn test_end_to_end_multiply() {
        let (client_end, server_end) = tokio::io::duplex(8192);

        let (server_read, server_write) = tokio::io::split(server_end);
        let registry = Arc::new(agent_toolbox::calculator_registry().unwrap());
        let server = MCPServer::new(agent_toolbox::CALCULATOR_SERVER_NAME, "test", registry);
        let server_task = tokio::spawn(async move { server.serve(server_read, server_write).await });

        let (client_read, client_write) = tokio::io::split(client_end);
        let client = Arc::new(MCPSession::new(client_read, client_write));
        client.connect().await.unwrap();
        let tools = load_mcp_tools(client.clone()).await.unwrap();
        assert_eq!(tools.len(), 4);

        let provider = Arc::new(CalculatingProvider {
            calls: Mutex::new(0),
        });
        let executor = AgentExecutor::builder()
            .provider(provider.clone())
            .tool_registry(Arc::new(tools))
            .build()
            .unwrap();
        let agent = ReactAgent::new(executor, "assistant").with_memory(true);

        let mut out = Vec::new();
        let mut context = Context::new();
        run_chat(&agent, &mut context, &b"what is 12 times 7?\nquit\n"[..], &mut out)
            .await
            .unwrap();

        let transcript = String::from_utf8(out).unwrap();
        assert!(transcript.contains("Assistant: 12 times 7 is 84."), "{transcript}");
        assert!(transcript.contains(GOODBYE));
        assert_eq!(*provider.calls.lock().unwrap(), 2);
        assert_eq!(context.turn(), 1);

        client.disconnect().await.unwrap();
        server_task.await.unwrap().unwrap();
    }
}
