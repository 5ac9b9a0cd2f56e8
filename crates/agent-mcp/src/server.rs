//! MCP server over line-delimited JSON-RPC
//!
//! Serves the tools of a [`ToolRegistry`]. Each line read is one message;
//! each response is written as one line. Requests are answered in arrival
//! order, notifications are never answered.

use std::sync::Arc;

use agent_tools::{ToolError, ToolRegistry};
use serde::Serialize;
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use crate::Result;
use crate::protocol::{
    JSONRPC_VERSION, JsonRpcError, JsonRpcRequest, JsonRpcResponse, PROTOCOL_VERSION, codes,
};

/// Name and version announced in the initialize response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Implementation {
    pub name: String,
    pub version: String,
}

/// MCP tool server
pub struct MCPServer {
    info: Implementation,
    registry: Arc<ToolRegistry>,
}

impl MCPServer {
    pub fn new(name: impl Into<String>, version: impl Into<String>, registry: Arc<ToolRegistry>) -> Self {
        Self {
            info: Implementation {
                name: name.into(),
                version: version.into(),
            },
            registry,
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Serve on the process's stdin/stdout until stdin is closed
    pub async fn serve_stdio(&self) -> Result<()> {
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Serve until `reader` reaches end of input
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!(
            server = %self.info.name,
            tools = self.registry.len(),
            "MCP server ready"
        );

        let mut reader = BufReader::new(reader);
        let mut frame = Vec::new();
        loop {
            frame.clear();
            if reader.read_until(b'\n', &mut frame).await? == 0 {
                break;
            }

            let response = match std::str::from_utf8(&frame) {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => self.handle_message(line.trim()).await,
                Err(e) => {
                    warn!("Message is not valid UTF-8: {e}");
                    Some(JsonRpcResponse::failure(
                        Value::Null,
                        JsonRpcError::new(codes::PARSE_ERROR, format!("Parse error: {e}")),
                    ))
                }
            };

            if let Some(response) = response {
                let mut out = serde_json::to_string(&response)?;
                out.push('\n');
                writer.write_all(out.as_bytes()).await?;
                writer.flush().await?;
            }
        }

        info!("Input closed, MCP server shutting down");
        Ok(())
    }

    /// Handle one raw message; `None` when no response is due
    pub async fn handle_message(&self, raw: &str) -> Option<JsonRpcResponse> {
        let message: Value = match serde_json::from_str(raw) {
            Ok(message) => message,
            Err(e) => {
                warn!("Unparseable message: {e}");
                return Some(JsonRpcResponse::failure(
                    Value::Null,
                    JsonRpcError::new(codes::PARSE_ERROR, format!("Parse error: {e}")),
                ));
            }
        };

        // `"id": null` still expects a response; only a missing id marks a notification
        let is_notification = message.get("id").is_none();
        let id = message.get("id").cloned().unwrap_or(Value::Null);
        let request: JsonRpcRequest = match serde_json::from_value(message) {
            Ok(request) => request,
            Err(e) => {
                return Some(JsonRpcResponse::failure(
                    id,
                    JsonRpcError::new(codes::INVALID_REQUEST, format!("Invalid request: {e}")),
                ));
            }
        };

        if request.jsonrpc != JSONRPC_VERSION {
            return Some(JsonRpcResponse::failure(
                id,
                JsonRpcError::new(codes::INVALID_REQUEST, "Invalid request: jsonrpc must be '2.0'"),
            ));
        }

        if is_notification {
            debug!(method = %request.method, "Received notification");
            return None;
        }

        let result = match request.method.as_str() {
            "initialize" => Ok(self.initialize_result()),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(self.tools_list_result()),
            "tools/call" => self.call_tool(request.params).await,
            other => Err(JsonRpcError::new(
                codes::METHOD_NOT_FOUND,
                format!("Method not found: {other}"),
            )),
        };

        Some(match result {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => JsonRpcResponse::failure(id, error),
        })
    }

    fn initialize_result(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": { "tools": { "listChanged": false } },
            "serverInfo": self.info,
        })
    }

    fn tools_list_result(&self) -> Value {
        let tools: Vec<Value> = self
            .registry
            .list_operations()
            .into_iter()
            .map(|op| {
                json!({
                    "name": op.name,
                    "description": op.description,
                    "inputSchema": op.input_schema,
                })
            })
            .collect();
        json!({ "tools": tools })
    }

    async fn call_tool(&self, params: Option<Value>) -> std::result::Result<Value, JsonRpcError> {
        let mut params = params.unwrap_or(Value::Null);
        let Some(name) = params.get("name").and_then(Value::as_str).map(str::to_string) else {
            return Err(JsonRpcError::new(
                codes::INVALID_PARAMS,
                "Invalid params: missing tool name",
            ));
        };
        let arguments = params
            .get_mut("arguments")
            .map(Value::take)
            .unwrap_or(Value::Null);

        info!(tool = %name, "Tool call");
        match self.registry.invoke(&name, arguments).await {
            Ok(value) => {
                let text = serde_json::to_string(&value).map_err(|e| {
                    JsonRpcError::new(codes::INTERNAL_ERROR, format!("Failed to encode result: {e}"))
                })?;
                let mut result = json!({
                    "content": [{ "type": "text", "text": text }],
                    "isError": false,
                });
                if value.is_object() {
                    result["structuredContent"] = value;
                }
                Ok(result)
            }
            Err(e @ (ToolError::UnknownOperation(_) | ToolError::InvalidArguments(_))) => {
                debug!(tool = %name, error = %e, "Rejected tool call");
                Err(JsonRpcError::new(codes::INVALID_PARAMS, e.to_string()).with_data(e.descriptor()))
            }
            Err(e) => {
                debug!(tool = %name, error = %e, "Tool call failed");
                Ok(json!({
                    "content": [{ "type": "text", "text": e.to_string() }],
                    "isError": true,
                    "structuredContent": { "error": e.descriptor() },
                }))
            }
        }
    }
}
