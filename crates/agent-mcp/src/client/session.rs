//! JSON-RPC session over a pair of byte streams
//!
//! The session owns one reader and one writer and serialises
//! request/response pairs: a request holds the transport until its
//! response (matched by id) arrives. Server notifications and stray
//! responses received in between are skipped.

use super::*;
use crate::error::MCPError;
use crate::protocol::{JsonRpcRequest, JsonRpcResponse, PROTOCOL_VERSION};
use serde_json::json;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader,
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

type BoxedReader = Box<dyn AsyncBufRead + Send + Unpin>;
type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin>;

struct Transport {
    reader: BoxedReader,
    writer: Option<BoxedWriter>,
}

/// An MCP client session over arbitrary async streams
///
/// Used directly for in-process connections (e.g. `tokio::io::duplex`)
/// and by [`StdioMCPClient`] for child processes.
pub struct MCPSession {
    transport: Mutex<Transport>,
    next_id: AtomicU64,
    connected: AtomicBool,
    server_info: Mutex<Option<MCPServerInfo>>,
    client_name: String,
}

impl MCPSession {
    /// Create a session reading responses from `reader` and writing requests to `writer`
    pub fn new<R, W>(reader: R, writer: W) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        Self {
            transport: Mutex::new(Transport {
                reader: Box::new(BufReader::new(reader)),
                writer: Some(Box::new(writer)),
            }),
            next_id: AtomicU64::new(1),
            connected: AtomicBool::new(false),
            server_info: Mutex::new(None),
            client_name: "agent-rs".to_string(),
        }
    }

    /// Name announced in `clientInfo` during the handshake
    pub fn with_client_name(mut self, name: impl Into<String>) -> Self {
        self.client_name = name.into();
        self
    }

    /// Send a request and wait for its result
    pub async fn request(&self, method: &str, params: Value) -> Result<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = JsonRpcRequest::new(id, method, params);

        let mut transport = self.transport.lock().await;
        write_message(&mut transport, &request).await?;
        debug!(method, id, "Sent request");

        let response = read_response(&mut transport, id).await?;

        if let Some(error) = response.error {
            return Err(MCPError::Rpc {
                code: error.code,
                message: error.message,
                data: error.data,
            });
        }

        response
            .result
            .ok_or_else(|| MCPError::ProtocolError(format!("No result in response to {method}")))
    }

    /// Send a notification (no response is read)
    pub async fn notify(&self, method: &str) -> Result<()> {
        let mut transport = self.transport.lock().await;
        write_message(&mut transport, &JsonRpcRequest::notification(method)).await
    }

    /// Liveness check
    pub async fn ping(&self) -> Result<()> {
        self.request("ping", json!({})).await.map(|_| ())
    }

    async fn initialize(&self) -> Result<MCPServerInfo> {
        let params = json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {},
            "clientInfo": {
                "name": self.client_name,
                "version": env!("CARGO_PKG_VERSION"),
            }
        });

        let result = self
            .request("initialize", params)
            .await
            .map_err(|e| MCPError::InitializationFailed(e.to_string()))?;

        let capabilities: MCPServerCapabilities =
            serde_json::from_value(result["capabilities"].clone()).unwrap_or_default();

        let server_info = MCPServerInfo {
            name: result["serverInfo"]["name"]
                .as_str()
                .unwrap_or("unknown")
                .to_string(),
            version: result["serverInfo"]["version"]
                .as_str()
                .unwrap_or("unknown")
                .to_string(),
            protocol_version: result["protocolVersion"]
                .as_str()
                .unwrap_or(PROTOCOL_VERSION)
                .to_string(),
            capabilities,
        };

        if server_info.protocol_version != PROTOCOL_VERSION {
            warn!(
                server = %server_info.protocol_version,
                client = PROTOCOL_VERSION,
                "Protocol version mismatch"
            );
        }

        self.notify("notifications/initialized").await?;
        info!(
            "Connected to MCP server: {} v{}",
            server_info.name, server_info.version
        );

        Ok(server_info)
    }

    fn ensure_connected(&self) -> Result<()> {
        if self.is_connected() {
            Ok(())
        } else {
            Err(MCPError::NotConnected)
        }
    }
}

async fn write_message(transport: &mut Transport, request: &JsonRpcRequest) -> Result<()> {
    let writer = transport.writer.as_mut().ok_or(MCPError::NotConnected)?;

    let mut line = serde_json::to_string(request)?;
    line.push('\n');
    writer
        .write_all(line.as_bytes())
        .await
        .map_err(|e| MCPError::ConnectionFailed(e.to_string()))?;
    writer
        .flush()
        .await
        .map_err(|e| MCPError::ConnectionFailed(e.to_string()))
}

async fn read_response(transport: &mut Transport, id: u64) -> Result<JsonRpcResponse> {
    let mut line = String::new();
    loop {
        line.clear();
        let read = transport
            .reader
            .read_line(&mut line)
            .await
            .map_err(|e| MCPError::ConnectionFailed(e.to_string()))?;
        if read == 0 {
            return Err(MCPError::ConnectionFailed(
                "Server closed connection".to_string(),
            ));
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let message: Value = serde_json::from_str(trimmed)?;
        if message.get("method").is_some() {
            debug!(method = %message["method"], "Skipping server-initiated message");
            continue;
        }

        let response: JsonRpcResponse = serde_json::from_value(message)?;
        if response.id.as_u64() == Some(id) {
            return Ok(response);
        }
        // A null id is the server reporting an unparseable request
        if response.id.is_null() {
            if let Some(error) = response.error {
                return Err(MCPError::Rpc {
                    code: error.code,
                    message: error.message,
                    data: error.data,
                });
            }
        }
        debug!(expected = id, got = %response.id, "Skipping response with unexpected id");
    }
}

#[async_trait]
impl MCPClient for MCPSession {
    async fn connect(&self) -> Result<()> {
        let server_info = self.initialize().await?;
        *self.server_info.lock().await = Some(server_info);
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn disconnect(&self) -> Result<()> {
        debug!("Closing MCP session");
        self.connected.store(false, Ordering::SeqCst);

        let mut transport = self.transport.lock().await;
        if let Some(mut writer) = transport.writer.take() {
            // The server treats end-of-input as shutdown
            writer.shutdown().await?;
        }
        Ok(())
    }

    async fn list_tools(&self) -> Result<Vec<MCPToolDefinition>> {
        self.ensure_connected()?;

        let mut result = self.request("tools/list", json!({})).await?;
        let tools = result.get_mut("tools").map(Value::take).unwrap_or_default();
        let tools = serde_json::from_value(tools)
            .map_err(|e| MCPError::ProtocolError(format!("Failed to parse tools: {e}")))?;
        Ok(tools)
    }

    async fn call_tool(&self, name: &str, arguments: Value) -> Result<MCPToolResult> {
        self.ensure_connected()?;

        let params = json!({
            "name": name,
            "arguments": arguments,
        });
        let result = self.request("tools/call", params).await?;
        serde_json::from_value(result)
            .map_err(|e| MCPError::ProtocolError(format!("Failed to parse tool result: {e}")))
    }

    async fn server_info(&self) -> Option<MCPServerInfo> {
        self.server_info.lock().await.clone()
    }
}
