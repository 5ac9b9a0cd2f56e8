//! Stdio transport MCP client
//!
//! Communicates with an MCP server via standard input/output by spawning
//! the server as a child process.

use super::*;
use crate::error::MCPError;
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// How long a child gets to exit on its own after its stdin is closed
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// MCP client using stdio transport
///
/// The child's stdin/stdout carry the JSON-RPC session; its stderr is
/// inherited so server logs stay visible. The child is killed when the
/// client is dropped without an explicit [`MCPClient::disconnect`].
pub struct StdioMCPClient {
    command: String,
    args: Vec<String>,
    env: HashMap<String, String>,
    cwd: Option<PathBuf>,

    /// Child process handle
    child: Arc<Mutex<Option<Child>>>,

    /// Session over the child's pipes, present while connected
    session: Mutex<Option<Arc<MCPSession>>>,
}

impl StdioMCPClient {
    /// Create a new stdio MCP client for `command args...`
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
            env: HashMap::new(),
            cwd: None,
            child: Arc::new(Mutex::new(None)),
            session: Mutex::new(None),
        }
    }

    /// Set an extra environment variable for the child
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Set the child's working directory
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Command line this client spawns
    pub fn command_line(&self) -> String {
        std::iter::once(self.command.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    async fn session(&self) -> Result<Arc<MCPSession>> {
        self.session
            .lock()
            .await
            .as_ref()
            .map(Arc::clone)
            .ok_or(MCPError::NotConnected)
    }
}

#[async_trait]
impl MCPClient for StdioMCPClient {
    async fn connect(&self) -> Result<()> {
        debug!("Starting MCP server: {}", self.command_line());

        let mut command = Command::new(&self.command);
        command
            .args(&self.args)
            .envs(&self.env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        if let Some(cwd) = &self.cwd {
            command.current_dir(cwd);
        }

        let mut child = command.spawn().map_err(|e| {
            MCPError::ConnectionFailed(format!("Failed to spawn '{}': {e}", self.command))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| MCPError::ConnectionFailed("Failed to get stdin".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| MCPError::ConnectionFailed("Failed to get stdout".to_string()))?;

        *self.child.lock().await = Some(child);

        let session = Arc::new(MCPSession::new(stdout, stdin));
        session.connect().await?;
        *self.session.lock().await = Some(session);

        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.session
            .try_lock()
            .map(|guard| guard.as_ref().is_some_and(|s| s.is_connected()))
            .unwrap_or(false)
    }

    async fn disconnect(&self) -> Result<()> {
        debug!("Disconnecting from MCP server");

        if let Some(session) = self.session.lock().await.take() {
            if let Err(e) = session.disconnect().await {
                debug!("Error closing session: {e}");
            }
        }

        let mut child = self.child.lock().await;
        if let Some(mut process) = child.take() {
            match tokio::time::timeout(SHUTDOWN_GRACE, process.wait()).await {
                Ok(Ok(status)) => debug!(%status, "MCP server exited"),
                Ok(Err(e)) => warn!("Failed to wait for MCP server: {e}"),
                Err(_) => {
                    warn!("MCP server did not exit, killing it");
                    process.kill().await?;
                }
            }
        }

        Ok(())
    }

    async fn list_tools(&self) -> Result<Vec<MCPToolDefinition>> {
        self.session().await?.list_tools().await
    }

    async fn call_tool(&self, name: &str, arguments: Value) -> Result<MCPToolResult> {
        self.session().await?.call_tool(name, arguments).await
    }

    async fn server_info(&self) -> Option<MCPServerInfo> {
        match self.session().await {
            Ok(session) => session.server_info().await,
            Err(_) => None,
        }
    }
}

impl Drop for StdioMCPClient {
    fn drop(&mut self) {
        // Best effort cleanup - kill child process
        if let Ok(mut child) = self.child.try_lock() {
            if let Some(child) = child.as_mut() {
                let _ = child.start_kill();
            }
        }
    }
}
