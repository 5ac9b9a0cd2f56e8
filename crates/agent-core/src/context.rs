//! Execution context for agents
//!
//! A `Context` travels with every turn. It names the conversation (session)
//! the turn belongs to and counts the turns processed so far.

/// Session id used when the caller does not pick one
pub const DEFAULT_SESSION_ID: &str = "chat-session";

/// Context passed to agents during execution
///
/// # Example
///
/// ```
/// use agent_core::Context;
///
/// let mut ctx = Context::new().with_session_id("session-123");
/// assert_eq!(ctx.session_id(), "session-123");
///
/// ctx.begin_turn();
/// assert_eq!(ctx.turn(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Context {
    session_id: String,
    turn: u64,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            session_id: DEFAULT_SESSION_ID.to_string(),
            turn: 0,
        }
    }
}

impl Context {
    /// Create a context for the default session
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the session ID
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = session_id.into();
        self
    }

    /// Get the session ID
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Number of turns started in this context
    pub fn turn(&self) -> u64 {
        self.turn
    }

    /// Mark the start of a new turn and return its number (1-based)
    pub fn begin_turn(&mut self) -> u64 {
        self.turn += 1;
        self.turn
    }
}
