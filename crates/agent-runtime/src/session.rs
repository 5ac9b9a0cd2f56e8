//! In-memory conversation store
//!
//! Histories live only as long as the process; nothing is persisted.

use agent_llm::Message;
use std::collections::HashMap;

/// Conversation histories keyed by session id
#[derive(Debug, Default)]
pub struct ConversationStore {
    sessions: HashMap<String, Vec<Message>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// History of a session (empty for unknown sessions)
    pub fn history(&self, session_id: &str) -> Vec<Message> {
        self.sessions.get(session_id).cloned().unwrap_or_default()
    }

    /// Replace the history of a session
    pub fn save(&mut self, session_id: &str, messages: Vec<Message>) {
        self.sessions.insert(session_id.to_string(), messages);
    }

    /// Forget a session
    pub fn clear(&mut self, session_id: &str) {
        self.sessions.remove(session_id);
    }

    /// Number of sessions with stored history
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
