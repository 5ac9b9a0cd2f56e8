//! Shared utilities for the workspace
//!
//! Logging setup and environment-driven configuration helpers used by both
//! the tool server and the chat client.

pub mod config;
pub mod logging;

pub use config::{ConfigError, env_or, env_parse, env_string, load_dotenv};
pub use logging::{LogFormat, init_tracing};
