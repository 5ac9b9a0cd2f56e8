//! Configuration helpers
//!
//! Both programs are configured through environment variables, optionally
//! seeded from a `.env` file. Missing values fall back to defaults; values
//! that are present but malformed are reported as [`ConfigError::Invalid`].

use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is not set
    #[error("{0} is not set")]
    Missing(String),

    /// A variable is set but cannot be parsed
    #[error("{key} has an invalid value '{value}': {reason}")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },
}

/// Load a `.env` file from the working directory or one of its parents
///
/// Variables already present in the environment are not overridden.
/// Returns the path of the loaded file, if any.
pub fn load_dotenv() -> Option<PathBuf> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!(path = %path.display(), "Loaded .env file");
            Some(path)
        }
        Err(e) => {
            tracing::debug!("No .env file loaded: {e}");
            None
        }
    }
}

/// Read a variable, treating unset and empty the same way
pub fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Read a variable or fall back to `default`
pub fn env_or(key: &str, default: &str) -> String {
    env_string(key).unwrap_or_else(|| default.to_string())
}

/// Read and parse a variable, falling back to `default` when it is unset
pub fn env_parse<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env_string(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key: key.to_string(),
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}
