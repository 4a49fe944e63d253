use std::io;
use thiserror::Error;

/// Unified error type for the chat client.
///
/// The first three variants are the user-facing kinds; their `Display`
/// output is the advisory text attached to the session when a turn fails.
/// Storage variants never reach the user.
#[derive(Error, Debug)]
pub enum ChatError {
    /// Remote endpoint refused the request with HTTP 429
    #[error("Rate limit exceeded for {model}. Please wait or switch to another model.")]
    RateLimited { model: String },

    /// Remote endpoint answered with a non-success status
    #[error("Error: {0}")]
    Upstream(String),

    /// Request failed before a response was obtained
    #[error("Network or API error: {0}")]
    Transport(String),

    /// Persisted history could not be parsed
    #[error("History store corrupt: {0}")]
    StorageCorrupt(String),

    /// Persisted history could not be written
    #[error("History store write failed: {0}")]
    StorageWriteFailed(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// User input errors
    #[error("Input error: {0}")]
    Input(String),

    /// IO-related errors
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ChatError::Transport(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            ChatError::Transport(format!("Connection failed: {}", err))
        } else {
            ChatError::Transport(format!("Request failed: {}", err))
        }
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        ChatError::Serialization(format!("JSON error: {}", err))
    }
}

impl From<serde_yml::Error> for ChatError {
    fn from(err: serde_yml::Error) -> Self {
        ChatError::Serialization(format!("YAML error: {}", err))
    }
}
