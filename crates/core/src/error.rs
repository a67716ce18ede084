//! Error types for the FieldScout domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use std::path::PathBuf;
use thiserror::Error;

/// The top-level error type for all FieldScout operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Agent errors ---
    #[error("Agent error: {0}")]
    Agent(#[from] AgentError),

    // --- Search errors ---
    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    // --- Store errors ---
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Invalid-argument errors ---
    #[error("Invalid task: {0}")]
    InvalidTask(String),

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures raised by the agent execution collaborator.
///
/// These are never caught by the orchestration core — a failed agent call
/// is fatal to the current `step`/`run` and surfaces to the caller.
#[derive(Debug, Clone, Error)]
pub enum AgentError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Empty completion: {0}")]
    EmptyCompletion(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Failures raised inside a search backend.
///
/// These never escape the search boundary as `Err` — backends fold them
/// into [`crate::search::SearchOutcome::Failure`] so a bad query cannot
/// abort a multi-query fan-out.
#[derive(Debug, Clone, Error)]
pub enum SearchError {
    #[error("{variable} not found in environment variables")]
    MissingApiKey { variable: String },

    #[error("{backend} API returned status {status_code}")]
    Api { backend: String, status_code: u16 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed search response: {0}")]
    Decode(String),
}

/// Failures raised by the JSON merge-store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to access {path}: {reason}")]
    Io { path: PathBuf, reason: String },

    #[error("Existing file at {path} is not valid JSON: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("Existing file at {path} does not hold a JSON object")]
    NotAnObject { path: PathBuf },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_error_displays_correctly() {
        let err = Error::Agent(AgentError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        });
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn search_error_mentions_missing_variable() {
        let err = SearchError::MissingApiKey {
            variable: "GOOGLE_API_KEY".into(),
        };
        assert!(err.to_string().contains("GOOGLE_API_KEY"));
        assert!(err.to_string().contains("environment"));
    }

    #[test]
    fn store_error_displays_path() {
        let err = StoreError::Decode {
            path: PathBuf::from("/tmp/run.json"),
            reason: "unexpected end of input".into(),
        };
        assert!(err.to_string().contains("/tmp/run.json"));
        assert!(err.to_string().contains("not valid JSON"));
    }
}
