//! LLM error types

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while talking to a language model
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Missing API key: set the {0} environment variable")]
    MissingApiKey(String),

    #[error("Unknown LLM provider '{0}' (supported: anthropic)")]
    UnknownProvider(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key_message_names_variable() {
        let err = LlmError::MissingApiKey("PV_KEY".to_string());
        assert!(err.to_string().contains("PV_KEY"));
    }
}
