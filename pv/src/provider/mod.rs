//! AI content provider
//!
//! The orchestrator only sees the [`ContentProvider`] trait: three fallible
//! async calls. [`LlmContentProvider`] implements it on top of an
//! [`LlmClient`](crate::llm::LlmClient).

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{DailyPlan, Exercise, SymptomAssessment};
use crate::llm::LlmError;

mod llm_provider;
mod parse;

pub use llm_provider::LlmContentProvider;
pub use parse::extract_json;

/// Errors from content requests
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("LLM request failed: {0}")]
    Llm(#[from] LlmError),

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("Model returned an empty response")]
    EmptyResponse,

    #[error("Malformed {what}: {source}")]
    Malformed {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid {what}: {reason}")]
    Invalid { what: &'static str, reason: String },

    #[error("Request aborted: {0}")]
    Aborted(String),
}

/// Source of AI-generated content
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// Motivation, physical exercises and a mental exercise for today
    async fn get_daily_plan(&self) -> Result<DailyPlan, ProviderError>;

    /// Physiotherapy exercises (may legitimately be empty)
    async fn get_physio_plan(&self) -> Result<Vec<Exercise>, ProviderError>;

    /// Classify free-text symptoms into a severity level plus advice
    async fn classify_symptoms(&self, text: &str) -> Result<SymptomAssessment, ProviderError>;
}
