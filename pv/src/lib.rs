//! ParkinVibe - daily companion for people living with Parkinson's
//!
//! A session generates a daily exercise plan through an AI content provider
//! and reveals it one item at a time. It also loads a physiotherapy plan on
//! demand and classifies free-text symptoms. Favorites and a symptom diary
//! persist between sessions.
//!
//! # Modules
//!
//! - [`session`] - the orchestrator owning all user-visible state
//! - [`provider`] - the content provider seam and its LLM implementation
//! - [`llm`] - LLM client trait and Anthropic implementation
//! - [`store`] - durable favorites and diary
//! - [`domain`] - plan, diary, medication and triage types
//! - [`prompts`] - Handlebars prompt templates
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod cli;
pub mod config;
pub mod domain;
pub mod llm;
pub mod prompts;
pub mod provider;
pub mod session;
pub mod store;

// Re-export commonly used types
pub use config::{Config, LlmConfig};
pub use domain::{DailyPlan, DiaryEntry, Exercise, Medication, MentalExercise, Mood, PlanKind, SymptomAssessment};
pub use llm::{AnthropicClient, CompletionRequest, CompletionResponse, LlmClient, LlmError, create_client};
pub use prompts::{PromptContext, PromptLoader};
pub use provider::{ContentProvider, LlmContentProvider, ProviderError};
pub use session::{ExerciseTab, FetchState, PermissionSource, Session, SessionEvent, SessionOptions};
pub use store::{JsonStore, MemoryStore, SessionStore, StoreError};
