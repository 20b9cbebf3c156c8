//! ContentProvider backed by an LLM completion client

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Local;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use super::{ContentProvider, ProviderError, extract_json};
use crate::domain::{DailyPlan, Exercise, SymptomAssessment};
use crate::llm::{CompletionRequest, LlmClient, Message};
use crate::prompts::{PromptContext, PromptLoader};

/// Physical exercises requested for the daily plan
const DEFAULT_DAILY_EXERCISES: usize = 3;

/// Exercises requested for the physiotherapy session
const DEFAULT_PHYSIO_EXERCISES: usize = 5;

pub struct LlmContentProvider {
    llm: Arc<dyn LlmClient>,
    prompts: PromptLoader,
    max_tokens: u32,
}

impl LlmContentProvider {
    pub fn new(llm: Arc<dyn LlmClient>, prompts: PromptLoader, max_tokens: u32) -> Self {
        debug!(max_tokens, "LlmContentProvider::new: called");
        Self {
            llm,
            prompts,
            max_tokens,
        }
    }

    /// Render `template`, send it with `user_message`, and return the reply text
    async fn ask(&self, template: &str, exercise_count: usize, user_message: &str) -> Result<String, ProviderError> {
        debug!(%template, "LlmContentProvider::ask: called");
        let context = PromptContext::for_date(Local::now().date_naive(), exercise_count);
        let system_prompt = self
            .prompts
            .render(template, &context)
            .map_err(|e| ProviderError::Prompt(e.to_string()))?;

        let request = CompletionRequest {
            system_prompt,
            messages: vec![Message::user(user_message)],
            max_tokens: self.max_tokens,
        };

        let response = self.llm.complete(request).await?;
        info!(
            template,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "Content request finished"
        );

        response
            .content
            .filter(|text| !text.trim().is_empty())
            .ok_or(ProviderError::EmptyResponse)
    }
}

fn decode<T: DeserializeOwned>(what: &'static str, reply: &str) -> Result<T, ProviderError> {
    serde_json::from_str(extract_json(reply)).map_err(|source| ProviderError::Malformed { what, source })
}

/// Physio replies are either a bare array or wrapped in an object
#[derive(Deserialize)]
#[serde(untagged)]
enum PhysioReply {
    List(Vec<Exercise>),
    Wrapped { exercises: Vec<Exercise> },
}

fn require_titles(what: &'static str, exercises: &[Exercise]) -> Result<(), ProviderError> {
    if exercises.iter().any(|e| e.title.trim().is_empty()) {
        return Err(ProviderError::Invalid {
            what,
            reason: "exercise without a title".to_string(),
        });
    }
    Ok(())
}

#[async_trait]
impl ContentProvider for LlmContentProvider {
    async fn get_daily_plan(&self) -> Result<DailyPlan, ProviderError> {
        debug!("get_daily_plan: called");
        let reply = self
            .ask("daily", DEFAULT_DAILY_EXERCISES, "Gera o meu plano para hoje.")
            .await?;
        let plan: DailyPlan = decode("daily plan", &reply)?;
        require_titles("daily plan", &plan.physical_exercises)?;
        Ok(plan)
    }

    async fn get_physio_plan(&self) -> Result<Vec<Exercise>, ProviderError> {
        debug!("get_physio_plan: called");
        let reply = self
            .ask("physio", DEFAULT_PHYSIO_EXERCISES, "Gera a minha sessão de fisioterapia.")
            .await?;
        let exercises = match decode::<PhysioReply>("physio plan", &reply)? {
            PhysioReply::List(list) => list,
            PhysioReply::Wrapped { exercises } => exercises,
        };
        require_titles("physio plan", &exercises)?;
        Ok(exercises)
    }

    async fn classify_symptoms(&self, text: &str) -> Result<SymptomAssessment, ProviderError> {
        debug!(text_len = text.len(), "classify_symptoms: called");
        let reply = self.ask("triage", 0, text).await?;
        let assessment: SymptomAssessment = decode("symptom assessment", &reply)?;
        if assessment.level.trim().is_empty() {
            return Err(ProviderError::Invalid {
                what: "symptom assessment",
                reason: "empty level".to_string(),
            });
        }
        Ok(assessment)
    }
}
