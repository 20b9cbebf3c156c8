//! Prompt Loader
//!
//! Loads prompt templates from an override directory or falls back to
//! embedded defaults.

use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate, Weekday};
use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::debug;

use super::embedded;

/// Context for rendering prompt templates
#[derive(Debug, Clone, Serialize)]
pub struct PromptContext {
    /// Calendar date, dd/mm/yyyy
    pub today: String,
    /// Weekday name in Portuguese
    pub weekday: String,
    /// How many exercises to ask for
    pub exercise_count: usize,
}

impl PromptContext {
    pub fn for_date(date: NaiveDate, exercise_count: usize) -> Self {
        debug!(%date, exercise_count, "PromptContext::for_date: called");
        Self {
            today: date.format("%d/%m/%Y").to_string(),
            weekday: weekday_pt(date.weekday()).to_string(),
            exercise_count,
        }
    }
}

fn weekday_pt(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "segunda-feira",
        Weekday::Tue => "terça-feira",
        Weekday::Wed => "quarta-feira",
        Weekday::Thu => "quinta-feira",
        Weekday::Fri => "sexta-feira",
        Weekday::Sat => "sábado",
        Weekday::Sun => "domingo",
    }
}

/// Loads and renders prompt templates
pub struct PromptLoader {
    /// Handlebars template engine
    hbs: Handlebars<'static>,
    /// User override directory (e.g. `~/.config/parkinvibe/prompts/`)
    user_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a loader that checks `user_dir` before the embedded templates
    pub fn new(user_dir: impl AsRef<Path>) -> Self {
        let user_dir = user_dir.as_ref();
        let exists = user_dir.is_dir();
        debug!(?user_dir, %exists, "PromptLoader::new: called");

        Self {
            hbs: Self::engine(),
            user_dir: exists.then(|| user_dir.to_path_buf()),
        }
    }

    /// Create a loader that only uses embedded prompts
    pub fn embedded_only() -> Self {
        debug!("PromptLoader::embedded_only: called");
        Self {
            hbs: Self::engine(),
            user_dir: None,
        }
    }

    fn engine() -> Handlebars<'static> {
        let mut hbs = Handlebars::new();
        // prompts are plain text, not HTML
        hbs.register_escape_fn(handlebars::no_escape);
        hbs
    }

    /// Load a template by name
    ///
    /// Checks in order:
    /// 1. User override: `{user_dir}/{name}.pmt`
    /// 2. Embedded fallback
    fn load_template(&self, name: &str) -> Result<String> {
        debug!(%name, "PromptLoader::load_template: called");
        if let Some(ref user_dir) = self.user_dir {
            let path = user_dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!(?path, "PromptLoader::load_template: found in user override");
                return std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read user prompt {}: {}", path.display(), e));
            }
        }

        embedded::get_embedded(name)
            .map(str::to_string)
            .ok_or_else(|| eyre!("Prompt template not found: {}", name))
    }

    /// Render a template with the given context
    pub fn render(&self, template_name: &str, context: &PromptContext) -> Result<String> {
        debug!(%template_name, today = %context.today, "PromptLoader::render: called");
        let template = self.load_template(template_name)?;
        self.hbs
            .render_template(&template, context)
            .map_err(|e| eyre!("Failed to render template {}: {}", template_name, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn context() -> PromptContext {
        PromptContext::for_date(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(), 4)
    }

    #[test]
    fn test_prompt_context_for_date() {
        let ctx = context();
        assert_eq!(ctx.today, "19/10/2026");
        assert_eq!(ctx.weekday, "segunda-feira");
        assert_eq!(ctx.exercise_count, 4);
    }

    #[test]
    fn test_render_embedded_daily() {
        let loader = PromptLoader::embedded_only();
        let rendered = loader.render("daily", &context()).unwrap();

        assert!(rendered.contains("19/10/2026"));
        assert!(rendered.contains("exactly 4 physical exercises"));
        assert!(!rendered.contains("{{"));
    }

    #[test]
    fn test_user_override_wins() {
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join("triage.pmt"), "Custom triage for {{today}}").unwrap();

        let loader = PromptLoader::new(temp.path());
        let rendered = loader.render("triage", &context()).unwrap();
        assert_eq!(rendered, "Custom triage for 19/10/2026");

        // templates without an override still come from the binary
        assert!(loader.render("physio", &context()).unwrap().contains("JSON array"));
    }

    #[test]
    fn test_unknown_template() {
        let loader = PromptLoader::embedded_only();
        assert!(loader.render("nonexistent-template", &context()).is_err());
    }
}
