//! ParkinVibe CLI entry point

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use tracing::{debug, info};

use parkinvibe::cli::{Cli, Command, DiaryCommand};
use parkinvibe::config::Config;
use parkinvibe::domain::{DailyPlan, Exercise, Mood, SymptomAssessment, TriageLevel};
use parkinvibe::llm::create_client;
use parkinvibe::prompts::PromptLoader;
use parkinvibe::provider::{ContentProvider, LlmContentProvider, ProviderError};
use parkinvibe::session::{ExerciseTab, Session, SessionOptions};
use parkinvibe::store::JsonStore;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("parkinvibe")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Priority: CLI --log-level > config file > INFO
    let level = match cli_log_level.or(config_log_level).map(str::to_uppercase).as_deref() {
        Some("TRACE") => tracing::Level::TRACE,
        Some("DEBUG") => tracing::Level::DEBUG,
        Some("INFO") | None => tracing::Level::INFO,
        Some("WARN") | Some("WARNING") => tracing::Level::WARN,
        Some("ERROR") => tracing::Level::ERROR,
        Some(other) => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", other);
            tracing::Level::INFO
        }
    };

    let log_file = fs::File::create(log_dir.join("parkinvibe.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

/// Build the LLM-backed provider, failing early when no API key is set
fn build_provider(config: &Config) -> Result<Arc<dyn ContentProvider>> {
    config.validate()?;
    let llm = create_client(&config.llm).context("Failed to create LLM client")?;
    let prompt_dir = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("parkinvibe")
        .join("prompts");
    let prompts = PromptLoader::new(prompt_dir);
    Ok(Arc::new(LlmContentProvider::new(llm, prompts, config.llm.max_tokens)))
}

/// Provider for commands that never reach the network
struct OfflineProvider;

#[async_trait::async_trait]
impl ContentProvider for OfflineProvider {
    async fn get_daily_plan(&self) -> Result<DailyPlan, ProviderError> {
        Err(offline())
    }

    async fn get_physio_plan(&self) -> Result<Vec<Exercise>, ProviderError> {
        Err(offline())
    }

    async fn classify_symptoms(&self, _text: &str) -> Result<SymptomAssessment, ProviderError> {
        Err(offline())
    }
}

fn offline() -> ProviderError {
    ProviderError::Invalid {
        what: "request",
        reason: "content provider not available for this command".to_string(),
    }
}

fn open_session(config: &Config, provider: Arc<dyn ContentProvider>) -> Result<Session> {
    let store = JsonStore::open(&config.storage.data_dir)
        .context(format!("Failed to open data directory {}", config.storage.data_dir.display()))?;
    Ok(Session::new(provider, Box::new(store), SessionOptions::from_config(config)))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!(data_dir = %config.storage.data_dir.display(), "ParkinVibe loaded config");

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Plan { no_reveal, favorite } => cmd_plan(&config, no_reveal, &favorite).await,
        Command::Physio => cmd_physio(&config).await,
        Command::Triage { text } => cmd_triage(&config, &text).await,
        Command::Diary { command } => match command {
            DiaryCommand::Add { mood, tremor, notes } => cmd_diary_add(&config, mood, tremor, &notes),
            DiaryCommand::List { limit } => cmd_diary_list(&config, limit),
        },
        Command::Favorites { remove } => cmd_favorites(&config, remove.as_deref()),
        Command::Progress { entries } => cmd_progress(&config, entries),
    }
}

fn print_exercise(number: usize, exercise: &Exercise, favorite: bool) {
    let star = if favorite { " ★".yellow().to_string() } else { String::new() };
    println!("  {}. {}{}", number, exercise.title.bold(), star);
    if !exercise.description.is_empty() {
        println!("     {}", exercise.description);
    }
    let meta: Vec<&str> = [exercise.target.as_str(), exercise.duration.as_str()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect();
    if !meta.is_empty() {
        println!("     {}", meta.join(" · ").dimmed());
    }
}

fn print_plan(session: &Session, plan: &DailyPlan) {
    println!("\n{}\n", plan.motivation.italic());
    for (idx, exercise) in plan.physical_exercises.iter().enumerate() {
        print_exercise(idx + 1, exercise, session.is_favorite(&exercise.title));
    }
    print_mental(plan);
}

fn print_mental(plan: &DailyPlan) {
    println!("\n{} {}", "Exercício mental:".bold(), plan.mental_exercise.question);
    println!("  {} {}", "Resposta:".dimmed(), plan.mental_exercise.answer.dimmed());
}

/// Print each section as the reveal makes it visible
async fn reveal_plan(session: &mut Session) -> Result<()> {
    let mut header_shown = false;
    let mut exercises_shown = 0;
    let mut mental_shown = false;
    loop {
        session.next_message().await;

        let Some(plan) = session.daily_plan() else {
            if let Some(reason) = session.daily_state().error() {
                eyre::bail!("Could not generate today's plan: {}", reason);
            }
            continue;
        };

        if !header_shown && session.is_motivation_visible() {
            println!("\n{}\n", plan.motivation.italic());
            header_shown = true;
        }
        for (idx, exercise) in session.visible_exercises().iter().enumerate().skip(exercises_shown) {
            print_exercise(idx + 1, exercise, session.is_favorite(&exercise.title));
            exercises_shown = idx + 1;
        }
        if !mental_shown && session.is_mental_visible() {
            print_mental(plan);
            mental_shown = true;
        }

        if !session.is_busy() {
            return Ok(());
        }
    }
}

async fn cmd_plan(config: &Config, no_reveal: bool, favorites: &[usize]) -> Result<()> {
    debug!(no_reveal, ?favorites, "cmd_plan: called");
    let provider = build_provider(config)?;
    let mut session = open_session(config, provider)?;

    println!("{}", "A preparar o plano de hoje...".dimmed());
    session.start();

    if no_reveal {
        while session.daily_state().is_loading() {
            session.next_message().await;
        }
        session.shutdown();
        let Some(plan) = session.daily_plan() else {
            let reason = session.daily_state().error().unwrap_or("no plan").to_string();
            eyre::bail!("Could not generate today's plan: {}", reason);
        };
        print_plan(&session, plan);
    } else {
        reveal_plan(&mut session).await?;
    }

    let chosen: Vec<Exercise> = match session.daily_plan() {
        Some(plan) => favorites
            .iter()
            .filter_map(|n| n.checked_sub(1).and_then(|idx| plan.physical_exercises.get(idx)))
            .cloned()
            .collect(),
        None => Vec::new(),
    };
    for exercise in &chosen {
        if !session.is_favorite(&exercise.title) {
            session.toggle_favorite(exercise);
            println!("{} {}", "Guardado nos favoritos:".green(), exercise.title);
        }
    }

    session.shutdown();
    Ok(())
}

async fn cmd_physio(config: &Config) -> Result<()> {
    debug!("cmd_physio: called");
    let provider = build_provider(config)?;
    let mut session = open_session(config, provider)?;

    session.select_tab(ExerciseTab::Physio);
    session.settle().await;

    if let Some(reason) = session.physio_state().error() {
        eyre::bail!("Could not generate the physio session: {}", reason);
    }

    let exercises = session.physio_plan();
    if exercises.is_empty() {
        println!("Sem exercícios de fisioterapia para hoje.");
        return Ok(());
    }

    println!("{}\n", "Sessão de fisioterapia".bold());
    for (idx, exercise) in exercises.iter().enumerate() {
        print_exercise(idx + 1, exercise, session.is_favorite(&exercise.title));
    }
    Ok(())
}

async fn cmd_triage(config: &Config, text: &str) -> Result<()> {
    debug!(text_len = text.len(), "cmd_triage: called");
    if text.trim().is_empty() {
        eyre::bail!("Describe the symptoms to classify");
    }

    let provider = build_provider(config)?;
    let mut session = open_session(config, provider)?;

    session.classify_symptoms(text);
    session.settle().await;

    let Some(assessment) = session.triage_result() else {
        let reason = session.triage_state().error().unwrap_or("no result").to_string();
        eyre::bail!("Symptom triage failed: {}", reason);
    };

    let label = match assessment.triage_level() {
        TriageLevel::Stable => assessment.level.green().bold(),
        TriageLevel::Observe => assessment.level.yellow().bold(),
        TriageLevel::Urgent => assessment.level.red().bold(),
    };
    println!("{}\n{}", label, assessment.advice);
    Ok(())
}

fn cmd_diary_add(config: &Config, mood: Mood, tremor: u8, notes: &str) -> Result<()> {
    debug!(%mood, tremor, "cmd_diary_add: called");
    let mut session = open_session(config, Arc::new(OfflineProvider))?;

    let Some(entry) = session.save_diary_entry(mood, tremor, notes) else {
        eyre::bail!("Diary notes cannot be empty");
    };
    println!(
        "{} {} (tremor {}/10)",
        "Entrada guardada:".green(),
        entry.date,
        entry.tremor_level
    );
    Ok(())
}

fn cmd_diary_list(config: &Config, limit: usize) -> Result<()> {
    debug!(limit, "cmd_diary_list: called");
    let session = open_session(config, Arc::new(OfflineProvider))?;

    if session.diary().is_empty() {
        println!("O diário está vazio.");
        return Ok(());
    }
    for entry in session.diary().iter().take(limit) {
        println!(
            "{}  {:<6} tremor {:>2}/10  {}",
            entry.date.bold(),
            entry.mood.to_string(),
            entry.tremor_level,
            entry.notes
        );
    }
    Ok(())
}

fn cmd_favorites(config: &Config, remove: Option<&str>) -> Result<()> {
    debug!(?remove, "cmd_favorites: called");
    let mut session = open_session(config, Arc::new(OfflineProvider))?;

    if let Some(title) = remove {
        let Some(exercise) = session.favorites().iter().find(|e| e.title == title).cloned() else {
            eyre::bail!("No favorite named '{}'", title);
        };
        session.toggle_favorite(&exercise);
        println!("{} {}", "Removido dos favoritos:".yellow(), title);
        return Ok(());
    }

    if session.favorites().is_empty() {
        println!("Ainda não tem favoritos.");
        return Ok(());
    }
    for (idx, exercise) in session.favorites().iter().enumerate() {
        print_exercise(idx + 1, exercise, true);
    }
    Ok(())
}

fn cmd_progress(config: &Config, entries: usize) -> Result<()> {
    debug!(entries, "cmd_progress: called");
    let session = open_session(config, Arc::new(OfflineProvider))?;

    println!("{}", "Medicação de hoje".bold());
    for med in session.medications() {
        let bell = if med.reminders_enabled { "🔔" } else { "  " };
        println!("  {} {}  {} {}", bell, med.time, med.name, med.dosage.dimmed());
    }
    println!(
        "  {} por tomar, progresso {:.0}%",
        session.medications_remaining(),
        session.progress().medication
    );

    let series = session.tremor_series(entries);
    println!("\n{}", "Tendência do tremor".bold());
    if series.is_empty() {
        println!("  Sem registos no diário.");
    }
    for (date, level) in series {
        println!("  {}  {:<10} {}", date, "█".repeat(level as usize), level);
    }
    Ok(())
}
