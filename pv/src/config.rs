//! ParkinVibe configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::Medication;
use crate::llm::LlmError;

/// Main ParkinVibe configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Progressive reveal cadence
    pub reveal: RevealConfig,

    /// Storage configuration
    pub storage: StorageConfig,

    /// Daily medication schedule
    pub medications: Vec<MedicationConfig>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,
}

impl Config {
    /// Validate configuration before reaching the content provider
    ///
    /// Only commands that call the LLM need this; diary and favorites work offline.
    pub fn validate(&self) -> Result<()> {
        if std::env::var(&self.llm.api_key_env).is_err() {
            return Err(eyre::eyre!(
                "LLM API key not found. Set the {} environment variable.",
                self.llm.api_key_env
            ));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .parkinvibe.yml
        let local_config = PathBuf::from(".parkinvibe.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/parkinvibe/parkinvibe.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("parkinvibe").join("parkinvibe.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is initialised
    ///
    /// Errors are swallowed: a broken config file is reported later by `load`.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        Self::load(config_path).ok().and_then(|c| c.log_level)
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let mut config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        if config.medications.is_empty() {
            config.medications = default_medications();
        }

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Build the session's medication list from the configured schedule
    pub fn medication_schedule(&self) -> Vec<Medication> {
        let source = if self.medications.is_empty() {
            default_medications()
        } else {
            self.medications.clone()
        };
        source.into_iter().map(MedicationConfig::into_medication).collect()
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name (currently only "anthropic" supported)
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl LlmConfig {
    /// Read the API key from the configured environment variable
    pub fn get_api_key(&self) -> Result<String, LlmError> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| LlmError::MissingApiKey(self.api_key_env.clone()))
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "anthropic".to_string(),
            model: "claude-sonnet-4-20250514".to_string(),
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            max_tokens: 4096,
            timeout_ms: 60_000,
        }
    }
}

/// Progressive reveal configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Delay between two reveal ticks in milliseconds
    #[serde(rename = "interval-ms")]
    pub interval_ms: u64,
}

impl RevealConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.max(1))
    }
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self { interval_ms: 350 }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding favorites.json and diary.json
    #[serde(rename = "data-dir")]
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        // Use XDG data directory (~/.local/share/parkinvibe on Linux)
        let data_dir = dirs::data_dir()
            .map(|d| d.join("parkinvibe"))
            .unwrap_or_else(|| PathBuf::from(".parkinvibe"));

        Self { data_dir }
    }
}

/// One scheduled medication dose
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicationConfig {
    pub id: String,
    pub name: String,
    pub dosage: String,
    /// Scheduled time of day, e.g. "08:00"
    pub time: String,
    #[serde(rename = "reminders-enabled", default = "default_true")]
    pub reminders_enabled: bool,
}

impl MedicationConfig {
    fn into_medication(self) -> Medication {
        Medication {
            id: self.id,
            name: self.name,
            dosage: self.dosage,
            time: self.time,
            taken: false,
            reminders_enabled: self.reminders_enabled,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_medications() -> Vec<MedicationConfig> {
    [
        ("1", "Levodopa", "100mg", "08:00"),
        ("2", "Pramipexol", "0.125mg", "14:00"),
        ("3", "Levodopa", "100mg", "20:00"),
    ]
    .into_iter()
    .map(|(id, name, dosage, time)| MedicationConfig {
        id: id.to_string(),
        name: name.to_string(),
        dosage: dosage.to_string(),
        time: time.to_string(),
        reminders_enabled: true,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.llm.provider, "anthropic");
        assert_eq!(config.reveal.interval_ms, 350);
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_default_medication_schedule() {
        let meds = Config::default().medication_schedule();

        assert_eq!(meds.len(), 3);
        assert_eq!(meds[0].name, "Levodopa");
        assert_eq!(meds[1].dosage, "0.125mg");
        assert!(meds.iter().all(|m| !m.taken));
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
llm:
  provider: anthropic
  model: claude-haiku
  api-key-env: MY_API_KEY
  base-url: https://api.example.com
  max-tokens: 2048
  timeout-ms: 30000

reveal:
  interval-ms: 100

storage:
  data-dir: /tmp/pv-data

medications:
  - id: morning
    name: Rasagilina
    dosage: 1mg
    time: "09:00"

log-level: DEBUG
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.llm.model, "claude-haiku");
        assert_eq!(config.llm.api_key_env, "MY_API_KEY");
        assert_eq!(config.llm.max_tokens, 2048);
        assert_eq!(config.reveal.interval(), Duration::from_millis(100));
        assert_eq!(config.storage.data_dir, PathBuf::from("/tmp/pv-data"));
        assert_eq!(config.log_level.as_deref(), Some("DEBUG"));

        let meds = config.medication_schedule();
        assert_eq!(meds.len(), 1);
        assert_eq!(meds[0].id, "morning");
        assert!(meds[0].reminders_enabled);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
llm:
  model: claude-opus-4
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.llm.model, "claude-opus-4");
        assert_eq!(config.llm.provider, "anthropic");
        assert_eq!(config.reveal.interval_ms, 350);
        assert_eq!(config.medication_schedule().len(), 3);
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pv.yml");
        fs::write(&path, "reveal:\n  interval-ms: 42\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.reveal.interval_ms, 42);
        assert_eq!(config.medications.len(), 3);
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let path = PathBuf::from("/nonexistent/parkinvibe.yml");
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    #[serial]
    fn test_get_api_key_reads_env() {
        let config = LlmConfig {
            api_key_env: "PV_TEST_API_KEY".to_string(),
            ..LlmConfig::default()
        };

        // SAFETY: serialised with the other env-touching tests
        unsafe { std::env::set_var("PV_TEST_API_KEY", "secret") };
        assert_eq!(config.get_api_key().unwrap(), "secret");

        unsafe { std::env::remove_var("PV_TEST_API_KEY") };
        assert!(matches!(config.get_api_key(), Err(LlmError::MissingApiKey(_))));
    }

    #[test]
    #[serial]
    fn test_validate_requires_api_key() {
        let mut config = Config::default();
        config.llm.api_key_env = "PV_TEST_MISSING_KEY".to_string();

        unsafe { std::env::remove_var("PV_TEST_MISSING_KEY") };
        assert!(config.validate().is_err());
    }
}
