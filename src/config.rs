//! Configuration management for ReportBuddy
//!
//! Provides TOML-based configuration with defaults and validation.
//! Location: ~/.reportbuddy/config.toml

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::{ReportError, Result};

/// Complete configuration for ReportBuddy
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub vector_store: VectorStoreConfig,
    pub generation: GenerationConfig,
    pub retrieval: RetrievalConfig,
    pub schedule: ScheduleConfig,
    pub output: OutputConfig,
}

/// Qdrant connection and embedding settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorStoreConfig {
    pub url: String,
    pub collection: String,
    pub embedding_model: String,
}

/// Settings for every generation call issued by the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub base_url: String,
    pub model: String,
    /// Sampling temperature; higher explores more varied phrasing
    pub temperature: f32,
    pub timeout_secs: u64,
    /// Never reuse a cached response for an identical prompt
    pub disable_cache: bool,
    /// Environment variable holding the API key
    pub api_key_env: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub default_results: usize,
}

/// Daily batch schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Wall-clock time, "HH:MM"
    pub time: String,
    pub utc_offset_minutes: i32,
    pub summary_quarter: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub report_dir: String,
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:6334".to_string(),
            collection: "sales_marketing_data".to_string(),
            embedding_model: "sentence-transformers/all-MiniLM-L6-v2".to_string(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4.1-nano".to_string(),
            temperature: 0.7,
            timeout_secs: 120,
            disable_cache: true,
            api_key_env: "OPENAI_API_KEY".to_string(),
        }
    }
}

impl GenerationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { default_results: 8 }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            time: "09:00".to_string(),
            utc_offset_minutes: 330,
            summary_quarter: "Q3 2024".to_string(),
        }
    }
}

impl ScheduleConfig {
    /// Parse the configured wall-clock time
    pub fn run_time(&self) -> Result<NaiveTime> {
        NaiveTime::parse_from_str(&self.time, "%H:%M").map_err(|e| {
            ReportError::ConfigError(format!("Invalid schedule time '{}': {}", self.time, e))
        })
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            report_dir: ".".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        if let Some(config_path) = path {
            Self::load_from_file(&config_path)
        } else {
            Self::load_default()
        }
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ReportError::ConfigError(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| ReportError::ConfigError(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load default configuration from standard location or use built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Some(config_path) = Self::default_path() {
            if config_path.exists() {
                return Self::load_from_file(&config_path);
            }
        }

        Ok(Config::default())
    }

    /// Standard configuration file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".reportbuddy").join("config.toml"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.generation.model.trim().is_empty() {
            return Err(ReportError::ConfigError(
                "generation.model must not be empty".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.generation.temperature) {
            return Err(ReportError::ConfigError(
                "generation.temperature must be between 0.0 and 2.0".to_string(),
            ));
        }

        if self.generation.timeout_secs == 0 {
            return Err(ReportError::ConfigError(
                "generation.timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.retrieval.default_results == 0 {
            return Err(ReportError::ConfigError(
                "retrieval.default_results must be greater than 0".to_string(),
            ));
        }

        self.schedule.run_time()?;

        if self.schedule.utc_offset_minutes.abs() > 14 * 60 {
            return Err(ReportError::ConfigError(format!(
                "schedule.utc_offset_minutes out of range: {}",
                self.schedule.utc_offset_minutes
            )));
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| ReportError::ConfigError(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ReportError::ConfigError(format!("Failed to create config dir: {}", e))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| ReportError::ConfigError(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Expand tilde in paths
    pub fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(path)
    }

    /// Directory reports are written to
    pub fn report_dir(&self) -> PathBuf {
        Self::expand_path(&self.output.report_dir)
    }
}
