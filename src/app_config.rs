use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use url::Url;

use crate::errors::InvalidJob;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Target language code (ISO), may be supplied on the command line instead
    #[serde(default)]
    pub target_language: String,

    /// Engine used when a job does not name one
    #[serde(default)]
    pub engine: Engine,

    /// Engines jobs are allowed to select
    #[serde(default = "default_enabled_engines")]
    pub enabled_engines: Vec<Engine>,

    /// Backend connection settings
    #[serde(default)]
    pub backend: BackendConfig,

    /// Number of files translated at the same time within one job
    #[serde(default = "default_max_concurrent_files")]
    pub max_concurrent_files: usize,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation engine type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    // @engine: Helsinki-NLP MarianMT models served by the backend
    #[default]
    Huggingface,
    // @engine: Claude through AWS Bedrock
    Bedrock,
    // @engine: Claude through the direct API
    Claude,
}

impl Engine {
    /// Every engine the backend understands
    pub const ALL: [Engine; 3] = [Engine::Huggingface, Engine::Bedrock, Engine::Claude];

    // @returns: Capitalized engine name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Huggingface => "Hugging Face",
            Self::Bedrock => "AWS Bedrock",
            Self::Claude => "Claude",
        }
    }

    // @returns: Wire identifier sent as `service_type`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Huggingface => "huggingface",
            Self::Bedrock => "bedrock",
            Self::Claude => "claude",
        }
    }

    /// Parse an optional identifier, falling back to the default engine
    pub fn parse_or_default(id: Option<&str>) -> Result<Self, InvalidJob> {
        match id.map(str::trim) {
            None | Some("") => Ok(Self::default()),
            Some(id) => id.parse(),
        }
    }
}

impl std::fmt::Display for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Engine {
    type Err = InvalidJob;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "huggingface" => Ok(Self::Huggingface),
            "bedrock" => Ok(Self::Bedrock),
            "claude" => Ok(Self::Claude),
            _ => Err(InvalidJob::UnknownEngine(s.to_string())),
        }
    }
}

/// Backend service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BackendConfig {
    /// Base URL of the translation API
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Largest file submitted to the backend, `None` disables the check
    #[serde(default = "default_max_file_size_bytes")]
    pub max_file_size_bytes: Option<u64>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            max_file_size_bytes: default_max_file_size_bytes(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching filter for the `log` facade
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_enabled_engines() -> Vec<Engine> {
    Engine::ALL.to_vec()
}

fn default_max_concurrent_files() -> usize {
    1
}

fn default_endpoint() -> String {
    "http://localhost:8000/api/v1".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_file_size_bytes() -> Option<u64> {
    Some(5 * 1024 * 1024)
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if !self.enabled_engines.contains(&self.engine) {
            return Err(anyhow!(
                "Default engine '{}' is not in enabled_engines",
                self.engine
            ));
        }

        Url::parse(&self.backend.endpoint)
            .with_context(|| format!("Invalid backend endpoint: {}", self.backend.endpoint))?;

        if self.backend.timeout_secs == 0 {
            return Err(anyhow!("Backend timeout must be greater than zero"));
        }

        if self.max_concurrent_files == 0 {
            return Err(anyhow!("max_concurrent_files must be at least 1"));
        }

        if !self.target_language.trim().is_empty() {
            crate::language_utils::validate_language_code(&self.target_language)?;
        }

        Ok(())
    }

    /// Load a configuration file, creating one with defaults when it is missing
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            return Ok(config);
        }

        log::warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        crate::file_utils::FileManager::write_to_file(path, &json)
    }

    /// Resolve the config path: an existing local file wins, then the user config dir
    pub fn resolve_path(requested: &str) -> PathBuf {
        let local = PathBuf::from(requested);
        if local.exists() || local.is_absolute() {
            return local;
        }

        match dirs::config_dir() {
            Some(dir) => {
                let candidate = dir.join("doctran").join(requested);
                if candidate.exists() { candidate } else { local }
            }
            None => local,
        }
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            target_language: String::new(),
            engine: Engine::default(),
            enabled_engines: default_enabled_engines(),
            backend: BackendConfig::default(),
            max_concurrent_files: default_max_concurrent_files(),
            log_level: LogLevel::default(),
        }
    }
}
