//! Configuration loading, validation, and management for FieldScout.
//!
//! Loads configuration from `~/.fieldscout/config.toml` with environment
//! variable overrides. Validates all settings at load time — including the
//! output mode, so an unsupported mode fails before any run starts.

use std::path::{Path, PathBuf};

use fieldscout_core::OutputMode;
use serde::{Deserialize, Serialize};

/// The root configuration structure.
///
/// Maps directly to `~/.fieldscout/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the LLM provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// LLM provider: "openrouter", "openai", or "ollama"
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Override the provider's base URL (e.g., a self-hosted endpoint)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Search backend: "duckduckgo" or "gemini"
    #[serde(default = "default_search_backend")]
    pub search_backend: String,

    /// API key for the Gemini search backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_api_key: Option<String>,

    /// Research orchestration settings
    #[serde(default)]
    pub research: ResearchConfig,
}

fn default_provider() -> String {
    "openrouter".into()
}
fn default_search_backend() -> String {
    "duckduckgo".into()
}
fn default_model() -> String {
    "anthropic/claude-sonnet-4".into()
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("provider", &self.provider)
            .field("base_url", &self.base_url)
            .field("search_backend", &self.search_backend)
            .field("google_api_key", &redact(&self.google_api_key))
            .field("research", &self.research)
            .finish()
    }
}

/// Orchestrator settings — immutable once the orchestrator is constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchConfig {
    /// Display name for this research system
    #[serde(default = "default_name")]
    pub name: String,

    /// What this research system is for
    #[serde(default = "default_description")]
    pub description: String,

    /// Role name recorded for every director entry in the log
    #[serde(default = "default_director_agent_name")]
    pub director_agent_name: String,

    /// Model the director runs against
    #[serde(default = "default_model")]
    pub director_model_name: String,

    /// Token budget per director invocation
    #[serde(default = "default_director_max_tokens")]
    pub director_max_tokens: u32,

    /// Loop bound handed to each director invocation
    #[serde(default = "default_one")]
    pub director_max_loops: u32,

    /// How many director invocations one `run` performs
    #[serde(default = "default_one")]
    pub max_loops: u32,

    /// Which shape a completed run returns
    #[serde(default)]
    pub output_type: OutputMode,

    /// Conversation export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Worker fan-out settings
    #[serde(default)]
    pub worker: WorkerSettings,
}

fn default_name() -> String {
    "FieldScout".into()
}
fn default_description() -> String {
    "Deep research session".into()
}
fn default_director_agent_name() -> String {
    "Director-Agent".into()
}
fn default_director_max_tokens() -> u32 {
    8000
}
fn default_one() -> u32 {
    1
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            description: default_description(),
            director_agent_name: default_director_agent_name(),
            director_model_name: default_model(),
            director_max_tokens: default_director_max_tokens(),
            director_max_loops: default_one(),
            max_loops: default_one(),
            output_type: OutputMode::default(),
            export: ExportConfig::default(),
            worker: WorkerSettings::default(),
        }
    }
}

impl ResearchConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.director_max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "director_max_tokens must be > 0".into(),
            ));
        }
        if self.max_loops == 0 {
            return Err(ConfigError::ValidationError("max_loops must be >= 1".into()));
        }
        if self.director_max_loops == 0 {
            return Err(ConfigError::ValidationError(
                "director_max_loops must be >= 1".into(),
            ));
        }
        if self.export.dir.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "export.dir must not be empty".into(),
            ));
        }
        self.worker.validate()
    }
}

/// Where (and whether) finished conversations are exported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Whether to write the conversation log after each run
    #[serde(default)]
    pub enabled: bool,

    /// Directory the `<run-id>.json` files land in
    #[serde(default = "default_export_dir")]
    pub dir: String,
}

fn default_export_dir() -> String {
    "agent_workspace".into()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dir: default_export_dir(),
        }
    }
}

/// Settings consumed by the worker fan-out and the search-augmented agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerSettings {
    /// Model the worker search agents run against
    #[serde(default = "default_model")]
    pub worker_model_name: String,

    /// Token budget per worker invocation
    #[serde(default = "default_worker_max_tokens")]
    pub worker_max_tokens: u32,

    /// How many search results each worker query pulls
    #[serde(default = "default_search_num_results")]
    pub exa_search_num_results: usize,

    /// Per-result text cap, in characters
    #[serde(default = "default_search_max_characters")]
    pub exa_search_max_characters: usize,
}

fn default_worker_max_tokens() -> u32 {
    8000
}
fn default_search_num_results() -> usize {
    3
}
fn default_search_max_characters() -> usize {
    200
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            worker_model_name: default_model(),
            worker_max_tokens: default_worker_max_tokens(),
            exa_search_num_results: default_search_num_results(),
            exa_search_max_characters: default_search_max_characters(),
        }
    }
}

impl WorkerSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.worker_max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "worker_max_tokens must be > 0".into(),
            ));
        }
        if self.exa_search_num_results == 0 {
            return Err(ConfigError::ValidationError(
                "exa_search_num_results must be >= 1".into(),
            ));
        }
        if self.exa_search_max_characters == 0 {
            return Err(ConfigError::ValidationError(
                "exa_search_max_characters must be >= 1".into(),
            ));
        }
        Ok(())
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.fieldscout/config.toml).
    ///
    /// Also checks environment variables:
    /// - `FIELDSCOUT_API_KEY` (highest priority), then `OPENROUTER_API_KEY`,
    ///   then `OPENAI_API_KEY`
    /// - `FIELDSCOUT_PROVIDER`, `FIELDSCOUT_MODEL` (applies to director and
    ///   workers), `FIELDSCOUT_SEARCH_BACKEND`
    /// - `GOOGLE_API_KEY` for the Gemini search backend
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        if config.api_key.is_none() {
            config.api_key = std::env::var("FIELDSCOUT_API_KEY")
                .ok()
                .or_else(|| std::env::var("OPENROUTER_API_KEY").ok())
                .or_else(|| std::env::var("OPENAI_API_KEY").ok());
        }

        if let Ok(provider) = std::env::var("FIELDSCOUT_PROVIDER") {
            config.provider = provider;
        }

        if let Ok(model) = std::env::var("FIELDSCOUT_MODEL") {
            config.research.director_model_name = model.clone();
            config.research.worker.worker_model_name = model;
        }

        if let Ok(backend) = std::env::var("FIELDSCOUT_SEARCH_BACKEND") {
            config.search_backend = backend;
        }

        if config.google_api_key.is_none() {
            config.google_api_key = std::env::var("GOOGLE_API_KEY").ok();
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".fieldscout")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if !matches!(self.provider.as_str(), "openrouter" | "openai" | "ollama") {
            return Err(ConfigError::ValidationError(format!(
                "unknown provider '{}' (expected openrouter, openai, or ollama)",
                self.provider
            )));
        }
        if !matches!(self.search_backend.as_str(), "duckduckgo" | "gemini") {
            return Err(ConfigError::ValidationError(format!(
                "unknown search backend '{}' (expected duckduckgo or gemini)",
                self.search_backend
            )));
        }
        self.research.validate()
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate a default config TOML string (for the `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            provider: default_provider(),
            base_url: None,
            search_backend: default_search_backend(),
            google_api_key: None,
            research: ResearchConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
