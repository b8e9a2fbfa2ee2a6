//! Configuration loading and config file resolution
//!
//! Every field has a compiled default, so a missing file never stops the
//! service. Config file location priority:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`ACCESSFLOW_CONFIG`)
//! 3. Per-user config directory (`~/.config/accessflow/accessflow.toml`)
//! 4. Compiled defaults (no file)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "ACCESSFLOW_CONFIG";

/// Config file name inside the per-user config directory
pub const CONFIG_FILE_NAME: &str = "accessflow.toml";

/// Default listen address for the hub
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:5780";

/// Default text-generation model for security analysis
pub const DEFAULT_ANALYSIS_MODEL: &str = "gemini-2.5-flash";

/// Default Gemini REST endpoint (model name and verb are appended)
pub const DEFAULT_ANALYSIS_BASE_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models";

/// Top-level TOML configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// HTTP listen address
    #[serde(default)]
    pub bind_address: Option<String>,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub analysis: AnalysisSettings,

    #[serde(default)]
    pub feed: FeedSettings,

    #[serde(default)]
    pub enrollment: EnrollmentSettings,
}

impl TomlConfig {
    /// Listen address, falling back to the compiled default
    pub fn bind_address(&self) -> &str {
        self.bind_address.as_deref().unwrap_or(DEFAULT_BIND_ADDRESS)
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// External text-generation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSettings {
    /// API credential; environment variables take precedence
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_analysis_model")]
    pub model: String,

    #[serde(default = "default_analysis_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_analysis_model(),
            base_url: default_analysis_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Synthetic log feed settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedSettings {
    /// Milliseconds between synthetic events
    #[serde(default = "default_feed_interval_ms")]
    pub interval_ms: u64,

    /// Maximum number of events retained
    #[serde(default = "default_feed_capacity")]
    pub capacity: usize,
}

impl FeedSettings {
    pub fn interval(&self) -> Duration {
        crate::time::millis_to_duration(self.interval_ms)
    }
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            interval_ms: default_feed_interval_ms(),
            capacity: default_feed_capacity(),
        }
    }
}

/// Enrollment template-generation pacing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrollmentSettings {
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    #[serde(default = "default_step_percent")]
    pub step_percent: u8,
}

impl Default for EnrollmentSettings {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            step_percent: default_step_percent(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_analysis_model() -> String {
    DEFAULT_ANALYSIS_MODEL.to_string()
}

fn default_analysis_base_url() -> String {
    DEFAULT_ANALYSIS_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_feed_interval_ms() -> u64 {
    8000
}

fn default_feed_capacity() -> usize {
    50
}

fn default_tick_ms() -> u64 {
    300
}

fn default_step_percent() -> u8 {
    10
}

/// Where the effective configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    CommandLine(PathBuf),
    Environment(PathBuf),
    UserConfigDir(PathBuf),
    Defaults,
}

/// Locates the config file following the documented priority order
pub struct ConfigResolver {
    cli_path: Option<PathBuf>,
}

impl ConfigResolver {
    pub fn new(cli_path: Option<PathBuf>) -> Self {
        Self { cli_path }
    }

    /// Decide which file (if any) to read
    ///
    /// Explicit paths (CLI, environment) are returned even if they do not
    /// exist so the loader can report them; the per-user file is only used
    /// when present.
    pub fn resolve(&self) -> ConfigSource {
        if let Some(path) = &self.cli_path {
            return ConfigSource::CommandLine(path.clone());
        }

        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.trim().is_empty() {
                return ConfigSource::Environment(PathBuf::from(path));
            }
        }

        if let Some(path) = user_config_path() {
            if path.exists() {
                return ConfigSource::UserConfigDir(path);
            }
        }

        ConfigSource::Defaults
    }

    /// Resolve and load the configuration
    ///
    /// A file that cannot be read logs a warning and yields defaults. A file
    /// that fails to parse is an error.
    pub fn load(&self) -> Result<TomlConfig> {
        let path = match self.resolve() {
            ConfigSource::CommandLine(p)
            | ConfigSource::Environment(p)
            | ConfigSource::UserConfigDir(p) => p,
            ConfigSource::Defaults => {
                info!("No config file found, using compiled defaults");
                return Ok(TomlConfig::default());
            }
        };

        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let config = parse_toml_config(&content)?;
                info!("Loaded configuration from {}", path.display());
                Ok(config)
            }
            Err(e) => {
                warn!(
                    "Config file {} unreadable ({}), using compiled defaults",
                    path.display(),
                    e
                );
                Ok(TomlConfig::default())
            }
        }
    }
}

/// Per-user config file path (`<config_dir>/accessflow/accessflow.toml`)
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("accessflow").join(CONFIG_FILE_NAME))
}

/// Parse TOML text into a config
pub fn parse_toml_config(content: &str) -> Result<TomlConfig> {
    toml::from_str(content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
}

/// Read and parse a config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    parse_toml_config(&content)
}
