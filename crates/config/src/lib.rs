//! Configuration loading, validation, and management for LexChat.
//!
//! Loads configuration from `~/.lexchat/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use lexchat_core::AgentKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.lexchat/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where the legal assistant backend lives
    #[serde(default)]
    pub backend: BackendConfig,

    /// Per-session defaults
    #[serde(default)]
    pub session: SessionConfig,
}

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the backend API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the streaming query endpoint
    #[serde(default = "default_stream_path")]
    pub stream_path: String,

    /// Whole-request timeout for one streamed response, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".into()
}
fn default_stream_path() -> String {
    "/query/stream".into()
}
fn default_request_timeout() -> u64 {
    120
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            stream_path: default_stream_path(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl BackendConfig {
    /// Full URL of the streaming endpoint.
    pub fn stream_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if self.stream_path.starts_with('/') {
            format!("{base}{}", self.stream_path)
        } else {
            format!("{base}/{}", self.stream_path)
        }
    }
}

/// Session defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Agent key used when none is given on the command line
    #[serde(default = "default_agent")]
    pub default_agent: String,

    /// Optional user id sent with every query
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// Capacity of the inbound event channel
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

fn default_agent() -> String {
    AgentKind::default().as_str().into()
}
fn default_event_buffer() -> usize {
    64
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_agent: default_agent(),
            user_id: None,
            event_buffer: default_event_buffer(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.lexchat/config.toml).
    ///
    /// Environment variables override the file:
    /// - `LEXCHAT_BACKEND_URL`
    /// - `LEXCHAT_AGENT`
    /// - `LEXCHAT_USER_ID`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::read_file(&config_path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::read_file(path)?;
        config.validate()?;
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Apply overrides from a variable lookup (the process environment in
    /// production).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("LEXCHAT_BACKEND_URL") {
            self.backend.base_url = url;
        }
        if let Some(agent) = lookup("LEXCHAT_AGENT") {
            self.session.default_agent = agent;
        }
        if let Some(user_id) = lookup("LEXCHAT_USER_ID") {
            self.session.user_id = Some(user_id).filter(|u| !u.is_empty());
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".lexchat")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = &self.backend.base_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "backend.base_url must start with http:// or https:// (got '{url}')"
            )));
        }

        if self.backend.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "backend.request_timeout_secs must be > 0".into(),
            ));
        }

        if self.session.event_buffer == 0 {
            return Err(ConfigError::ValidationError(
                "session.event_buffer must be > 0".into(),
            ));
        }

        self.session
            .default_agent
            .parse::<AgentKind>()
            .map_err(|e| ConfigError::ValidationError(format!("session.default_agent: {e}")))?;

        Ok(())
    }

    /// The configured default agent. Falls back to the roster default if the
    /// value does not parse (only possible on an unvalidated config).
    pub fn default_agent(&self) -> AgentKind {
        self.session.default_agent.parse().unwrap_or_default()
    }

    /// Generate a default config TOML string (for `config --default`).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
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

impl From<ConfigError> for lexchat_core::Error {
    fn from(e: ConfigError) -> Self {
        lexchat_core::Error::Config {
            message: e.to_string(),
        }
    }
}
