//! Configuration file management.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use mycontroller_types::{DEFAULT_LANGUAGE, Position};
use serde::{Deserialize, Serialize};

use crate::cli::ConfigKey;

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// MyController server URL
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Basic auth user name
    #[serde(default)]
    pub username: Option<String>,

    /// Basic auth password
    #[serde(default)]
    pub password: Option<String>,

    /// Language for CLI messages until the server reports one
    #[serde(default = "default_language")]
    pub language: String,

    /// Disable colored output
    #[serde(default)]
    pub no_color: bool,

    /// Skip confirmation prompts
    #[serde(default)]
    pub assume_yes: bool,

    /// Fixed position used by `set location --locate`
    #[serde(default)]
    pub location: Option<LocationConfig>,
}

/// A fixed geographic position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationConfig {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<LocationConfig> for Position {
    fn from(location: LocationConfig) -> Self {
        Position::new(location.latitude, location.longitude)
    }
}

fn default_server_url() -> String {
    "http://localhost:8443".to_string()
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            username: None,
            password: None,
            language: default_language(),
            no_color: false,
            assume_yes: false,
            location: None,
        }
    }
}

impl Config {
    /// Directory holding the config file and the session snapshot
    pub fn dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mycontroller")
    }

    /// Get the default config file path
    pub fn path() -> PathBuf {
        Self::dir().join("config.toml")
    }

    /// Load config from the default path, or return default if not found
    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    /// Load config from `path`, or return default if missing or unreadable
    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        eprintln!("Warning: Failed to parse config: {}", e);
                    }
                },
                Err(e) => {
                    eprintln!("Warning: Failed to read config: {}", e);
                }
            }
        }
        Self::default()
    }

    /// Save config to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Current value of a key, rendered as text
    pub fn get(&self, key: ConfigKey) -> Option<String> {
        match key {
            ConfigKey::ServerUrl => Some(self.server_url.clone()),
            ConfigKey::Username => self.username.clone(),
            ConfigKey::Password => self.password.as_ref().map(|_| "********".to_string()),
            ConfigKey::Language => Some(self.language.clone()),
            ConfigKey::NoColor => Some(self.no_color.to_string()),
            ConfigKey::AssumeYes => Some(self.assume_yes.to_string()),
        }
    }

    pub fn set(&mut self, key: ConfigKey, value: &str) -> Result<()> {
        match key {
            ConfigKey::ServerUrl => {
                if !value.starts_with("http://") && !value.starts_with("https://") {
                    bail!("Server URL must start with http:// or https://, got: {}", value);
                }
                self.server_url = value.to_string();
            }
            ConfigKey::Username => self.username = Some(value.to_string()),
            ConfigKey::Password => self.password = Some(value.to_string()),
            ConfigKey::Language => self.language = value.to_string(),
            ConfigKey::NoColor => self.no_color = parse_bool(value)?,
            ConfigKey::AssumeYes => self.assume_yes = parse_bool(value)?,
        }
        Ok(())
    }

    /// Reset a key to its default
    pub fn unset(&mut self, key: ConfigKey) {
        let defaults = Self::default();
        match key {
            ConfigKey::ServerUrl => self.server_url = defaults.server_url,
            ConfigKey::Username => self.username = None,
            ConfigKey::Password => self.password = None,
            ConfigKey::Language => self.language = defaults.language,
            ConfigKey::NoColor => self.no_color = defaults.no_color,
            ConfigKey::AssumeYes => self.assume_yes = defaults.assume_yes,
        }
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => bail!("Expected true or false, got: {}", value),
    }
}

/// Resolve the server URL: flag (or `MC_SERVER_URL`) first, then config.
pub fn resolve_server(flag: Option<String>, config: &Config) -> String {
    flag.filter(|s| !s.is_empty())
        .unwrap_or_else(|| config.server_url.clone())
}
