//! Configuration management for churncast
//!
//! Provides TOML-based configuration with defaults and validation.
//! Location: ~/.churncast/config.toml

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cli::args::Verbosity;
use crate::errors::{ChurnError, Result};
use crate::repl::FormLayout;

/// Complete configuration for churncast
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub model: ModelConfig,
    pub form: FormConfig,
    pub display: DisplayConfig,
}

/// Model artifact location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub path: String,
}

/// Interactive form configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    pub layout: FormLayout,
    pub history_file: Option<String>,
}

/// Terminal output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub color_output: bool,
    pub show_confidence_bar: bool,
    pub default_verbosity: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: "models/logistic_model.json".to_string(),
        }
    }
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            layout: FormLayout::Sidebar,
            history_file: Some("~/.churncast/history".to_string()),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color_output: true,
            show_confidence_bar: true,
            default_verbosity: "normal".to_string(),
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
            .map_err(|e| ChurnError::ConfigError(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| ChurnError::ConfigError(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load default configuration from standard location or use built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Some(path) = Self::default_path() {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Config::default())
    }

    /// Standard config location
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".churncast").join("config.toml"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.model.path.trim().is_empty() {
            return Err(ChurnError::ConfigError(
                "model.path must not be empty".to_string(),
            ));
        }

        if let Some(history) = &self.form.history_file {
            if history.trim().is_empty() {
                return Err(ChurnError::ConfigError(
                    "form.history_file must not be empty when set".to_string(),
                ));
            }
        }

        self.verbosity()?;
        Ok(())
    }

    /// Configured default verbosity
    pub fn verbosity(&self) -> Result<Verbosity> {
        self.display
            .default_verbosity
            .parse()
            .map_err(ChurnError::ConfigError)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| ChurnError::ConfigError(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ChurnError::ConfigError(format!("Failed to create config dir: {}", e))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| ChurnError::ConfigError(format!("Failed to write config: {}", e)))?;

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

    /// Model artifact path
    pub fn model_path(&self) -> PathBuf {
        Self::expand_path(&self.model.path)
    }

    /// Readline history path, if history is enabled
    pub fn history_path(&self) -> Option<PathBuf> {
        self.form
            .history_file
            .as_deref()
            .map(Self::expand_path)
    }
}
