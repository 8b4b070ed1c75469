//! Settings configuration loaded from TOML files.
//!
//! This module handles non-sensitive configuration stored in TOML format
//! in the XDG config directory (~/.config/playbook/config.toml).

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default TOML configuration file content
const DEFAULT_CONFIG_TOML: &str = r#"# playbook configuration file
# Located at: ~/.config/playbook/config.toml
#
# Environment overrides:
#   - PLAYBOOK_DOCUMENT     (replaces knowledge.document_path)
#   - PLAYBOOK_FEEDBACK_LOG (replaces feedback.log_path)

[knowledge]
document_path = "playbook.docx"

[knowledge.search]
top_k = 2
max_display = 5
max_content_chars = 2000

[logging]
level = "info"

[feedback]
log_path = "playbook_feedback.log"
"#;

/// Settings loaded from TOML configuration file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Settings {
    /// Knowledge source and search tuning
    #[serde(default)]
    pub knowledge: KnowledgeToolsSettings,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingSettings,
    /// Documentation issue reports
    #[serde(default)]
    pub feedback: FeedbackSettings,
}

/// Knowledge tools configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct KnowledgeToolsSettings {
    /// Path of the playbook document
    pub document_path: Option<String>,
    /// Search defaults
    #[serde(default)]
    pub search: KnowledgeSearchSettings,
}

/// Knowledge search defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct KnowledgeSearchSettings {
    pub top_k: Option<usize>,
    pub max_display: Option<usize>,
    pub max_content_chars: Option<usize>,
}

/// Logging settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingSettings {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Feedback log settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeedbackSettings {
    /// File that documentation issue reports are appended to
    #[serde(default = "default_feedback_log_path")]
    pub log_path: String,
}

impl Default for FeedbackSettings {
    fn default() -> Self {
        Self {
            log_path: default_feedback_log_path(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_feedback_log_path() -> String {
    "playbook_feedback.log".to_string()
}

/// Errors that can occur when loading settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Config directory not found")]
    ConfigDirNotFound,
}

impl Settings {
    /// Load settings from the TOML configuration file.
    ///
    /// If the config file doesn't exist, creates it with default values.
    /// The file is located at `~/.config/playbook/config.toml`.
    pub fn load() -> Result<Self, SettingsError> {
        let config_path = Self::config_path()?;

        // Create default config if it doesn't exist
        if !config_path.exists() {
            tracing::info!("Creating default configuration at {:?}", config_path);
            Self::create_default_config(&config_path)?;
        }

        let content = fs::read_to_string(&config_path)?;
        Self::from_toml(&content)
    }

    /// Parse settings from TOML content.
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let settings: Self = toml::from_str(content)?;
        Ok(settings)
    }

    /// Serialize settings to TOML content.
    pub fn to_toml(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Get the configuration file path.
    ///
    /// Uses XDG config directory: `~/.config/playbook/config.toml`
    pub fn config_path() -> Result<PathBuf, SettingsError> {
        if let Ok(override_dir) = std::env::var("PLAYBOOK_CONFIG_DIR") {
            let dir = PathBuf::from(override_dir);
            return Ok(dir.join("config.toml"));
        }

        let config_dir = dirs::config_dir()
            .ok_or(SettingsError::ConfigDirNotFound)?
            .join("playbook");

        Ok(config_dir.join("config.toml"))
    }

    fn create_default_config(path: &PathBuf) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, DEFAULT_CONFIG_TOML)?;
        Ok(())
    }

    /// Save settings to a specific file path.
    pub fn save_to_path(&self, path: &PathBuf) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = self.to_toml()?;
        fs::write(path, content)?;
        Ok(())
    }
}
