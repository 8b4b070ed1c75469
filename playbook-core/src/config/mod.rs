//! Configuration management for playbook.
//!
//! Settings come from a TOML file, paths may be overridden from the
//! environment.
//!
//! # Configuration Sources
//!
//! ## Environment
//! - `PLAYBOOK_DOCUMENT` - document the knowledge index is built from
//! - `PLAYBOOK_FEEDBACK_LOG` - file receiving documentation issue reports
//! - `PLAYBOOK_CONFIG_DIR` - directory holding `config.toml`
//!
//! ## Settings (TOML File)
//! Located at `~/.config/playbook/config.toml`:
//! ```toml
//! [knowledge]
//! document_path = "playbook.docx"
//!
//! [knowledge.search]
//! top_k = 2
//!
//! [logging]
//! level = "info"
//! ```

mod env;
pub mod knowledge;
mod settings;

use std::path::PathBuf;

pub use env::EnvOverrides;
pub use knowledge::{KnowledgeSettings, SearchDefaults};
pub use settings::{
    FeedbackSettings, KnowledgeSearchSettings, KnowledgeToolsSettings, LoggingSettings, Settings,
    SettingsError,
};

/// Combined configuration: TOML settings plus environment overrides.
#[derive(Debug, Clone)]
pub struct Config {
    /// Overrides loaded from environment variables
    pub env: EnvOverrides,
    /// Settings loaded from TOML configuration file
    pub settings: Settings,
}

/// Errors that can occur when loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file cannot be created, read or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let env = EnvOverrides::from_env();
        let settings = Settings::load()?;
        Ok(Self { env, settings })
    }

    /// Resolved knowledge settings with environment overrides applied.
    pub fn knowledge_settings(&self) -> KnowledgeSettings {
        let mut knowledge = KnowledgeSettings::from(&self.settings.knowledge);
        if let Some(path) = &self.env.document_path {
            knowledge.document_path = path.clone();
        }
        knowledge
    }

    /// Where documentation issue reports are appended.
    pub fn feedback_log_path(&self) -> PathBuf {
        self.env
            .feedback_log_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(&self.settings.feedback.log_path))
    }

    /// Configured log level, used when `RUST_LOG` is not set.
    pub fn log_level(&self) -> &str {
        &self.settings.logging.level
    }
}
