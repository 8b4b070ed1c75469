pub mod config;

pub use config::{
    Config, ConfigError, EnvOverrides, KnowledgeSettings, SearchDefaults, Settings,
    SettingsError,
};
