//! Overrides loaded from environment variables only.
//!
//! Deployments usually point the gateway at a document without touching the
//! TOML file, so the document and feedback paths can be replaced from the
//! environment (or a `.env` file during development).

use std::env;
use std::path::PathBuf;

/// Overrides read from environment variables.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    /// Playbook document path (env: PLAYBOOK_DOCUMENT)
    pub document_path: Option<PathBuf>,

    /// Feedback log path (env: PLAYBOOK_FEEDBACK_LOG)
    pub feedback_log_path: Option<PathBuf>,
}

impl EnvOverrides {
    /// Load overrides from environment variables.
    ///
    /// This function also loads .env file if present (for development),
    /// but production should rely on actual environment variables.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        Self::from_env_inner()
    }

    /// Internal method to load from environment without loading .env
    pub(crate) fn from_env_inner() -> Self {
        Self {
            document_path: non_empty_var("PLAYBOOK_DOCUMENT").map(PathBuf::from),
            feedback_log_path: non_empty_var("PLAYBOOK_FEEDBACK_LOG").map(PathBuf::from),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
