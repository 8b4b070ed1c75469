//! Knowledge engine configuration types.
//!
//! These types define the resolved (non-optional) settings used by
//! `playbook-knowledge`. They are created from the user-facing
//! `KnowledgeToolsSettings` TOML structs via `From`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::settings::{KnowledgeSearchSettings, KnowledgeToolsSettings};

/// Resolved knowledge engine settings (all values filled with defaults).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeSettings {
    /// Playbook document the index is built from (`.docx` or markdown).
    #[serde(default = "default_document_path")]
    pub document_path: PathBuf,
    #[serde(default)]
    pub search: SearchDefaults,
}

impl Default for KnowledgeSettings {
    fn default() -> Self {
        Self {
            document_path: default_document_path(),
            search: SearchDefaults::default(),
        }
    }
}

/// Resolved search and presentation knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchDefaults {
    /// Sections returned by a single ranked search.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Sections shown to the caller after deduplication.
    #[serde(default = "default_max_display")]
    pub max_display: usize,
    /// Per-section character budget before truncation.
    #[serde(default = "default_max_content_chars")]
    pub max_content_chars: usize,
}

impl Default for SearchDefaults {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            max_display: default_max_display(),
            max_content_chars: default_max_content_chars(),
        }
    }
}

fn default_document_path() -> PathBuf {
    PathBuf::from("playbook.docx")
}

fn default_top_k() -> usize {
    2
}

fn default_max_display() -> usize {
    5
}

fn default_max_content_chars() -> usize {
    2000
}

impl From<&KnowledgeToolsSettings> for KnowledgeSettings {
    fn from(value: &KnowledgeToolsSettings) -> Self {
        let mut settings = KnowledgeSettings::default();
        if let Some(path) = &value.document_path {
            settings.document_path = PathBuf::from(path);
        }
        apply_search_overrides(&mut settings.search, &value.search);
        settings
    }
}

fn apply_search_overrides(search: &mut SearchDefaults, overrides: &KnowledgeSearchSettings) {
    if let Some(top_k) = overrides.top_k {
        search.top_k = top_k;
    }
    if let Some(max_display) = overrides.max_display {
        search.max_display = max_display;
    }
    if let Some(max_content_chars) = overrides.max_content_chars {
        search.max_content_chars = max_content_chars;
    }
}
