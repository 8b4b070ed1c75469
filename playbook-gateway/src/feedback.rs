//! Append-only log of documentation issue reports.

use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use tokio::io::AsyncWriteExt;
use tracing::warn;

#[derive(Debug, thiserror::Error)]
pub enum FeedbackError {
    #[error("failed to write feedback log {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct FeedbackLog {
    path: PathBuf,
}

impl FeedbackLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// One log line. Line breaks in the inputs are flattened so every report
    /// stays on a single line.
    pub fn format_entry(topic: &str, issue: &str, at: DateTime<Utc>) -> String {
        format!(
            "[{}] [REPORT] Topic: {} | Issue: {}",
            at.to_rfc3339_opts(SecondsFormat::Secs, true),
            single_line(topic),
            single_line(issue)
        )
    }

    /// Append a report and return the written entry.
    pub async fn record(&self, topic: &str, issue: &str) -> Result<String, FeedbackError> {
        let entry = Self::format_entry(topic, issue, Utc::now());
        warn!(topic, issue, "documentation issue reported");

        let write_err = |source| FeedbackError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(write_err)?;
        file.write_all(format!("{entry}\n").as_bytes())
            .await
            .map_err(write_err)?;
        file.flush().await.map_err(write_err)?;

        Ok(entry)
    }
}

fn single_line(text: &str) -> String {
    text.trim().replace(['\r', '\n'], " ")
}
