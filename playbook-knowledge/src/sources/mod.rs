//! Document sources for the knowledge index.
//!
//! A source reports when the document last changed and, on demand, turns it
//! into an ordered list of [`Block`]s. Failures are returned as
//! [`KnowledgeError`] values so the cache can degrade to an empty index.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use async_trait::async_trait;

use crate::errors::{KnowledgeError, KnowledgeResult};
use crate::models::Block;

pub mod docx;
pub mod markdown;
pub mod memory;

pub use docx::DocxSource;
pub use markdown::MarkdownSource;
pub use memory::MemorySource;

#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Last modification time of the underlying document.
    async fn modified(&self) -> KnowledgeResult<SystemTime>;

    /// Parse the document into blocks, in document order.
    async fn read_blocks(&self) -> KnowledgeResult<Vec<Block>>;

    /// Human-readable location, used in logs.
    fn describe(&self) -> String;
}

/// Pick a source implementation from the document's file extension.
pub fn open_source(path: &Path) -> KnowledgeResult<Arc<dyn DocumentSource>> {
    let ext = path
        .extension()
        .and_then(|v| v.to_str())
        .map(|v| v.to_ascii_lowercase())
        .unwrap_or_default();
    let source: Arc<dyn DocumentSource> = match ext.as_str() {
        "docx" => Arc::new(DocxSource::new(path)),
        "md" | "markdown" | "txt" => Arc::new(MarkdownSource::new(path)),
        _ => return Err(KnowledgeError::UnsupportedFormat(path.to_path_buf())),
    };
    Ok(source)
}

/// Modification time of a file, mapping a missing file to `SourceUnavailable`.
pub(crate) async fn file_modified(path: &Path) -> KnowledgeResult<SystemTime> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|err| not_found_as_unavailable(err, path))?;
    Ok(metadata.modified()?)
}

pub(crate) fn not_found_as_unavailable(err: io::Error, path: &Path) -> KnowledgeError {
    if err.kind() == io::ErrorKind::NotFound {
        KnowledgeError::SourceUnavailable(PathBuf::from(path))
    } else {
        KnowledgeError::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_source_by_extension() {
        let docx = open_source(Path::new("playbook.DOCX")).expect("docx source");
        assert!(docx.describe().ends_with("playbook.DOCX"));
        assert!(open_source(Path::new("notes.md")).is_ok());
        assert!(open_source(Path::new("notes.markdown")).is_ok());
    }

    #[test]
    fn rejects_unknown_extensions() {
        let err = open_source(Path::new("sheet.xlsx")).err().expect("error");
        assert!(matches!(err, KnowledgeError::UnsupportedFormat(_)));
        assert!(open_source(Path::new("no-extension")).is_err());
    }

    #[tokio::test]
    async fn missing_file_is_unavailable() {
        let temp = tempfile::TempDir::new().expect("tempdir");
        let path = temp.path().join("absent.md");
        let err = file_modified(&path).await.err().expect("error");
        assert!(matches!(err, KnowledgeError::SourceUnavailable(p) if p == path));
    }
}
