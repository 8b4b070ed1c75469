use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum KnowledgeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("docx package error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("docx xml error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("docx package is missing part: {0}")]
    MissingPart(&'static str),
    #[error("unsupported document format: {0}")]
    UnsupportedFormat(PathBuf),
    #[error("document not found at {0}")]
    SourceUnavailable(PathBuf),
}

pub type KnowledgeResult<T> = Result<T, KnowledgeError>;
