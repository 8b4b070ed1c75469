use std::sync::Arc;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

/// Main topic used for content that appears before the first level-1 heading.
pub const DEFAULT_MAIN_TOPIC: &str = "General Overview";

/// One structural element of a source document, in document order.
///
/// Document sources classify their native nodes into this closed set so the
/// extractor never has to inspect format-specific markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Top-level heading; opens a new main topic.
    Heading1(String),
    /// Any other heading level.
    SubHeading(String),
    /// Body text. `lead_bold` is the emphasis flag of the first text run.
    Paragraph { text: String, lead_bold: bool },
    Table(Table),
    /// Embedded image or chart without extractable text.
    Drawing,
}

impl Block {
    /// Plain paragraph without leading emphasis.
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::Paragraph {
            text: text.into(),
            lead_bold: false,
        }
    }

    /// Paragraph whose first run is bold.
    pub fn bold(text: impl Into<String>) -> Self {
        Self::Paragraph {
            text: text.into(),
            lead_bold: true,
        }
    }
}

/// Grid of cell texts. Rows are not required to have equal length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A contiguous span of document content attributed to one
/// (main_topic, sub_topic) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub main_topic: String,
    pub sub_topic: String,
    pub content: String,
    /// Lower-cased `main_topic` + `sub_topic`, kept for external indexers.
    pub search_key: String,
}

/// Every section from one parse of the source document, with the source
/// modification time observed when the parse started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeIndex {
    sections: Vec<Section>,
    modified: SystemTime,
}

impl KnowledgeIndex {
    pub fn new(sections: Vec<Section>, modified: SystemTime) -> Self {
        Self { sections, modified }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn modified(&self) -> SystemTime {
        self.modified
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Result of asking the cache for the current index.
#[derive(Debug, Clone)]
pub enum IndexLookup {
    Ready(Arc<KnowledgeIndex>),
    /// The source document could not be read; nothing is indexed.
    Unavailable { reason: String },
}

impl IndexLookup {
    /// Sections of a ready index, empty when the source is unavailable.
    pub fn sections(&self) -> &[Section] {
        match self {
            Self::Ready(index) => index.sections(),
            Self::Unavailable { .. } => &[],
        }
    }

    pub fn index(&self) -> Option<&Arc<KnowledgeIndex>> {
        match self {
            Self::Ready(index) => Some(index),
            Self::Unavailable { .. } => None,
        }
    }
}

/// A section that cleared the relevance floor, with its scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedSection {
    #[serde(flatten)]
    pub section: Section,
    pub title_score: f64,
    pub content_score: f64,
    pub score: f64,
}

/// Outcome of a ranked search.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Matches(Vec<RankedSection>),
    /// The index was available but nothing cleared the relevance floor.
    NoMatch,
    Unavailable { reason: String },
}

impl SearchOutcome {
    /// Ranked sections, empty for `NoMatch` and `Unavailable`.
    pub fn sections(&self) -> &[RankedSection] {
        match self {
            Self::Matches(sections) => sections,
            _ => &[],
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

/// Sub-topics found under one main topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicOverview {
    pub main_topic: String,
    pub sub_topics: Vec<String>,
}

/// Structural overview of the indexed document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Overview {
    pub topics: Vec<TopicOverview>,
    /// False when the source document could not be read.
    pub available: bool,
}
