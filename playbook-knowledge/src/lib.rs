//! Playbook knowledge index and fuzzy retrieval.
//!
//! A [`DocumentSource`] yields the playbook as [`Block`]s, the extractor folds
//! them into topic [`Section`]s, [`IndexCache`] keeps the result until the
//! document changes, and the ranker scores sections against free-text queries.

pub mod cache;
pub mod engine;
pub mod errors;
pub mod extractor;
pub mod fuzz;
pub mod models;
pub mod present;
pub mod ranker;
pub mod sources;
pub mod table;

pub use playbook_core::config::{KnowledgeSettings, SearchDefaults};
pub use cache::IndexCache;
pub use engine::KnowledgeEngine;
pub use errors::{KnowledgeError, KnowledgeResult};
pub use models::{
    Block, IndexLookup, KnowledgeIndex, Overview, RankedSection, SearchOutcome, Section, Table,
    TopicOverview,
};
pub use present::{Presentation, PresentedSection, present};
pub use sources::{DocumentSource, DocxSource, MarkdownSource, MemorySource, open_source};
