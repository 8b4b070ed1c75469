use std::sync::Arc;

use tracing::info;

use crate::KnowledgeSettings;
use crate::cache::IndexCache;
use crate::errors::KnowledgeResult;
use crate::models::{Overview, SearchOutcome};
use crate::sources::{DocumentSource, open_source};

pub(crate) mod search;
pub(crate) mod topics;

/// Facade over the index cache and the ranker.
///
/// Cheap to clone; clones share one cache.
#[derive(Debug, Clone)]
pub struct KnowledgeEngine {
    settings: KnowledgeSettings,
    cache: Arc<IndexCache>,
}

impl KnowledgeEngine {
    /// Open an engine over the configured document, picking the source from
    /// the file extension. The document itself is read lazily.
    pub fn open(settings: KnowledgeSettings) -> KnowledgeResult<Self> {
        let source = open_source(&settings.document_path)?;
        Ok(Self::with_source(settings, source))
    }

    /// Open an engine over an arbitrary source.
    pub fn with_source(settings: KnowledgeSettings, source: Arc<dyn DocumentSource>) -> Self {
        Self {
            settings,
            cache: Arc::new(IndexCache::new(source)),
        }
    }

    pub fn settings(&self) -> &KnowledgeSettings {
        &self.settings
    }

    pub(crate) fn cache(&self) -> &IndexCache {
        &self.cache
    }

    /// Main topics in document order with their distinct sub-topics.
    pub async fn get_overview(&self) -> Overview {
        topics::overview(self).await
    }

    /// Unfiltered ranked search. `top_k` falls back to the configured default.
    pub async fn search(&self, query: &str, top_k: Option<usize>) -> SearchOutcome {
        search::search(self, query, None, top_k).await
    }

    /// Ranked search restricted to main topics containing `main_filter`.
    pub async fn search_in(
        &self,
        query: &str,
        main_filter: &str,
        top_k: Option<usize>,
    ) -> SearchOutcome {
        search::search(self, query, Some(main_filter), top_k).await
    }

    /// One filtered search per term, in order, merged and deduplicated by
    /// content.
    pub async fn search_filtered(&self, topic: &str, filter_terms: &[&str]) -> SearchOutcome {
        search::search_filtered(self, topic, filter_terms).await
    }

    /// Drop the cached index, rebuild it and return the section count.
    ///
    /// Returns 0 when the document cannot be read.
    pub async fn invalidate_and_rebuild(&self) -> usize {
        self.cache.invalidate().await;
        let count = self.cache.get_index().await.sections().len();
        info!(sections = count, "knowledge index invalidated and rebuilt");
        count
    }
}
