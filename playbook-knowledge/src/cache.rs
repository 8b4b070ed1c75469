use std::fmt;
use std::sync::Arc;
use std::time::{Instant, SystemTime};

use tokio::sync::RwLock;
use tracing::{debug, error, info};

use crate::errors::{KnowledgeError, KnowledgeResult};
use crate::extractor::extract_sections;
use crate::models::{IndexLookup, KnowledgeIndex};
use crate::sources::DocumentSource;

/// Single-slot cache of the parsed document, keyed by the source's
/// modification time.
///
/// Readers share the current snapshot under a read lock. A stale or missing
/// snapshot is rebuilt under the write lock after re-checking, so concurrent
/// callers that observe the same change trigger one parse.
pub struct IndexCache {
    source: Arc<dyn DocumentSource>,
    slot: RwLock<Option<Arc<KnowledgeIndex>>>,
}

impl fmt::Debug for IndexCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexCache")
            .field("source", &self.source.describe())
            .finish_non_exhaustive()
    }
}

impl IndexCache {
    pub fn new(source: Arc<dyn DocumentSource>) -> Self {
        Self {
            source,
            slot: RwLock::new(None),
        }
    }

    /// Current index, rebuilt first if the source changed since the last build.
    pub async fn get_index(&self) -> IndexLookup {
        let modified = match self.source.modified().await {
            Ok(modified) => modified,
            Err(err) => return self.unavailable(err).await,
        };

        {
            let slot = self.slot.read().await;
            if let Some(index) = fresh(&slot, modified) {
                debug!(sections = index.len(), "knowledge index cache hit");
                return IndexLookup::Ready(index);
            }
        }

        let mut slot = self.slot.write().await;
        if let Some(index) = fresh(&slot, modified) {
            return IndexLookup::Ready(index);
        }

        let started = Instant::now();
        match self.build(modified).await {
            Ok(index) => {
                let index = Arc::new(index);
                *slot = Some(Arc::clone(&index));
                info!(
                    source = %self.source.describe(),
                    sections = index.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "knowledge index rebuilt"
                );
                IndexLookup::Ready(index)
            }
            Err(err) => {
                *slot = None;
                drop(slot);
                self.log_unavailable(&err);
                IndexLookup::Unavailable {
                    reason: err.to_string(),
                }
            }
        }
    }

    /// Drop the cached snapshot; the next access rebuilds.
    pub async fn invalidate(&self) {
        *self.slot.write().await = None;
    }

    async fn build(&self, modified: SystemTime) -> KnowledgeResult<KnowledgeIndex> {
        let blocks = self.source.read_blocks().await?;
        Ok(KnowledgeIndex::new(extract_sections(blocks), modified))
    }

    async fn unavailable(&self, err: KnowledgeError) -> IndexLookup {
        self.invalidate().await;
        self.log_unavailable(&err);
        IndexLookup::Unavailable {
            reason: err.to_string(),
        }
    }

    fn log_unavailable(&self, err: &KnowledgeError) {
        error!(
            source = %self.source.describe(),
            error = %err,
            "knowledge source unavailable"
        );
    }
}

fn fresh(slot: &Option<Arc<KnowledgeIndex>>, modified: SystemTime) -> Option<Arc<KnowledgeIndex>> {
    slot.as_ref()
        .filter(|index| index.modified() == modified)
        .map(Arc::clone)
}
