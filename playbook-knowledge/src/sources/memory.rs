use std::sync::RwLock;
use std::time::{Duration, SystemTime};

use async_trait::async_trait;

use crate::errors::KnowledgeResult;
use crate::models::Block;
use crate::sources::DocumentSource;

/// Pre-parsed blocks held in memory, with a timestamp the owner controls.
///
/// Useful for embedding a playbook that never lives on disk, and for
/// exercising cache invalidation without touching file times.
#[derive(Debug)]
pub struct MemorySource {
    name: String,
    state: RwLock<MemoryState>,
}

#[derive(Debug, Clone)]
struct MemoryState {
    blocks: Vec<Block>,
    modified: SystemTime,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, blocks: Vec<Block>) -> Self {
        Self {
            name: name.into(),
            state: RwLock::new(MemoryState {
                blocks,
                modified: SystemTime::UNIX_EPOCH,
            }),
        }
    }

    /// Replace the blocks and advance the timestamp.
    pub fn set_blocks(&self, blocks: Vec<Block>) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.blocks = blocks;
        state.modified = advance(state.modified);
    }

    /// Advance the timestamp without changing the content.
    pub fn touch(&self) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.modified = advance(state.modified);
    }

    fn snapshot(&self) -> MemoryState {
        self.state.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

fn advance(previous: SystemTime) -> SystemTime {
    previous + Duration::from_secs(1)
}

#[async_trait]
impl DocumentSource for MemorySource {
    async fn modified(&self) -> KnowledgeResult<SystemTime> {
        Ok(self.snapshot().modified)
    }

    async fn read_blocks(&self) -> KnowledgeResult<Vec<Block>> {
        Ok(self.snapshot().blocks)
    }

    fn describe(&self) -> String {
        format!("memory:{}", self.name)
    }
}
