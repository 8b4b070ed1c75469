use playbook_knowledge::KnowledgeEngine;

use crate::feedback::FeedbackLog;

/// Shared state handed to every tool call.
#[derive(Debug, Clone)]
pub struct ToolContext {
    knowledge_engine: KnowledgeEngine,
    feedback: FeedbackLog,
}

impl ToolContext {
    pub fn new(knowledge_engine: KnowledgeEngine, feedback: FeedbackLog) -> Self {
        Self {
            knowledge_engine,
            feedback,
        }
    }

    pub fn knowledge_engine(&self) -> &KnowledgeEngine {
        &self.knowledge_engine
    }

    pub fn feedback(&self) -> &FeedbackLog {
        &self.feedback
    }
}
