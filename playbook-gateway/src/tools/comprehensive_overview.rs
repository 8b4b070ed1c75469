use serde_json::{Value, json};

use crate::tools::{Tool, ToolContext, evidence::render};

const UNAVAILABLE_MESSAGE: &str = "No knowledge available: the playbook document could not be read.";

pub struct ComprehensiveOverviewTool;

#[async_trait::async_trait]
impl Tool for ComprehensiveOverviewTool {
    fn name(&self) -> &str {
        "get_comprehensive_overview"
    }

    fn description(&self) -> &str {
        "Structural overview of the analytics playbook: every main topic with its sub-topics, \
         in document order. Use it to build navigation or pick a follow-up search."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {},
            "additionalProperties": false
        })
    }

    async fn execute(&self, _args: Value, context: &ToolContext) -> Result<String, String> {
        let overview = context.knowledge_engine().get_overview().await;

        let mut output = json!({
            "use_case": "ecosystem_overview",
            "sections": overview.topics,
            "evidence_level": "manual_index",
        });
        if !overview.available {
            output["message"] = Value::String(UNAVAILABLE_MESSAGE.to_string());
        }

        render(&output)
    }
}
