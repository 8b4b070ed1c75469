use playbook_knowledge::present;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::tools::evidence::{evidence_output, render};
use crate::tools::{Tool, ToolContext};

/// Main-topic fragments searched, in this order.
const COMPLIANCE_TOPICS: [&str; 2] = ["restrictions", "limits"];
const NOT_FOUND: &str = "No compliance or limit information found.";

#[derive(Debug, Deserialize)]
struct LimitsAndComplianceInput {
    topic: String,
}

pub struct LimitsAndComplianceTool;

#[async_trait::async_trait]
impl Tool for LimitsAndComplianceTool {
    fn name(&self) -> &str {
        "check_limits_and_compliance"
    }

    fn description(&self) -> &str {
        "Look up platform limits, data retention, cookie consent or age restrictions. \
         Only sections under restriction and limit chapters are searched."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "topic": {
                    "type": "string",
                    "description": "Limit or compliance subject, e.g. 'data retention'."
                }
            },
            "required": ["topic"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, args: Value, context: &ToolContext) -> Result<String, String> {
        let input: LimitsAndComplianceInput =
            serde_json::from_value(args).map_err(|e| e.to_string())?;

        let engine = context.knowledge_engine();
        let outcome = engine
            .search_filtered(&input.topic, &COMPLIANCE_TOPICS)
            .await;
        let presentation = present(&outcome, &input.topic, NOT_FOUND, &engine.settings().search);

        render(&evidence_output("topic", "compliance_check", presentation)?)
    }
}
