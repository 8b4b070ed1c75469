use serde::Deserialize;
use serde_json::{Value, json};

use crate::tools::{Tool, ToolContext};

pub const THANK_YOU: &str =
    "Thank you. Your feedback has been logged and sent to the Data Governance team.";

#[derive(Debug, Deserialize)]
struct DocumentationIssueInput {
    section_topic: String,
    issue_description: String,
}

pub struct DocumentationIssueTool;

#[async_trait::async_trait]
impl Tool for DocumentationIssueTool {
    fn name(&self) -> &str {
        "report_documentation_issue"
    }

    fn description(&self) -> &str {
        "Report an error or outdated statement in the playbook, e.g. \
         \"The GA4 limit in section 'Limits' is outdated.\""
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "section_topic": {
                    "type": "string",
                    "description": "Section the issue was found in."
                },
                "issue_description": {
                    "type": "string",
                    "description": "What is wrong or outdated."
                }
            },
            "required": ["section_topic", "issue_description"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, args: Value, context: &ToolContext) -> Result<String, String> {
        let input: DocumentationIssueInput =
            serde_json::from_value(args).map_err(|e| e.to_string())?;

        context
            .feedback()
            .record(&input.section_topic, &input.issue_description)
            .await
            .map_err(|e| e.to_string())?;

        Ok(THANK_YOU.to_string())
    }
}
