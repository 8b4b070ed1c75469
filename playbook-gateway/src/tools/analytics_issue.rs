use playbook_knowledge::present;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::tools::evidence::{evidence_output, render};
use crate::tools::{Tool, ToolContext};

const NO_SOLUTION: &str = "No matching solution found.";

#[derive(Debug, Deserialize)]
struct SolveAnalyticsIssueInput {
    query: String,
}

pub struct SolveAnalyticsIssueTool;

#[async_trait::async_trait]
impl Tool for SolveAnalyticsIssueTool {
    fn name(&self) -> &str {
        "solve_analytics_issue"
    }

    fn description(&self) -> &str {
        "Search the playbook for solutions to a specific problem, such as data discrepancies \
         or implementation errors. Returns the best matching sections as evidence."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Free-text description of the issue."
                }
            },
            "required": ["query"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, args: Value, context: &ToolContext) -> Result<String, String> {
        let input: SolveAnalyticsIssueInput =
            serde_json::from_value(args).map_err(|e| e.to_string())?;

        let engine = context.knowledge_engine();
        let outcome = engine.search(&input.query, None).await;
        let presentation = present(&outcome, &input.query, NO_SOLUTION, &engine.settings().search);

        render(&evidence_output("query", "troubleshooting", presentation)?)
    }
}
