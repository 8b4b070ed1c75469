use playbook_knowledge::present;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::tools::evidence::{evidence_output, render};
use crate::tools::{Tool, ToolContext};

const STRATEGY_TOPICS: [&str; 2] = ["choose", "discrepancies"];
const NOT_FOUND: &str = "No strategic comparison found.";

#[derive(Debug, Deserialize)]
struct PlatformStrategyInput {
    feature_or_tool: String,
}

pub struct PlatformStrategyTool;

#[async_trait::async_trait]
impl Tool for PlatformStrategyTool {
    fn name(&self) -> &str {
        "compare_platform_strategy"
    }

    fn description(&self) -> &str {
        "Compare analytics platforms (GA4, Segment, Shopify) and find guidance on which one \
         to choose for a feature, including known data discrepancies between them."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "feature_or_tool": {
                    "type": "string",
                    "description": "Feature or platform to compare, e.g. 'Segment'."
                }
            },
            "required": ["feature_or_tool"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, args: Value, context: &ToolContext) -> Result<String, String> {
        let input: PlatformStrategyInput =
            serde_json::from_value(args).map_err(|e| e.to_string())?;

        let engine = context.knowledge_engine();
        let outcome = engine
            .search_filtered(&input.feature_or_tool, &STRATEGY_TOPICS)
            .await;
        let presentation = present(
            &outcome,
            &input.feature_or_tool,
            NOT_FOUND,
            &engine.settings().search,
        );

        render(&evidence_output(
            "feature_or_tool",
            "platform_comparison",
            presentation,
        )?)
    }
}
