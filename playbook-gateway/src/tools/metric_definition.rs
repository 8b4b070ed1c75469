use playbook_knowledge::{SearchOutcome, present};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::tools::evidence::{EXPERT_MANUAL, render};
use crate::tools::{Tool, ToolContext};

const GLOSSARY_TOPIC: &str = "Dimensions and Metrics";
const NOT_FOUND: &str = "Definition not found in the glossary.";

#[derive(Debug, Deserialize)]
struct MetricDefinitionInput {
    term: String,
}

pub struct MetricDefinitionTool;

impl MetricDefinitionTool {
    /// Glossary chapter first, then the whole playbook.
    async fn lookup(context: &ToolContext, term: &str) -> SearchOutcome {
        let engine = context.knowledge_engine();
        match engine.search_in(term, GLOSSARY_TOPIC, None).await {
            SearchOutcome::NoMatch => engine.search(&format!("{term} definition"), None).await,
            outcome => outcome,
        }
    }
}

#[async_trait::async_trait]
impl Tool for MetricDefinitionTool {
    fn name(&self) -> &str {
        "get_metric_definition"
    }

    fn description(&self) -> &str {
        "Look up the precise definition of a metric or term (e.g. 'Session', \
         'Attribution Window'). Best for answering 'What does X mean?'."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "term": {
                    "type": "string",
                    "description": "Metric, dimension or term to define."
                }
            },
            "required": ["term"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, args: Value, context: &ToolContext) -> Result<String, String> {
        let input: MetricDefinitionInput =
            serde_json::from_value(args).map_err(|e| e.to_string())?;

        let outcome = Self::lookup(context, &input.term).await;
        let presentation = present(
            &outcome,
            &input.term,
            NOT_FOUND,
            &context.knowledge_engine().settings().search,
        );

        let output = match presentation.sections.first() {
            Some(best) => json!({
                "term": input.term,
                "use_case": "glossary_lookup",
                "sections": [{ "context": best.sub_topic, "text": best.content }],
                "evidence_level": EXPERT_MANUAL,
            }),
            None => json!({
                "term": input.term,
                "definition": null,
                "message": presentation.message.unwrap_or_else(|| NOT_FOUND.to_string()),
            }),
        };

        render(&output)
    }
}
