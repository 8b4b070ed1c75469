use serde_json::{Value, json};

use super::{
    Tool, ToolContext, analytics_issue::SolveAnalyticsIssueTool,
    comprehensive_overview::ComprehensiveOverviewTool,
    documentation_issue::DocumentationIssueTool, limits_compliance::LimitsAndComplianceTool,
    metric_definition::MetricDefinitionTool, platform_strategy::PlatformStrategyTool,
};

/// Central manager for the playbook tools
///
/// Owns every tool instance and dispatches calls by name so the driver never
/// needs to know about individual tools.
pub struct ToolManager {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolManager {
    /// Create a new ToolManager with all available tools registered
    pub fn new() -> Self {
        let tools: Vec<Box<dyn Tool>> = vec![
            Box::new(ComprehensiveOverviewTool),
            Box::new(SolveAnalyticsIssueTool),
            Box::new(LimitsAndComplianceTool),
            Box::new(PlatformStrategyTool),
            Box::new(MetricDefinitionTool),
            Box::new(DocumentationIssueTool),
        ];
        Self { tools }
    }

    pub fn get_tools(&self) -> Vec<&dyn Tool> {
        self.tools.iter().map(|t| t.as_ref()).collect()
    }

    /// Name, description and input schema of every tool.
    pub fn describe(&self) -> Value {
        Value::Array(
            self.tools
                .iter()
                .map(|tool| {
                    json!({
                        "name": tool.name(),
                        "description": tool.description(),
                        "input_schema": tool.input_schema(),
                    })
                })
                .collect(),
        )
    }

    /// Execute a tool by name with the given input and context
    pub async fn execute_with_context(
        &self,
        name: &str,
        input: Value,
        context: &ToolContext,
    ) -> Result<String, String> {
        for tool in &self.tools {
            if tool.name() == name {
                return tool.execute(input, context).await;
            }
        }
        Err(format!("Unknown tool: {}", name))
    }
}

impl Default for ToolManager {
    fn default() -> Self {
        Self::new()
    }
}
