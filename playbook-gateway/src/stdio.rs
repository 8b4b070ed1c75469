//! JSON-lines request loop.
//!
//! Each input line is `{"tool": "<name>", "arguments": {...}}`; each output
//! line is `{"ok": true, "output": ...}` or `{"ok": false, "error": "..."}`.
//! `{"tool": "list_tools"}` describes the registered tools.

use std::io;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::tools::{ToolContext, ToolManager};

pub const LIST_TOOLS: &str = "list_tools";

#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    pub tool: String,
    #[serde(default)]
    pub arguments: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    pub fn success(output: Value) -> Self {
        Self {
            ok: true,
            output: Some(output),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            output: None,
            error: Some(error.into()),
        }
    }
}

/// Answer one request line.
pub async fn handle_line(manager: &ToolManager, context: &ToolContext, line: &str) -> Response {
    let request: Request = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(e) => return Response::failure(format!("invalid request: {e}")),
    };

    if request.tool == LIST_TOOLS {
        return Response::success(manager.describe());
    }

    let arguments = match request.arguments {
        Value::Null => json!({}),
        other => other,
    };

    debug!(tool = %request.tool, "executing tool");
    match manager
        .execute_with_context(&request.tool, arguments, context)
        .await
    {
        // JSON tools are embedded as values, plain-text tools as strings.
        Ok(text) => Response::success(serde_json::from_str(&text).unwrap_or(Value::String(text))),
        Err(e) => {
            warn!(tool = %request.tool, error = %e, "tool call failed");
            Response::failure(e)
        }
    }
}

/// Serve requests until the reader is exhausted.
pub async fn serve<R, W>(
    manager: &ToolManager,
    context: &ToolContext,
    reader: R,
    mut writer: W,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let response = handle_line(manager, context, &line).await;
        let mut encoded = serde_json::to_string(&response).map_err(io::Error::other)?;
        encoded.push('\n');
        writer.write_all(encoded.as_bytes()).await?;
        writer.flush().await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::documentation_issue::THANK_YOU;
    use crate::tools::test_support;

    async fn run(input: &str) -> Vec<Value> {
        let temp = tempfile::TempDir::new().unwrap();
        let context = test_support::context(temp.path());
        let manager = ToolManager::new();

        let mut output = Vec::new();
        serve(
            &manager,
            &context,
            tokio::io::BufReader::new(input.as_bytes()),
            &mut output,
        )
        .await
        .unwrap();

        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn answers_one_line_per_request() {
        let responses = run(concat!(
            "{\"tool\": \"solve_analytics_issue\", \"arguments\": {\"query\": \"Segment vs GA4\"}}\n",
            "\n",
            "{\"tool\": \"get_comprehensive_overview\"}\n",
        ))
        .await;

        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["ok"], true);
        assert_eq!(responses[0]["output"]["use_case"], "troubleshooting");
        assert_eq!(responses[1]["output"]["use_case"], "ecosystem_overview");
    }

    #[tokio::test]
    async fn plain_text_output_is_a_string() {
        let responses = run(
            "{\"tool\": \"report_documentation_issue\", \"arguments\": {\"section_topic\": \"Limits\", \"issue_description\": \"stale\"}}\n",
        )
        .await;
        assert_eq!(responses[0]["output"], THANK_YOU);
    }

    #[tokio::test]
    async fn errors_are_reported_inline() {
        let responses = run("not json\n{\"tool\": \"nope\"}\n").await;
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["ok"], false);
        assert!(
            responses[0]["error"]
                .as_str()
                .unwrap()
                .starts_with("invalid request")
        );
        assert_eq!(responses[1]["error"], "Unknown tool: nope");
        assert!(responses[1].get("output").is_none());
    }

    #[tokio::test]
    async fn lists_tools() {
        let responses = run("{\"tool\": \"list_tools\"}\n").await;
        let tools = responses[0]["output"].as_array().unwrap();
        assert_eq!(tools.len(), 6);
        assert_eq!(tools[0]["name"], "get_comprehensive_overview");
        assert!(tools[0]["input_schema"].is_object());
    }
}
