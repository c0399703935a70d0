//! Shaping use-case outputs into MCP tool results.

use rmcp::model::{CallToolResult, Content};
use serde_json::{Value, json};
use toolsearch_application::{DiscoverToolsOutput, InvokeToolOutput};

const NO_TOOLS_MESSAGE: &str =
    "No tools available: no backend is connected. Check the backend configuration.";

/// JSON payload of a `discover_tools` call.
pub fn discover_payload(output: &DiscoverToolsOutput) -> Value {
    match output {
        DiscoverToolsOutput::NoToolsAvailable => json!({
            "error": NO_TOOLS_MESSAGE,
            "tool_references": [],
        }),
        DiscoverToolsOutput::Found(found) => json!({
            "tool_references": found.tool_references,
            "tools": found.tools,
            "query": found.query,
            "total_tools_available": found.total_tools_available,
        }),
    }
}

/// A single-text tool result.
pub fn text_result(text: impl Into<String>, is_error: bool) -> CallToolResult {
    let content = vec![Content::text(text.into())];
    if is_error {
        CallToolResult::error(content)
    } else {
        CallToolResult::success(content)
    }
}

/// The backend's raw result, serialized as text. A backend-reported error
/// keeps its error flag on the wrapping result.
pub fn invoke_result(output: &InvokeToolOutput) -> CallToolResult {
    let backend_error = output
        .result
        .get("isError")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    text_result(output.result.to_string(), backend_error)
}
