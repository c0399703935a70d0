//! Definitions and argument parsing for the two upstream tools.

use std::sync::Arc;

use rmcp::model::{JsonObject, Tool};
use serde_json::{Value, json};
use toolsearch_application::{DiscoverToolsInput, InvokeToolInput};
use toolsearch_domain::DEFAULT_MAX_RESULTS;

pub const DISCOVER_TOOLS: &str = "discover_tools";
pub const INVOKE_TOOL: &str = "invoke_tool";

fn schema(value: Value) -> Arc<JsonObject> {
    match value {
        Value::Object(map) => Arc::new(map),
        _ => Arc::new(JsonObject::new()),
    }
}

/// `discover_tools`, with the current backend and tool counts in its description.
pub fn discover_tool(backends: usize, tools: usize) -> Tool {
    Tool::new(
        DISCOVER_TOOLS,
        format!(
            "Search {tools} tools across {backends} connected backends. \
             Describe what you want to do in plain language; the result lists \
             matching tool identifiers to pass to {INVOKE_TOOL}."
        ),
        schema(json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "What you want to do, e.g. 'create a GitHub issue'"
                },
                "max_results": {
                    "type": "integer",
                    "minimum": 1,
                    "description": format!("Maximum number of tools to return (default {DEFAULT_MAX_RESULTS})")
                }
            },
            "required": ["query"]
        })),
    )
}

pub fn invoke_tool() -> Tool {
    Tool::new(
        INVOKE_TOOL,
        format!(
            "Invoke a backend tool by the identifier {DISCOVER_TOOLS} returned \
             (format 'backend__tool'). Returns the backend's result unchanged."
        ),
        schema(json!({
            "type": "object",
            "properties": {
                "tool_name": {
                    "type": "string",
                    "description": "Tool identifier from discover_tools"
                },
                "arguments": {
                    "type": "object",
                    "description": "Arguments matching the tool's input schema"
                }
            },
            "required": ["tool_name"]
        })),
    )
}

/// Read `discover_tools` arguments. A missing query is left empty for the
/// use case to reject; a non-positive `max_results` falls back to the default.
pub fn parse_discover_args(arguments: Option<&JsonObject>) -> Result<DiscoverToolsInput, String> {
    let query = match arguments.and_then(|a| a.get("query")) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(query)) => query.clone(),
        Some(_) => return Err("query must be a string".to_string()),
    };

    let mut input = DiscoverToolsInput::new(query);
    match arguments.and_then(|a| a.get("max_results")) {
        None | Some(Value::Null) => {}
        Some(Value::Number(n)) => {
            let max = n
                .as_u64()
                .or_else(|| n.as_f64().filter(|f| *f >= 1.0).map(|f| f as u64))
                .unwrap_or(0);
            if max > 0 {
                input = input.with_max_results(max as usize);
            }
        }
        Some(_) => return Err("max_results must be a number".to_string()),
    }
    Ok(input)
}

/// Read `invoke_tool` arguments.
pub fn parse_invoke_args(arguments: Option<&JsonObject>) -> Result<InvokeToolInput, String> {
    let tool_name = match arguments.and_then(|a| a.get("tool_name")) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(name)) => name.clone(),
        Some(_) => return Err("tool_name must be a string".to_string()),
    };

    let input = InvokeToolInput::new(tool_name);
    match arguments.and_then(|a| a.get("arguments")) {
        None | Some(Value::Null) => Ok(input),
        Some(Value::Object(args)) => Ok(input.with_arguments(args.clone())),
        Some(_) => Err("arguments must be an object".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(value: Value) -> JsonObject {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_discover_tool_description_counts() {
        let tool = discover_tool(3, 42);
        assert_eq!(tool.name, DISCOVER_TOOLS);
        let description = tool.description.unwrap();
        assert!(description.contains("42 tools"));
        assert!(description.contains("3 connected backends"));
        assert_eq!(tool.input_schema["required"], json!(["query"]));
    }

    #[test]
    fn test_parse_discover_args() {
        let input = parse_discover_args(Some(&args(json!({"query": "files", "max_results": 2}))))
            .unwrap();
        assert_eq!(input.query, "files");
        assert_eq!(input.max_results, Some(2));

        let input = parse_discover_args(Some(&args(json!({"query": "x", "max_results": 0})))).unwrap();
        assert_eq!(input.max_results, None);

        let input = parse_discover_args(None).unwrap();
        assert!(input.query.is_empty());

        assert!(parse_discover_args(Some(&args(json!({"query": 5})))).is_err());
        assert!(parse_discover_args(Some(&args(json!({"query": "x", "max_results": "2"})))).is_err());
    }

    #[test]
    fn test_parse_invoke_args() {
        let input = parse_invoke_args(Some(&args(json!({
            "tool_name": "github__create_issue",
            "arguments": {"title": "bug"}
        }))))
        .unwrap();
        assert_eq!(input.tool_name, "github__create_issue");
        assert_eq!(input.arguments.unwrap()["title"], "bug");

        let input = parse_invoke_args(Some(&args(json!({"tool_name": "a__x", "arguments": null})))).unwrap();
        assert!(input.arguments.is_none());

        assert!(parse_invoke_args(Some(&args(json!({"tool_name": "a__x", "arguments": [1]})))).is_err());
    }
}
