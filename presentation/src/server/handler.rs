//! The rmcp [`ServerHandler`] exposed to the upstream agent.

use std::sync::Arc;

use rmcp::{
    ErrorData, RoleServer, ServerHandler,
    model::{
        CallToolRequestParam, CallToolResult, Implementation, JsonObject, ListToolsResult,
        PaginatedRequestParam, ServerCapabilities, ServerInfo, Tool,
    },
    service::RequestContext,
};
use toolsearch_application::{BackendPool, DiscoverToolsUseCase, InvokeToolUseCase};
use tracing::{debug, warn};

use super::payload::{discover_payload, invoke_result, text_result};
use super::tools::{
    DISCOVER_TOOLS, INVOKE_TOOL, discover_tool, invoke_tool, parse_discover_args,
    parse_invoke_args,
};

pub const SERVER_INSTRUCTIONS: &str = "This server fronts many tool backends through two tools. \
Call discover_tools with a plain-language description of the task first. \
Then call invoke_tool with one of the returned identifiers and the tool's arguments.";

/// Request handler for the two-tool surface.
///
/// Holds shared handles only; every request runs independently.
#[derive(Clone)]
pub struct ProxyServer {
    discover: Arc<DiscoverToolsUseCase>,
    invoke: Arc<InvokeToolUseCase>,
    pool: Arc<BackendPool>,
}

impl ProxyServer {
    pub fn new(
        discover: Arc<DiscoverToolsUseCase>,
        invoke: Arc<InvokeToolUseCase>,
        pool: Arc<BackendPool>,
    ) -> Self {
        Self {
            discover,
            invoke,
            pool,
        }
    }

    pub fn tools(&self) -> Vec<Tool> {
        vec![
            discover_tool(self.pool.connected_backends().len(), self.pool.cache().size()),
            invoke_tool(),
        ]
    }

    /// Run one upstream tool call. Every failure becomes an error result.
    pub async fn dispatch(&self, name: &str, arguments: Option<&JsonObject>) -> CallToolResult {
        match name {
            DISCOVER_TOOLS => self.handle_discover(arguments).await,
            INVOKE_TOOL => self.handle_invoke(arguments).await,
            other => {
                warn!(tool = other, "Unknown upstream tool requested");
                text_result(
                    format!(
                        "Error: unknown tool '{other}'. Available tools: {DISCOVER_TOOLS}, {INVOKE_TOOL}"
                    ),
                    true,
                )
            }
        }
    }

    async fn handle_discover(&self, arguments: Option<&JsonObject>) -> CallToolResult {
        let input = match parse_discover_args(arguments) {
            Ok(input) => input,
            Err(e) => return text_result(format!("Error: {e}"), true),
        };

        match self.discover.execute(input).await {
            Ok(output) => text_result(discover_payload(&output).to_string(), false),
            Err(e) => {
                warn!(error = %e, "discover_tools failed");
                text_result(format!("Error: {e}"), true)
            }
        }
    }

    async fn handle_invoke(&self, arguments: Option<&JsonObject>) -> CallToolResult {
        let input = match parse_invoke_args(arguments) {
            Ok(input) => input,
            Err(e) => return text_result(format!("Error: {e}"), true),
        };

        match self.invoke.execute(input).await {
            Ok(output) => {
                debug!(route = %output.route, "invoke_tool completed");
                invoke_result(&output)
            }
            Err(e) => {
                warn!(error = %e, "invoke_tool failed");
                text_result(format!("Error: {e}"), true)
            }
        }
    }
}

impl ServerHandler for ProxyServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult::with_all_items(self.tools()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(self.dispatch(&request.name, request.arguments.as_ref()).await)
    }
}
