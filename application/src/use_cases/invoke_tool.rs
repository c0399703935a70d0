//! Invoke tool use case
//!
//! Resolves a unique tool identifier through the cache and dispatches the
//! call to the owning backend via the pool. The backend's result document is
//! passed back untouched.

use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;
use toolsearch_domain::{ToolCache, ToolRoute};
use tracing::{debug, warn};

use crate::pool::{BackendPool, PoolError};

/// Errors that can occur during invocation
#[derive(Error, Debug)]
pub enum InvokeToolError {
    #[error("tool_name is required")]
    MissingToolName,

    #[error("Unknown tool: '{0}'. Run discover_tools to find valid tool identifiers.")]
    UnknownTool(String),

    #[error("{0}")]
    Pool(#[from] PoolError),
}

/// Input for the InvokeTool use case
#[derive(Debug, Clone, Default)]
pub struct InvokeToolInput {
    /// Unique identifier (`backend__original`)
    pub tool_name: String,
    pub arguments: Option<Map<String, Value>>,
}

impl InvokeToolInput {
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments: None,
        }
    }

    pub fn with_arguments(mut self, arguments: Map<String, Value>) -> Self {
        self.arguments = Some(arguments);
        self
    }
}

/// Result of a successful invocation
#[derive(Debug, Clone, PartialEq)]
pub struct InvokeToolOutput {
    pub route: ToolRoute,
    /// Raw backend result
    pub result: Value,
}

/// Use case for invoking a backend tool by unique identifier
pub struct InvokeToolUseCase {
    cache: Arc<ToolCache>,
    pool: Arc<BackendPool>,
}

impl InvokeToolUseCase {
    pub fn new(cache: Arc<ToolCache>, pool: Arc<BackendPool>) -> Self {
        Self { cache, pool }
    }

    pub async fn execute(&self, input: InvokeToolInput) -> Result<InvokeToolOutput, InvokeToolError> {
        if input.tool_name.is_empty() {
            return Err(InvokeToolError::MissingToolName);
        }

        let Some(route) = self.cache.resolve_route(&input.tool_name) else {
            warn!(tool = %input.tool_name, "Invocation of unknown tool");
            return Err(InvokeToolError::UnknownTool(input.tool_name));
        };

        debug!(tool = %input.tool_name, route = %route, "Invoking tool");

        let result = self
            .pool
            .route(
                &route.backend_id,
                &route.original_name,
                input.arguments.unwrap_or_default(),
            )
            .await?;

        Ok(InvokeToolOutput { route, result })
    }
}
