//! An established MCP client session with one backend.

use std::borrow::Cow;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use rmcp::{
    RoleClient,
    model::{CallToolRequestParam, Tool},
    service::{Peer, RunningService},
};
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use toolsearch_application::{BackendConnection, BackendError, BackendTool};
use tracing::debug;

pub(crate) type McpClient = RunningService<RoleClient, ()>;

/// MCP session with one backend, independent of the transport it runs on.
pub struct McpConnection {
    backend_id: String,
    peer: Peer<RoleClient>,
    /// Taken on close; cancelling the service stops the transport
    service: Mutex<Option<McpClient>>,
    closed: AtomicBool,
}

impl McpConnection {
    pub(crate) fn new(backend_id: impl Into<String>, service: McpClient) -> Self {
        Self {
            backend_id: backend_id.into(),
            peer: service.peer().clone(),
            service: Mutex::new(Some(service)),
            closed: AtomicBool::new(false),
        }
    }

    fn ensure_open(&self) -> Result<(), BackendError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(BackendError::Closed);
        }
        Ok(())
    }
}

/// Convert an advertised MCP tool. An empty schema object counts as absent.
pub fn to_backend_tool(tool: Tool) -> BackendTool {
    let input_schema = if tool.input_schema.is_empty() {
        None
    } else {
        Some(Value::Object(tool.input_schema.as_ref().clone()))
    };

    BackendTool {
        name: tool.name.to_string(),
        description: tool.description.map(|d| d.to_string()),
        input_schema,
    }
}

#[async_trait]
impl BackendConnection for McpConnection {
    fn backend_id(&self) -> &str {
        &self.backend_id
    }

    async fn list_tools(&self) -> Result<Vec<BackendTool>, BackendError> {
        self.ensure_open()?;
        let tools = self
            .peer
            .list_all_tools()
            .await
            .map_err(|e| BackendError::ListTools(e.to_string()))?;
        Ok(tools.into_iter().map(to_backend_tool).collect())
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: Map<String, Value>,
    ) -> Result<Value, BackendError> {
        self.ensure_open()?;
        debug!(backend = %self.backend_id, tool = name, "Calling backend tool");

        let request = CallToolRequestParam {
            name: Cow::Owned(name.to_string()),
            arguments: Some(arguments),
        };
        let result = self
            .peer
            .call_tool(request)
            .await
            .map_err(|e| BackendError::CallFailed(e.to_string()))?;

        serde_json::to_value(&result).map_err(|e| BackendError::CallFailed(e.to_string()))
    }

    async fn close(&self) -> Result<(), BackendError> {
        self.closed.store(true, Ordering::Release);
        let Some(service) = self.service.lock().await.take() else {
            return Ok(());
        };

        let reason = service
            .cancel()
            .await
            .map_err(|e| BackendError::CloseFailed(e.to_string()))?;
        debug!(backend = %self.backend_id, reason = ?reason, "Backend session closed");
        Ok(())
    }
}
