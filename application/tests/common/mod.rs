//! Shared mock adapters for the end-to-end tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use toolsearch_application::{
    BackendConnection, BackendConnector, BackendError, BackendTool, SearchCapability, SearchError,
};
use toolsearch_domain::{BackendConfig, SearchRequest, SearchResponse};

/// Counts every `call_tool` across all connections it created.
#[derive(Default)]
pub struct MockConnector {
    tools: HashMap<String, Vec<BackendTool>>,
    failing: Vec<String>,
    pub calls: Arc<AtomicUsize>,
}

impl MockConnector {
    pub fn with_backend(mut self, id: &str, tools: &[&str]) -> Self {
        self.tools.insert(
            id.to_string(),
            tools
                .iter()
                .map(|name| BackendTool::new(*name).with_description(format!("{id} {name}")))
                .collect(),
        );
        self
    }

    pub fn with_failing(mut self, id: &str) -> Self {
        self.failing.push(id.to_string());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BackendConnector for MockConnector {
    async fn connect(
        &self,
        config: &BackendConfig,
    ) -> Result<Arc<dyn BackendConnection>, BackendError> {
        if self.failing.contains(&config.id) {
            return Err(BackendError::ConnectionFailed(format!(
                "cannot start {}",
                config.transport
            )));
        }
        Ok(Arc::new(MockConnection {
            id: config.id.clone(),
            tools: self.tools.get(&config.id).cloned().unwrap_or_default(),
            calls: self.calls.clone(),
        }))
    }
}

pub struct MockConnection {
    id: String,
    tools: Vec<BackendTool>,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl BackendConnection for MockConnection {
    fn backend_id(&self) -> &str {
        &self.id
    }

    async fn list_tools(&self) -> Result<Vec<BackendTool>, BackendError> {
        Ok(self.tools.clone())
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: Map<String, Value>,
    ) -> Result<Value, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(json!({
            "content": [{"type": "text", "text": format!("{}:{}", self.id, name)}],
            "isError": false,
            "echo": arguments,
        }))
    }

    async fn close(&self) -> Result<(), BackendError> {
        Ok(())
    }
}

/// Search capability that answers with a fixed reference list.
pub struct ScriptedSearch {
    references: Vec<String>,
    pub requests: Mutex<Vec<SearchRequest>>,
}

impl ScriptedSearch {
    pub fn new(references: &[&str]) -> Self {
        Self {
            references: references.iter().map(|s| s.to_string()).collect(),
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl SearchCapability for ScriptedSearch {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError> {
        self.requests.lock().unwrap().push(request.clone());
        let refs: Vec<Value> = self
            .references
            .iter()
            .map(|name| json!({"type": "tool_reference", "tool_name": name}))
            .collect();
        serde_json::from_value(json!({
            "content": [
                {"type": "server_tool_use", "id": "srvtoolu_1", "name": "tool_search_tool_regex", "input": {"pattern": ".*"}},
                {
                    "type": "tool_search_tool_result",
                    "tool_use_id": "srvtoolu_1",
                    "content": {"type": "tool_search_tool_search_result", "tool_references": refs}
                }
            ]
        }))
        .map_err(|e| SearchError::MalformedResponse(e.to_string()))
    }
}
