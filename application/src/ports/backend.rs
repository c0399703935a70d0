//! Backend port
//!
//! Defines how the application layer talks to tool-providing backends.
//! A [`BackendConnector`] opens a [`BackendConnection`] from a
//! [`BackendConfig`]; the connection then lists and calls tools until it is
//! closed. Transport variants (subprocess, remote HTTP) live behind these
//! traits in the infrastructure layer.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;
use toolsearch_domain::{BackendConfig, ToolDefinition};

/// Errors raised by a single backend connection.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Failed to list tools: {0}")]
    ListTools(String),

    #[error("Tool call failed: {0}")]
    CallFailed(String),

    #[error("Failed to close connection: {0}")]
    CloseFailed(String),

    #[error("Connection closed")]
    Closed,

    #[error("Timed out after {0:?}")]
    Timeout(std::time::Duration),
}

/// A tool exactly as a backend advertises it.
///
/// Description and input schema are optional on the wire; defaults are
/// applied when the tool is turned into a [`ToolDefinition`].
#[derive(Debug, Clone, PartialEq)]
pub struct BackendTool {
    pub name: String,
    pub description: Option<String>,
    pub input_schema: Option<Value>,
}

impl BackendTool {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            input_schema: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_input_schema(mut self, schema: Value) -> Self {
        self.input_schema = Some(schema);
        self
    }

    /// Translate into a definition: missing description → `""`,
    /// missing schema → empty object schema.
    pub fn into_definition(self) -> ToolDefinition {
        ToolDefinition::new(
            self.name,
            self.description.unwrap_or_default(),
            self.input_schema
                .unwrap_or_else(ToolDefinition::empty_object_schema),
        )
    }
}

/// A live connection to one backend.
///
/// Implementations must tolerate concurrent `call_tool` invocations, either
/// natively or by serializing internally.
#[async_trait]
pub trait BackendConnection: Send + Sync {
    /// Identifier of the backend this connection belongs to
    fn backend_id(&self) -> &str;

    /// Enumerate the backend's tools
    async fn list_tools(&self) -> Result<Vec<BackendTool>, BackendError>;

    /// Invoke a tool by its original name and return the raw result document
    async fn call_tool(
        &self,
        name: &str,
        arguments: Map<String, Value>,
    ) -> Result<Value, BackendError>;

    /// Close the connection. Calling it more than once is harmless.
    async fn close(&self) -> Result<(), BackendError>;
}

/// Opens connections according to a backend's transport configuration.
#[async_trait]
pub trait BackendConnector: Send + Sync {
    async fn connect(&self, config: &BackendConfig)
    -> Result<Arc<dyn BackendConnection>, BackendError>;
}
