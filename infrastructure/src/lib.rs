//! Infrastructure layer for toolsearch-proxy
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: MCP backends, the Bedrock search capability,
//! and configuration file loading.

pub mod bedrock;
pub mod config;
pub mod mcp;

// Re-export commonly used types
pub use bedrock::BedrockToolSearch;
pub use config::{
    BackendDocument, BackendSettings, ConfigLoadError, ConfigLoader, ProxySettings,
    SearchSettings, load_backends, load_backends_or_empty, substitute_env_vars,
};
pub use mcp::{McpBackendConnector, McpConnection};
