//! Application layer for toolsearch-proxy
//!
//! This crate contains the backend pool, the discover/invoke use cases, and
//! the port definitions their adapters implement. It depends only on the
//! domain layer.

pub mod config;
pub mod pool;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{DiscoveryOptions, PoolOptions};
pub use pool::{BackendPool, ConnectedBackend, FailedBackend, InitializeReport, PoolError};
pub use ports::{
    backend::{BackendConnection, BackendConnector, BackendError, BackendTool},
    search::{SearchCapability, SearchError},
};
pub use use_cases::discover_tools::{
    DiscoverToolsError, DiscoverToolsInput, DiscoverToolsOutput, DiscoverToolsUseCase,
    DiscoveredTools,
};
pub use use_cases::invoke_tool::{
    InvokeToolError, InvokeToolInput, InvokeToolOutput, InvokeToolUseCase,
};
