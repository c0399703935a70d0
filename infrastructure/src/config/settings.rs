//! Proxy settings (raw TOML structure)
//!
//! ```toml
//! backends_path = "mcp_servers.json"
//!
//! [search]
//! region = "us-east-1"
//! profile = "dev"
//! model_id = "us.anthropic.claude-sonnet-4-5-20250929-v1:0"
//!
//! [backends]
//! call_timeout_secs = 120
//! parallel_connect = true
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use toolsearch_application::{DiscoveryOptions, PoolOptions};
use toolsearch_domain::SearchCapabilityDescriptor;

use super::ConfigLoadError;

/// Complete settings file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    /// Path of the backend configuration document (JSON)
    pub backends_path: PathBuf,
    pub search: SearchSettings,
    pub backends: BackendSettings,
}

impl Default for ProxySettings {
    fn default() -> Self {
        Self {
            backends_path: PathBuf::from("mcp_servers.json"),
            search: SearchSettings::default(),
            backends: BackendSettings::default(),
        }
    }
}

/// `[search]` section: the Bedrock tool-search capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// AWS region (default: "us-east-1")
    pub region: String,
    /// AWS profile name for credentials
    pub profile: Option<String>,
    /// Bedrock model that runs the search tool
    pub model_id: String,
    /// Capability type tag sent as the first request tool
    pub tool_type: String,
    /// Capability name sent as the first request tool
    pub tool_name: String,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    pub default_max_results: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        let descriptor = SearchCapabilityDescriptor::default();
        Self {
            region: "us-east-1".to_string(),
            profile: None,
            model_id: "us.anthropic.claude-sonnet-4-5-20250929-v1:0".to_string(),
            tool_type: descriptor.tool_type,
            tool_name: descriptor.name,
            max_tokens: 2048,
            timeout_secs: 60,
            default_max_results: toolsearch_domain::DEFAULT_MAX_RESULTS,
        }
    }
}

/// `[backends]` section: connection pool behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    pub call_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub parallel_connect: bool,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            call_timeout_secs: 120,
            connect_timeout_secs: 30,
            parallel_connect: true,
        }
    }
}

impl ProxySettings {
    /// Reject settings the proxy cannot run with.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        let invalid = |field: &str, reason: &str| ConfigLoadError::Invalid {
            field: field.to_string(),
            reason: reason.to_string(),
        };

        if self.search.model_id.trim().is_empty() {
            return Err(invalid("search.model_id", "must not be empty"));
        }
        if self.search.tool_type.trim().is_empty() {
            return Err(invalid("search.tool_type", "must not be empty"));
        }
        if self.search.tool_name.trim().is_empty() {
            return Err(invalid("search.tool_name", "must not be empty"));
        }
        if self.search.max_tokens == 0 {
            return Err(invalid("search.max_tokens", "must be at least 1"));
        }
        if self.search.timeout_secs == 0 {
            return Err(invalid("search.timeout_secs", "must be at least 1"));
        }
        if self.search.default_max_results == 0 {
            return Err(invalid("search.default_max_results", "must be at least 1"));
        }
        if self.backends.call_timeout_secs == 0 {
            return Err(invalid("backends.call_timeout_secs", "must be at least 1"));
        }
        if self.backends.connect_timeout_secs == 0 {
            return Err(invalid("backends.connect_timeout_secs", "must be at least 1"));
        }
        Ok(())
    }

    pub fn search_capability(&self) -> SearchCapabilityDescriptor {
        SearchCapabilityDescriptor::new(&self.search.tool_type, &self.search.tool_name)
    }

    pub fn pool_options(&self) -> PoolOptions {
        PoolOptions {
            connect_timeout: Duration::from_secs(self.backends.connect_timeout_secs),
            call_timeout: Duration::from_secs(self.backends.call_timeout_secs),
            parallel_connect: self.backends.parallel_connect,
        }
    }

    pub fn discovery_options(&self) -> DiscoveryOptions {
        DiscoveryOptions {
            search_capability: self.search_capability(),
            search_timeout: Duration::from_secs(self.search.timeout_secs),
            default_max_results: self.search.default_max_results,
        }
    }
}
