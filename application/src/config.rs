//! Application-level configuration.
//!
//! Runtime knobs for the backend pool and the discovery use case. Built by
//! the binary from the loaded settings file.

use std::time::Duration;

use toolsearch_domain::{DEFAULT_MAX_RESULTS, SearchCapabilityDescriptor};

/// Backend pool behavior.
#[derive(Debug, Clone)]
pub struct PoolOptions {
    /// Deadline for connecting to a backend and listing its tools
    pub connect_timeout: Duration,
    /// Deadline for a single tool call
    pub call_timeout: Duration,
    /// Connect to all backends concurrently at startup
    pub parallel_connect: bool,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            call_timeout: Duration::from_secs(120),
            parallel_connect: true,
        }
    }
}

/// Discovery behavior.
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    /// Descriptor placed first in every search request
    pub search_capability: SearchCapabilityDescriptor,
    /// Deadline for one search invocation
    pub search_timeout: Duration,
    /// Number of references returned when the caller does not say
    pub default_max_results: usize,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            search_capability: SearchCapabilityDescriptor::default(),
            search_timeout: Duration::from_secs(60),
            default_max_results: DEFAULT_MAX_RESULTS,
        }
    }
}
