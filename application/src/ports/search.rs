//! Search capability port
//!
//! Defines the interface to the external search capability that ranks tool
//! definitions against a query.

use async_trait::async_trait;
use thiserror::Error;
use toolsearch_domain::{SearchRequest, SearchResponse};

/// Errors that can occur while invoking the search capability
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Search capability unavailable: {0}")]
    Unavailable(String),

    #[error("Search request failed: {0}")]
    RequestFailed(String),

    #[error("Malformed search response: {0}")]
    MalformedResponse(String),

    #[error("Search timed out")]
    Timeout,
}

/// External search capability
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait SearchCapability: Send + Sync {
    /// Send the request and return the parsed response
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError>;
}
