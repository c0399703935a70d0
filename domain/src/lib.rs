//! Domain layer for toolsearch-proxy
//!
//! This crate contains the core types and pure logic of the proxy. It has no
//! dependencies on transports, the search service, or configuration files.
//!
//! # Core Concepts
//!
//! ## Unique tool identifiers
//!
//! Every backend tool is exposed under `backend_id + "__" + original_name`.
//! The [`ToolCache`] maps that identifier back to a [`ToolRoute`].
//!
//! ## Search delegation
//!
//! Discovery is delegated to an external search capability. The request
//! carries every cached definition marked for deferred loading; the response
//! is a sequence of typed content blocks from which tool references are
//! extracted in relevance order.

pub mod backend;
pub mod core;
pub mod search;
pub mod tool;

// Re-export commonly used types
pub use backend::{
    BackendConfig, BackendEntry, BackendTransport, ConfigError, HttpTransport, StdioTransport,
};
pub use core::string::truncate_chars;
pub use search::{
    DEFAULT_MAX_RESULTS, DESCRIPTION_PREVIEW_CHARS, ResponseBlock, SearchCapabilityDescriptor,
    SearchProtocolError, SearchRequest, SearchResponse, SearchResultContent, ToolMatch, ToolReference,
    build_search_request, enrich, extract_references,
};
pub use tool::{
    CachedTool, RegistrationReport, ReplacedEntry, TOOL_ID_SEPARATOR, ToolCache, ToolDefinition,
    ToolRoute, unique_tool_id,
};
