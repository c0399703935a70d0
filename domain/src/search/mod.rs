//! Search delegation contract
//!
//! Discovery is delegated to an external search capability. This module
//! shapes the request ([`build_search_request`]) and unpacks the response
//! ([`extract_references`], [`enrich`]). The matching itself happens on the
//! other side of the contract.

pub mod request;
pub mod response;

pub use request::{RequestTool, SearchCapabilityDescriptor, SearchRequest, build_search_request};
pub use response::{
    DEFAULT_MAX_RESULTS, DESCRIPTION_PREVIEW_CHARS, ResponseBlock, SearchProtocolError,
    SearchResponse, SearchResultContent, ToolMatch, ToolReference, enrich, extract_references,
};
