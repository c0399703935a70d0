//! Search response unpacking
//!
//! The search service answers with a sequence of typed content blocks. Only
//! the search-result variant matters here; every other block type is
//! ignored, including types this crate has never seen.

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::core::string::truncate_chars;
use crate::tool::cache::ToolCache;

/// Number of references returned when the caller does not say.
pub const DEFAULT_MAX_RESULTS: usize = 5;

/// Maximum characters of a tool description shown in discovery results.
pub const DESCRIPTION_PREVIEW_CHARS: usize = 200;

/// Response from the external search capability.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub content: Vec<ResponseBlock>,
}

/// A content block, discriminated by its `type` tag.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseBlock {
    /// Search result block carrying matched tool references
    ToolSearchToolResult {
        #[serde(default)]
        tool_use_id: Option<String>,
        content: SearchResultContent,
    },
    Text {
        #[serde(default)]
        text: String,
    },
    #[serde(other)]
    Other,
}

/// Payload of a search result block.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SearchResultContent {
    ToolSearchToolSearchResult {
        #[serde(default)]
        tool_references: Vec<ToolReference>,
    },
    ToolSearchToolResultError {
        #[serde(default)]
        error_code: Option<String>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ToolReference {
    pub tool_name: String,
}

/// The search service answered with something that is not a response document.
#[derive(Error, Debug)]
pub enum SearchProtocolError {
    #[error("empty response body")]
    EmptyBody,

    #[error("invalid response document: {0}")]
    InvalidDocument(#[from] serde_json::Error),
}

impl SearchResponse {
    /// Parse a raw response body.
    pub fn from_slice(body: &[u8]) -> Result<Self, SearchProtocolError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(SearchProtocolError::EmptyBody);
        }
        Ok(serde_json::from_slice(body)?)
    }

    /// Concatenated text blocks (diagnostics only).
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|block| match block {
                ResponseBlock::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Collect referenced tool names in service order, truncated to `max_results`.
///
/// The order is relevance-significant and is never re-sorted. A response
/// without any search result block yields an empty list.
pub fn extract_references(response: &SearchResponse, max_results: usize) -> Vec<String> {
    let mut references = Vec::new();

    for block in &response.content {
        let ResponseBlock::ToolSearchToolResult { content, .. } = block else {
            continue;
        };
        match content {
            SearchResultContent::ToolSearchToolSearchResult { tool_references } => {
                references.extend(tool_references.iter().map(|r| r.tool_name.clone()));
            }
            SearchResultContent::ToolSearchToolResultError { error_code } => {
                debug!(error_code = ?error_code, "Search capability reported an error block");
            }
            SearchResultContent::Other => {}
        }
    }

    references.truncate(max_results);
    references
}

/// A discovered tool as shown to the caller.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ToolMatch {
    pub name: String,
    pub description: String,
}

/// Attach a short description to each reference.
///
/// References missing from the cache are kept with an empty description.
pub fn enrich(references: &[String], cache: &ToolCache) -> Vec<ToolMatch> {
    references
        .iter()
        .map(|name| ToolMatch {
            name: name.clone(),
            description: cache
                .lookup(name)
                .map(|tool| truncate_chars(&tool.definition.description, DESCRIPTION_PREVIEW_CHARS))
                .unwrap_or_default(),
        })
        .collect()
}
