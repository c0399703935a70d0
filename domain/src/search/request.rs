//! Search request construction

use serde::{Deserialize, Serialize};

use crate::tool::entities::ToolDefinition;

/// Descriptor of the external search capability itself.
///
/// Placed first in the request's tool list and never deferred, so the
/// search service always has it available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCapabilityDescriptor {
    /// Capability type tag, e.g. `tool_search_tool_regex_20251119`
    #[serde(rename = "type")]
    pub tool_type: String,
    /// Name the capability is registered under
    pub name: String,
}

impl SearchCapabilityDescriptor {
    pub fn new(tool_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            tool_type: tool_type.into(),
            name: name.into(),
        }
    }
}

impl Default for SearchCapabilityDescriptor {
    fn default() -> Self {
        Self::new("tool_search_tool_regex_20251119", "tool_search_tool_regex")
    }
}

/// One entry of the request's tool list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RequestTool {
    Capability(SearchCapabilityDescriptor),
    Candidate(ToolDefinition),
}

/// Request sent to the external search capability.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    /// The user's query, sent as plain text
    pub query: String,
    pub search_capability: SearchCapabilityDescriptor,
    /// Every cached definition, each marked for deferred materialization
    pub candidate_tools: Vec<ToolDefinition>,
}

impl SearchRequest {
    /// Tool list in wire order: the capability descriptor first, then candidates.
    pub fn tools(&self) -> Vec<RequestTool> {
        std::iter::once(RequestTool::Capability(self.search_capability.clone()))
            .chain(self.candidate_tools.iter().cloned().map(RequestTool::Candidate))
            .collect()
    }

    pub fn candidate_count(&self) -> usize {
        self.candidate_tools.len()
    }
}

/// Build a search request from the query and all cached definitions.
pub fn build_search_request(
    query: &str,
    definitions: &[ToolDefinition],
    search_capability: &SearchCapabilityDescriptor,
) -> SearchRequest {
    SearchRequest {
        query: query.to_string(),
        search_capability: search_capability.clone(),
        candidate_tools: definitions.iter().map(ToolDefinition::deferred).collect(),
    }
}
