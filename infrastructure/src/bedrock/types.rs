//! Wire conversions for the Bedrock InvokeModel API
//!
//! Builds the Anthropic Messages request body for a search and converts SDK
//! errors to [`SearchError`].

use aws_sdk_bedrockruntime::error::SdkError;
use aws_sdk_bedrockruntime::operation::invoke_model::InvokeModelError;
use serde_json::{Value, json};
use toolsearch_application::SearchError;
use toolsearch_domain::{SearchProtocolError, SearchRequest};

pub const ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";

/// Beta flag that enables deferred tool loading and the search tools.
pub const TOOL_SEARCH_BETA: &str = "tool-search-tool-2025-10-19";

const SYSTEM_PROMPT: &str = "You select tools. Use the tool search tool to find the tools \
that best match the user's request. Do not answer the request yourself.";

/// Build the Messages API body for one search request.
pub fn build_request_body(request: &SearchRequest, max_tokens: u32) -> Value {
    json!({
        "anthropic_version": ANTHROPIC_VERSION,
        "anthropic_beta": [TOOL_SEARCH_BETA],
        "max_tokens": max_tokens,
        "system": SYSTEM_PROMPT,
        "messages": [
            {"role": "user", "content": request.query},
        ],
        "tools": request.tools(),
    })
}

pub fn convert_protocol_error(err: SearchProtocolError) -> SearchError {
    SearchError::MalformedResponse(err.to_string())
}

/// Convert a Bedrock SDK error to a SearchError.
pub fn convert_invoke_error(err: &SdkError<InvokeModelError>) -> SearchError {
    match err {
        SdkError::ServiceError(service_err) => match service_err.err() {
            InvokeModelError::ThrottlingException(e) => {
                SearchError::RequestFailed(format!("Bedrock throttled: {}", e))
            }
            InvokeModelError::ModelNotReadyException(e) => {
                SearchError::Unavailable(format!("Bedrock model not ready: {}", e))
            }
            InvokeModelError::AccessDeniedException(e) => {
                SearchError::Unavailable(format!("Bedrock access denied: {}", e))
            }
            InvokeModelError::ResourceNotFoundException(e) => {
                SearchError::Unavailable(format!("Bedrock model not found: {}", e))
            }
            InvokeModelError::ValidationException(e) => {
                SearchError::RequestFailed(format!("Bedrock validation error: {}", e))
            }
            InvokeModelError::ModelTimeoutException(_) => SearchError::Timeout,
            other => SearchError::RequestFailed(format!("Bedrock error: {:?}", other)),
        },
        other => SearchError::Unavailable(format!("Bedrock SDK error: {}", other)),
    }
}
