//! AWS Bedrock tool-search capability
//!
//! Runs the search on a Claude model through the Bedrock `InvokeModel` API,
//! authenticated with the standard AWS credential chain.

mod search;
mod types;

pub use search::BedrockToolSearch;
pub use types::{ANTHROPIC_VERSION, TOOL_SEARCH_BETA, build_request_body};
