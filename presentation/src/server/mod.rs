//! Upstream MCP surface
//!
//! The agent connected to the proxy sees exactly two tools,
//! [`DISCOVER_TOOLS`] and [`INVOKE_TOOL`]. Everything else stays behind them.

mod handler;
mod payload;
mod tools;

pub use handler::{ProxyServer, SERVER_INSTRUCTIONS};
pub use payload::{discover_payload, invoke_result, text_result};
pub use tools::{
    DISCOVER_TOOLS, INVOKE_TOOL, discover_tool, invoke_tool, parse_discover_args,
    parse_invoke_args,
};
