//! MCP backend adapter
//!
//! Implements the backend ports over `rmcp`: a child process speaking MCP on
//! stdin/stdout, or a remote server over streamable HTTP. Both variants end
//! up as the same [`McpConnection`] once the handshake is done.

mod connection;
mod connector;

pub use connection::{McpConnection, to_backend_tool};
pub use connector::McpBackendConnector;
