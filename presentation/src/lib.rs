//! Presentation layer for toolsearch-proxy
//!
//! This crate contains the MCP server surface the upstream agent talks to,
//! CLI definitions, and console output for the status command.

pub mod cli;
pub mod output;
pub mod server;

// Re-export commonly used types
pub use cli::commands::{Cli, Command, StatusFormat};
pub use output::status::{StatusFormatter, StatusReport};
pub use server::{ProxyServer, SERVER_INSTRUCTIONS};
