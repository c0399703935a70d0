//! Use cases
//!
//! The two operations the proxy exposes upstream.

pub mod discover_tools;
pub mod invoke_tool;
