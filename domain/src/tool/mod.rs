//! Tool domain module
//!
//! Tool identity and indexing for the proxy. Every backend tool is known to
//! the upstream agent only by its **unique identifier**
//! (`backend_id + "__" + original_name`):
//!
//! ```text
//! ┌──────────────────┐   register   ┌──────────────┐   resolve_route   ┌───────────┐
//! │ ToolDefinition   │─────────────▶│ ToolCache    │──────────────────▶│ ToolRoute │
//! │ (from backend)   │              │ a__x → tool  │                   │ (a, x)    │
//! └──────────────────┘              └──────────────┘                   └───────────┘
//! ```
//!
//! # Key Types
//!
//! - [`ToolDefinition`]: name, description, input schema, defer flag
//! - [`CachedTool`]: a registered tool with its backend origin
//! - [`ToolRoute`]: `(backend_id, original_name)` dispatch target
//! - [`ToolCache`]: the unique-identifier index

pub mod cache;
pub mod entities;

pub use cache::{RegistrationReport, ReplacedEntry, ToolCache};
pub use entities::{CachedTool, TOOL_ID_SEPARATOR, ToolDefinition, ToolRoute, unique_tool_id};
