//! Tool domain entities

use serde::{Deserialize, Serialize};

/// Separator between backend identifier and original tool name.
pub const TOOL_ID_SEPARATOR: &str = "__";

/// Build the globally-unique identifier for a backend tool.
///
/// `unique_tool_id("github", "create_issue")` → `"github__create_issue"`.
pub fn unique_tool_id(backend_id: &str, original_name: &str) -> String {
    format!("{backend_id}{TOOL_ID_SEPARATOR}{original_name}")
}

/// Definition of a tool as advertised to the search capability.
///
/// Serializes to the shape expected in a model `tools` array
/// (`name`, `description`, `input_schema`, optional `defer_loading`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name (the unique identifier once registered in the cache)
    pub name: String,
    /// Human-readable description
    #[serde(default)]
    pub description: String,
    /// JSON Schema for the tool's input (opaque document)
    pub input_schema: serde_json::Value,
    /// Defer materialization of this definition until it is selected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defer_loading: Option<bool>,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
            defer_loading: None,
        }
    }

    /// Schema used when a backend advertises no input schema.
    pub fn empty_object_schema() -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {},
        })
    }

    /// Return a copy carrying a different name.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Return a copy marked for deferred materialization.
    pub fn deferred(&self) -> Self {
        Self {
            defer_loading: Some(true),
            ..self.clone()
        }
    }

    pub fn is_deferred(&self) -> bool {
        self.defer_loading.unwrap_or(false)
    }
}

/// A backend tool registered in the [`ToolCache`](super::cache::ToolCache).
///
/// Created once per backend tool at registration; never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedTool {
    /// Owning backend identifier
    pub backend_id: String,
    /// Name as known to the backend
    pub original_name: String,
    /// `backend_id + "__" + original_name`
    pub unique_id: String,
    /// Definition rewritten to carry `unique_id` as its name
    pub definition: ToolDefinition,
}

impl CachedTool {
    pub fn new(backend_id: impl Into<String>, definition: &ToolDefinition) -> Self {
        let backend_id = backend_id.into();
        let unique_id = unique_tool_id(&backend_id, &definition.name);
        Self {
            original_name: definition.name.clone(),
            definition: definition.renamed(unique_id.clone()),
            backend_id,
            unique_id,
        }
    }

    /// Dispatch projection of this tool.
    pub fn route(&self) -> ToolRoute {
        ToolRoute {
            backend_id: self.backend_id.clone(),
            original_name: self.original_name.clone(),
        }
    }
}

/// Where a call for a unique identifier must be sent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ToolRoute {
    pub backend_id: String,
    pub original_name: String,
}

impl std::fmt::Display for ToolRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.backend_id, self.original_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_tool_id() {
        assert_eq!(unique_tool_id("github", "create_issue"), "github__create_issue");
    }

    #[test]
    fn test_cached_tool_rewrites_name() {
        let def = ToolDefinition::new("read", "Read a file", ToolDefinition::empty_object_schema());
        let cached = CachedTool::new("fs", &def);

        assert_eq!(cached.unique_id, "fs__read");
        assert_eq!(cached.original_name, "read");
        assert_eq!(cached.definition.name, "fs__read");
        assert_eq!(cached.definition.description, "Read a file");
        assert_eq!(
            cached.route(),
            ToolRoute {
                backend_id: "fs".to_string(),
                original_name: "read".to_string(),
            }
        );
    }

    #[test]
    fn test_deferred_serialization() {
        let def = ToolDefinition::new("a__x", "", ToolDefinition::empty_object_schema());
        let plain = serde_json::to_value(&def).unwrap();
        assert!(plain.get("defer_loading").is_none());

        let deferred = serde_json::to_value(def.deferred()).unwrap();
        assert_eq!(deferred["defer_loading"], serde_json::json!(true));
        assert_eq!(deferred["input_schema"]["type"], "object");
    }

    #[test]
    fn test_original_name_with_separator() {
        let def = ToolDefinition::new("get__item", "", ToolDefinition::empty_object_schema());
        let cached = CachedTool::new("db", &def);
        assert_eq!(cached.unique_id, "db__get__item");
        assert_eq!(cached.route().original_name, "get__item");
    }
}
