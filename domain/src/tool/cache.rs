//! Tool Cache
//!
//! The [`ToolCache`] indexes every backend tool under its unique identifier
//! (`backend__original`) and remembers which backend owns it.
//!
//! ```text
//! register("a", [x, y])  ──▶  a__x → (a, x, def)
//!                             a__y → (a, y, def)
//! register("b", [x])     ──▶  b__x → (b, x, def)
//! ```
//!
//! Writes happen while backends are registered at startup; steady-state
//! request handling only reads. Entries keep their first registration slot,
//! so [`ToolCache::all_definitions`] is stable in registration order.
//!
//! # Collisions
//!
//! If two registrations compute the same identifier the later one replaces
//! the earlier one. The replacement is reported back in the
//! [`RegistrationReport`] so callers can log it.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use super::entities::{CachedTool, ToolDefinition, ToolRoute};

/// An identifier whose previous entry was replaced during registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacedEntry {
    pub unique_id: String,
    /// Backend that owned the identifier before the replacement
    pub previous_backend: String,
}

/// Outcome of a [`ToolCache::register`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationReport {
    /// Number of definitions stored
    pub registered: usize,
    /// Identifiers that overwrote an existing entry
    pub replaced: Vec<ReplacedEntry>,
}

impl RegistrationReport {
    pub fn has_collisions(&self) -> bool {
        !self.replaced.is_empty()
    }
}

#[derive(Debug, Default)]
struct CacheInner {
    tools: HashMap<String, CachedTool>,
    /// Unique identifiers in registration order
    order: Vec<String>,
}

/// Index from unique tool identifier to its backend origin and definition.
#[derive(Debug, Default)]
pub struct ToolCache {
    inner: RwLock<CacheInner>,
}

impl ToolCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every definition under `backend_id + "__" + name`.
    pub fn register(&self, backend_id: &str, definitions: &[ToolDefinition]) -> RegistrationReport {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let mut report = RegistrationReport::default();

        for definition in definitions {
            let cached = CachedTool::new(backend_id, definition);
            let key = cached.unique_id.clone();

            match inner.tools.insert(key.clone(), cached) {
                Some(previous) => report.replaced.push(ReplacedEntry {
                    unique_id: key,
                    previous_backend: previous.backend_id,
                }),
                None => inner.order.push(key),
            }
            report.registered += 1;
        }

        report
    }

    /// All registered definitions (named by unique identifier), in registration order.
    pub fn all_definitions(&self) -> Vec<ToolDefinition> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner
            .order
            .iter()
            .filter_map(|id| inner.tools.get(id))
            .map(|tool| tool.definition.clone())
            .collect()
    }

    pub fn lookup(&self, unique_id: &str) -> Option<CachedTool> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.tools.get(unique_id).cloned()
    }

    /// Resolve a unique identifier to the backend and name it must be dispatched to.
    pub fn resolve_route(&self, unique_id: &str) -> Option<ToolRoute> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.tools.get(unique_id).map(CachedTool::route)
    }

    pub fn size(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .tools
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    pub fn list_identifiers(&self) -> Vec<String> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .order
            .clone()
    }

    /// Identifiers owned by one backend, in registration order.
    pub fn identifiers_for_backend(&self, backend_id: &str) -> Vec<String> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner
            .order
            .iter()
            .filter(|id| {
                inner
                    .tools
                    .get(*id)
                    .is_some_and(|tool| tool.backend_id == backend_id)
            })
            .cloned()
            .collect()
    }

    /// Drop every entry (teardown only).
    pub fn clear(&self) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.tools.clear();
        inner.order.clear();
    }
}
