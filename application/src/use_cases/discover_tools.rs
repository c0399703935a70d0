//! Discover tools use case
//!
//! Turns a free-text query into a short, relevance-ordered list of unique
//! tool identifiers by delegating to the external search capability.
//!
//! # Flow
//!
//! 1. **Validate** - reject an empty query
//! 2. **Short-circuit** - an empty cache yields [`DiscoverToolsOutput::NoToolsAvailable`]
//! 3. **Search** - every cached definition (deferred) plus the capability
//!    descriptor is sent to the search service, within a deadline
//! 4. **Unpack** - references are extracted in service order, truncated,
//!    and enriched with short descriptions from the cache

use std::sync::Arc;

use thiserror::Error;
use tokio::time::timeout;
use toolsearch_domain::{ToolCache, ToolMatch, build_search_request, enrich, extract_references};
use tracing::{debug, info};

use crate::config::DiscoveryOptions;
use crate::ports::search::{SearchCapability, SearchError};

/// Errors that can occur during discovery
#[derive(Error, Debug)]
pub enum DiscoverToolsError {
    #[error("query is required")]
    MissingQuery,

    #[error("Search failed: {0}")]
    Search(#[from] SearchError),
}

/// Input for the DiscoverTools use case
#[derive(Debug, Clone, Default)]
pub struct DiscoverToolsInput {
    pub query: String,
    /// Maximum references to return (falls back to the configured default)
    pub max_results: Option<usize>,
}

impl DiscoverToolsInput {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            max_results: None,
        }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = Some(max_results);
        self
    }
}

/// Result of a discovery request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoverToolsOutput {
    /// The cache is empty; there was nothing to search
    NoToolsAvailable,
    Found(DiscoveredTools),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredTools {
    pub query: String,
    /// Unique identifiers in relevance order
    pub tool_references: Vec<String>,
    pub tools: Vec<ToolMatch>,
    /// Number of candidates that were searched
    pub total_tools_available: usize,
}

/// Use case for discovering tools
pub struct DiscoverToolsUseCase {
    cache: Arc<ToolCache>,
    search: Arc<dyn SearchCapability>,
    options: DiscoveryOptions,
}

impl DiscoverToolsUseCase {
    pub fn new(cache: Arc<ToolCache>, search: Arc<dyn SearchCapability>) -> Self {
        Self::with_options(cache, search, DiscoveryOptions::default())
    }

    pub fn with_options(
        cache: Arc<ToolCache>,
        search: Arc<dyn SearchCapability>,
        options: DiscoveryOptions,
    ) -> Self {
        Self {
            cache,
            search,
            options,
        }
    }

    pub async fn execute(
        &self,
        input: DiscoverToolsInput,
    ) -> Result<DiscoverToolsOutput, DiscoverToolsError> {
        let query = input.query.trim();
        if query.is_empty() {
            return Err(DiscoverToolsError::MissingQuery);
        }

        let definitions = self.cache.all_definitions();
        if definitions.is_empty() {
            info!("Discovery requested but no tools are available");
            return Ok(DiscoverToolsOutput::NoToolsAvailable);
        }

        let max_results = match input.max_results {
            Some(n) if n > 0 => n,
            _ => self.options.default_max_results,
        };

        let request = build_search_request(query, &definitions, &self.options.search_capability);
        debug!(
            query = %query,
            candidates = request.candidate_count(),
            max_results,
            "Delegating tool search"
        );

        let response = timeout(self.options.search_timeout, self.search.search(&request))
            .await
            .map_err(|_| SearchError::Timeout)??;

        let tool_references = extract_references(&response, max_results);
        let tools = enrich(&tool_references, &self.cache);

        info!(
            query = %query,
            matches = tool_references.len(),
            candidates = definitions.len(),
            "Tool search completed"
        );

        Ok(DiscoverToolsOutput::Found(DiscoveredTools {
            query: query.to_string(),
            tool_references,
            tools,
            total_tools_available: definitions.len(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;
    use toolsearch_domain::{SearchRequest, SearchResponse, ToolDefinition};

    /// Search capability returning a canned response and recording requests
    struct MockSearch {
        references: Vec<&'static str>,
        fail: bool,
        delay: Option<Duration>,
        requests: Mutex<Vec<SearchRequest>>,
    }

    impl MockSearch {
        fn returning(references: Vec<&'static str>) -> Self {
            Self {
                references,
                fail: false,
                delay: None,
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl SearchCapability for MockSearch {
        async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError> {
            self.requests.lock().unwrap().push(request.clone());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail {
                return Err(SearchError::RequestFailed("throttled".into()));
            }
            let refs: Vec<_> = self
                .references
                .iter()
                .map(|n| serde_json::json!({"type": "tool_reference", "tool_name": n}))
                .collect();
            Ok(serde_json::from_value(serde_json::json!({
                "content": [
                    {"type": "text", "text": "Searching"},
                    {
                        "type": "tool_search_tool_result",
                        "tool_use_id": "srvtoolu_1",
                        "content": {"type": "tool_search_tool_search_result", "tool_references": refs}
                    }
                ]
            }))
            .unwrap())
        }
    }

    fn populated_cache() -> Arc<ToolCache> {
        let cache = Arc::new(ToolCache::new());
        let defs: Vec<ToolDefinition> = ["one", "two", "three", "four", "five"]
            .iter()
            .map(|n| ToolDefinition::new(*n, format!("Tool {}", n), ToolDefinition::empty_object_schema()))
            .collect();
        cache.register("a", &defs);
        cache
    }

    #[tokio::test]
    async fn test_empty_query_rejected() {
        let use_case = DiscoverToolsUseCase::new(populated_cache(), Arc::new(MockSearch::returning(vec![])));
        let err = use_case.execute(DiscoverToolsInput::new("   ")).await.unwrap_err();
        assert!(matches!(err, DiscoverToolsError::MissingQuery));
    }

    #[tokio::test]
    async fn test_empty_cache_reports_no_tools() {
        let search = Arc::new(MockSearch::returning(vec!["a__one"]));
        let use_case = DiscoverToolsUseCase::new(Arc::new(ToolCache::new()), search.clone());

        let output = use_case.execute(DiscoverToolsInput::new("anything")).await.unwrap();
        assert_eq!(output, DiscoverToolsOutput::NoToolsAvailable);
        assert!(search.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_max_results_keeps_first_in_order() {
        let search = Arc::new(MockSearch::returning(vec![
            "a__three", "a__one", "a__five", "a__two", "a__four",
        ]));
        let use_case = DiscoverToolsUseCase::new(populated_cache(), search);

        let output = use_case
            .execute(DiscoverToolsInput::new("x").with_max_results(2))
            .await
            .unwrap();

        let DiscoverToolsOutput::Found(found) = output else {
            panic!("expected matches");
        };
        assert_eq!(found.tool_references, vec!["a__three", "a__one"]);
        assert_eq!(found.tools[0].description, "Tool three");
        assert_eq!(found.total_tools_available, 5);
        assert_eq!(found.query, "x");
    }

    #[tokio::test]
    async fn test_default_max_results() {
        let search = Arc::new(MockSearch::returning(vec![
            "a__one", "a__two", "a__three", "a__four", "a__five", "a__one",
        ]));
        let use_case = DiscoverToolsUseCase::new(populated_cache(), search);

        for input in [DiscoverToolsInput::new("x"), DiscoverToolsInput::new("x").with_max_results(0)] {
            let DiscoverToolsOutput::Found(found) = use_case.execute(input).await.unwrap() else {
                panic!("expected matches");
            };
            assert_eq!(found.tool_references.len(), 5);
        }
    }

    #[tokio::test]
    async fn test_request_shape() {
        let search = Arc::new(MockSearch::returning(vec![]));
        let use_case = DiscoverToolsUseCase::new(populated_cache(), search.clone());
        use_case.execute(DiscoverToolsInput::new("  read files ")).await.unwrap();

        let requests = search.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].query, "read files");
        assert_eq!(requests[0].candidate_count(), 5);
        assert!(requests[0].candidate_tools.iter().all(ToolDefinition::is_deferred));
    }

    #[tokio::test]
    async fn test_no_matches_is_not_an_error() {
        let use_case = DiscoverToolsUseCase::new(populated_cache(), Arc::new(MockSearch::returning(vec![])));
        let DiscoverToolsOutput::Found(found) =
            use_case.execute(DiscoverToolsInput::new("nothing")).await.unwrap()
        else {
            panic!("expected found");
        };
        assert!(found.tool_references.is_empty());
        assert!(found.tools.is_empty());
    }

    #[tokio::test]
    async fn test_search_failure_propagates() {
        let mut search = MockSearch::returning(vec![]);
        search.fail = true;
        let use_case = DiscoverToolsUseCase::new(populated_cache(), Arc::new(search));

        let err = use_case.execute(DiscoverToolsInput::new("x")).await.unwrap_err();
        assert!(err.to_string().contains("throttled"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_timeout() {
        let mut search = MockSearch::returning(vec![]);
        search.delay = Some(Duration::from_secs(300));
        let use_case = DiscoverToolsUseCase::with_options(
            populated_cache(),
            Arc::new(search),
            DiscoveryOptions {
                search_timeout: Duration::from_secs(1),
                ..DiscoveryOptions::default()
            },
        );

        let err = use_case.execute(DiscoverToolsInput::new("x")).await.unwrap_err();
        assert!(matches!(err, DiscoverToolsError::Search(SearchError::Timeout)));
    }
}
