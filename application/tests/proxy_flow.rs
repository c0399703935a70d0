//! End-to-end behaviour of pool, cache and use cases wired together.

mod common;

use std::sync::Arc;
use std::sync::atomic::Ordering;

use common::{MockConnector, ScriptedSearch};
use serde_json::{Map, Value, json};
use toolsearch_application::{
    BackendPool, DiscoverToolsInput, DiscoverToolsOutput, DiscoverToolsUseCase, InvokeToolError,
    InvokeToolInput, InvokeToolUseCase, PoolError,
};
use toolsearch_domain::{BackendConfig, ToolCache, ToolRoute};

struct Proxy {
    cache: Arc<ToolCache>,
    pool: Arc<BackendPool>,
    discover: DiscoverToolsUseCase,
    invoke: InvokeToolUseCase,
}

async fn proxy(connector: MockConnector, backends: &[BackendConfig], search: Arc<ScriptedSearch>) -> Proxy {
    let cache = Arc::new(ToolCache::new());
    let pool = Arc::new(BackendPool::new(Arc::new(connector), cache.clone()));
    pool.initialize(backends).await;
    Proxy {
        discover: DiscoverToolsUseCase::new(cache.clone(), search),
        invoke: InvokeToolUseCase::new(cache.clone(), pool.clone()),
        cache,
        pool,
    }
}

fn backends(ids: &[&str]) -> Vec<BackendConfig> {
    ids.iter()
        .map(|id| BackendConfig::stdio(*id, format!("{id}-server")))
        .collect()
}

#[tokio::test]
async fn test_two_backends_same_tool_name() {
    let connector = MockConnector::default()
        .with_backend("a", &["x", "y"])
        .with_backend("b", &["x"]);
    let p = proxy(connector, &backends(&["a", "b"]), Arc::new(ScriptedSearch::new(&[]))).await;

    assert_eq!(p.cache.size(), 3);
    assert_eq!(p.cache.list_identifiers(), vec!["a__x", "a__y", "b__x"]);
    assert_eq!(
        p.cache.resolve_route("b__x"),
        Some(ToolRoute {
            backend_id: "b".to_string(),
            original_name: "x".to_string(),
        })
    );
    assert!(p.cache.resolve_route("x").is_none());
}

#[tokio::test]
async fn test_invoke_routes_to_owning_backend() {
    let connector = MockConnector::default()
        .with_backend("a", &["x"])
        .with_backend("b", &["x"]);
    let p = proxy(connector, &backends(&["a", "b"]), Arc::new(ScriptedSearch::new(&[]))).await;

    let mut args = Map::new();
    args.insert("q".into(), json!("rust"));
    let output = p
        .invoke
        .execute(InvokeToolInput::new("b__x").with_arguments(args))
        .await
        .unwrap();

    assert_eq!(output.route.backend_id, "b");
    assert_eq!(output.result["content"][0]["text"], "b:x");
    assert_eq!(output.result["echo"]["q"], "rust");
}

#[tokio::test]
async fn test_invoke_defaults_arguments_to_empty_object() {
    let connector = MockConnector::default().with_backend("a", &["x"]);
    let p = proxy(connector, &backends(&["a"]), Arc::new(ScriptedSearch::new(&[]))).await;

    let output = p.invoke.execute(InvokeToolInput::new("a__x")).await.unwrap();
    assert_eq!(output.result["echo"], Value::Object(Map::new()));
}

#[tokio::test]
async fn test_unknown_tool_never_dispatches() {
    let connector = MockConnector::default().with_backend("a", &["x"]);
    let calls = connector.calls.clone();
    let p = proxy(connector, &backends(&["a"]), Arc::new(ScriptedSearch::new(&[]))).await;

    let err = p
        .invoke
        .execute(InvokeToolInput::new("nope__missing"))
        .await
        .unwrap_err();

    assert!(matches!(err, InvokeToolError::UnknownTool(_)));
    assert!(err.to_string().contains("nope__missing"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_missing_tool_name() {
    let p = proxy(MockConnector::default(), &[], Arc::new(ScriptedSearch::new(&[]))).await;
    let err = p.invoke.execute(InvokeToolInput::new("")).await.unwrap_err();
    assert!(matches!(err, InvokeToolError::MissingToolName));
}

#[tokio::test]
async fn test_failed_backend_does_not_hide_others() {
    let connector = MockConnector::default()
        .with_backend("good", &["list", "get"])
        .with_failing("bad");
    let p = proxy(
        connector,
        &backends(&["bad", "good"]),
        Arc::new(ScriptedSearch::new(&[])),
    )
    .await;

    let names: Vec<String> = p.cache.all_definitions().into_iter().map(|d| d.name).collect();
    assert_eq!(names, vec!["good__list", "good__get"]);
    assert_eq!(p.pool.connected_backends(), vec!["good"]);
    assert!(p.invoke.execute(InvokeToolInput::new("good__get")).await.is_ok());
}

#[tokio::test]
async fn test_invoke_after_close_fails() {
    let connector = MockConnector::default().with_backend("a", &["x"]);
    let p = proxy(connector, &backends(&["a"]), Arc::new(ScriptedSearch::new(&[]))).await;

    p.pool.close().await;
    let err = p.invoke.execute(InvokeToolInput::new("a__x")).await.unwrap_err();
    assert!(matches!(err, InvokeToolError::Pool(PoolError::PoolClosed)));
}

#[tokio::test]
async fn test_discover_on_empty_pool() {
    let search = Arc::new(ScriptedSearch::new(&["a__x"]));
    let p = proxy(
        MockConnector::default().with_failing("a"),
        &backends(&["a"]),
        search.clone(),
    )
    .await;

    let output = p.discover.execute(DiscoverToolsInput::new("files")).await.unwrap();
    assert_eq!(output, DiscoverToolsOutput::NoToolsAvailable);
    assert!(search.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_discover_truncates_in_service_order() {
    let connector = MockConnector::default().with_backend("a", &["t1", "t2", "t3", "t4", "t5"]);
    let search = Arc::new(ScriptedSearch::new(&["a__t4", "a__t2", "a__t5", "a__t1", "a__t3"]));
    let p = proxy(connector, &backends(&["a"]), search.clone()).await;

    let output = p
        .discover
        .execute(DiscoverToolsInput::new("x").with_max_results(2))
        .await
        .unwrap();
    let DiscoverToolsOutput::Found(found) = output else {
        panic!("expected matches");
    };

    assert_eq!(found.tool_references, vec!["a__t4", "a__t2"]);
    assert_eq!(found.tools[1].description, "a t2");
    assert_eq!(found.total_tools_available, 5);

    let requests = search.requests.lock().unwrap();
    assert_eq!(requests[0].search_capability.name, "tool_search_tool_regex");
}
