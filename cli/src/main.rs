//! CLI entrypoint for toolsearch-proxy
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result};
use clap::Parser;
use rmcp::ServiceExt;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use toolsearch_application::{
    BackendPool, DiscoverToolsUseCase, InitializeReport, InvokeToolUseCase,
};
use toolsearch_domain::{BackendConfig, ToolCache};
use toolsearch_infrastructure::{
    BedrockToolSearch, ConfigLoader, McpBackendConnector, ProxySettings, load_backends_or_empty,
};
use toolsearch_presentation::{
    Cli, Command, ProxyServer, StatusFormat, StatusFormatter, StatusReport,
};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    if cli.show_config {
        println!("Configuration sources (in priority order):");
        for line in ConfigLoader::describe_sources(cli.config.as_deref()) {
            println!("{}", line);
        }
        return Ok(());
    }

    let mut settings = ConfigLoader::load(cli.config.as_deref()).context("loading settings")?;
    if let Some(path) = &cli.backends {
        settings.backends_path = path.clone();
    }
    let backends = load_backends_or_empty(&settings.backends_path);

    // Signals are watched from here on so startup can be interrupted too
    let shutdown = CancellationToken::new();
    let signals = tokio::spawn(watch_signals(shutdown.clone()));

    let result = match cli.command() {
        Command::Serve => serve(&settings, &backends, &shutdown).await,
        Command::Status { output } => status(&settings, &backends, output, &shutdown).await,
    };

    shutdown.cancel();
    if let Err(e) = signals.await {
        warn!(error = %e, "Signal watcher task failed");
    }
    result
}

/// Logs go to stderr (stdout carries the MCP protocol) or to `log_file`.
/// `RUST_LOG` wins over the verbosity flags when set.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let Some(path) = log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .with_context(|| format!("invalid log file path: {}", path.display()))?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating log directory {}", dir.display()))?;

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
        .init();
    Ok(Some(guard))
}

/// Build the cache and pool, then connect every backend.
///
/// Returns `None` when shutdown was requested before every backend settled;
/// whatever had connected by then is torn down.
async fn connect_pool(
    settings: &ProxySettings,
    backends: &[BackendConfig],
    shutdown: &CancellationToken,
) -> Option<(Arc<ToolCache>, Arc<BackendPool>, InitializeReport)> {
    let cache = Arc::new(ToolCache::new());
    let connector = Arc::new(
        McpBackendConnector::new().with_http_connect_timeout(settings.pool_options().connect_timeout),
    );
    let pool = Arc::new(BackendPool::with_options(
        connector,
        cache.clone(),
        settings.pool_options(),
    ));

    let initialized = tokio::select! {
        report = pool.initialize(backends) => Some(report),
        _ = shutdown.cancelled() => None,
    };
    let Some(report) = initialized else {
        warn!("Shutdown requested while connecting to backends");
        teardown(&pool, &cache).await;
        return None;
    };
    info!(
        connected = report.connected.len(),
        failed = report.failed.len(),
        tools = report.total_tools,
        "Backend pool ready"
    );
    Some((cache, pool, report))
}

async fn teardown(pool: &BackendPool, cache: &ToolCache) {
    pool.close().await;
    cache.clear();
}

async fn serve(
    settings: &ProxySettings,
    backends: &[BackendConfig],
    shutdown: &CancellationToken,
) -> Result<()> {
    info!("Starting toolsearch-proxy");

    // === Dependency Injection ===
    let Some((cache, pool, _)) = connect_pool(settings, backends, shutdown).await else {
        return Ok(());
    };
    let search = tokio::select! {
        search = BedrockToolSearch::new(&settings.search) => Arc::new(search),
        _ = shutdown.cancelled() => {
            warn!("Shutdown requested while loading AWS configuration");
            teardown(&pool, &cache).await;
            return Ok(());
        }
    };

    let discover = Arc::new(DiscoverToolsUseCase::with_options(
        cache.clone(),
        search,
        settings.discovery_options(),
    ));
    let invoke = Arc::new(InvokeToolUseCase::new(cache.clone(), pool.clone()));
    let server = ProxyServer::new(discover, invoke, pool.clone());

    let started = tokio::select! {
        started = server.serve(rmcp::transport::stdio()) => started,
        _ = shutdown.cancelled() => {
            warn!("Shutdown requested before the upstream session started");
            teardown(&pool, &cache).await;
            return Ok(());
        }
    };
    let running = match started {
        Ok(running) => running,
        Err(e) => {
            teardown(&pool, &cache).await;
            return Err(anyhow::anyhow!("starting MCP server on stdio: {}", e));
        }
    };

    let bridge = {
        let shutdown = shutdown.clone();
        let service_token = running.cancellation_token();
        tokio::spawn(async move {
            shutdown.cancelled().await;
            service_token.cancel();
        })
    };

    match running.waiting().await {
        Ok(reason) => info!(reason = ?reason, "Upstream session ended"),
        Err(e) => warn!(error = %e, "MCP server task failed"),
    }

    shutdown.cancel();
    if let Err(e) = bridge.await {
        warn!(error = %e, "Shutdown bridge task failed");
    }
    teardown(&pool, &cache).await;
    info!("Shutdown complete");
    Ok(())
}

async fn status(
    settings: &ProxySettings,
    backends: &[BackendConfig],
    output: StatusFormat,
    shutdown: &CancellationToken,
) -> Result<()> {
    let Some((cache, pool, report)) = connect_pool(settings, backends, shutdown).await else {
        return Ok(());
    };

    let status = StatusReport::collect(&report, &cache);
    match output {
        StatusFormat::Text => print!("{}", StatusFormatter::format(&status)),
        StatusFormat::Json => println!("{}", status.to_json()),
    }

    teardown(&pool, &cache).await;
    Ok(())
}

/// Cancel `shutdown` on SIGINT/SIGTERM; returns once it is cancelled either way.
async fn watch_signals(shutdown: CancellationToken) {
    tokio::select! {
        _ = shutdown_signal() => shutdown.cancel(),
        _ = shutdown.cancelled() => {}
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received terminate signal, shutting down"),
    }
}
