//! Backend Connection Pool
//!
//! The [`BackendPool`] owns one live connection per configured backend,
//! populates the [`ToolCache`] from each backend's tool list at startup, and
//! routes invocations to the owning connection.
//!
//! # Startup
//!
//! ```text
//! initialize([a, b, c])
//!   ├─ a: connect → list_tools → register a__*   ✓
//!   ├─ b: connect ✗ (logged, skipped)
//!   └─ c: connect → list_tools → register c__*   ✓
//! ```
//!
//! Failures are isolated per backend and never retried. A pool with zero
//! connected backends is a valid, degraded state. When `parallel_connect`
//! is enabled the attempts run concurrently, but registration still happens
//! in declaration order so the cache layout does not depend on timing.
//!
//! # Teardown
//!
//! [`BackendPool::close`] closes every connection best-effort and marks the
//! pool closed; later [`BackendPool::route`] calls fail with
//! [`PoolError::PoolClosed`]. Closing twice is a no-op.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use futures::future::join_all;
use serde_json::{Map, Value};
use thiserror::Error;
use tokio::time::timeout;
use toolsearch_domain::{BackendConfig, ToolCache, ToolDefinition};
use tracing::{debug, info, warn};

use crate::config::PoolOptions;
use crate::ports::backend::{BackendConnection, BackendConnector, BackendError, BackendTool};

/// Errors returned when routing a call through the pool
#[derive(Error, Debug)]
pub enum PoolError {
    #[error("Backend not found: {0}")]
    BackendNotFound(String),

    #[error("Backend pool is closed")]
    PoolClosed,

    #[error("Backend '{backend}' timed out after {timeout:?} calling '{tool}'")]
    Timeout {
        backend: String,
        tool: String,
        timeout: std::time::Duration,
    },

    #[error("Backend '{backend}': {source}")]
    Backend {
        backend: String,
        #[source]
        source: BackendError,
    },
}

/// A backend that connected during [`BackendPool::initialize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectedBackend {
    pub id: String,
    pub transport: &'static str,
    pub tool_count: usize,
}

/// A backend that was skipped during [`BackendPool::initialize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedBackend {
    pub id: String,
    pub error: String,
}

/// Summary of pool initialization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitializeReport {
    pub connected: Vec<ConnectedBackend>,
    pub failed: Vec<FailedBackend>,
    /// Cache size once every backend has been registered
    pub total_tools: usize,
}

#[derive(Default)]
struct Connections {
    by_id: HashMap<String, Arc<dyn BackendConnection>>,
    /// Backend identifiers in declaration order
    order: Vec<String>,
    closed: bool,
}

type OpenedBackend = (Arc<dyn BackendConnection>, Vec<ToolDefinition>);

/// Pool of live backend connections
pub struct BackendPool {
    connector: Arc<dyn BackendConnector>,
    cache: Arc<ToolCache>,
    options: PoolOptions,
    connections: RwLock<Connections>,
}

impl BackendPool {
    pub fn new(connector: Arc<dyn BackendConnector>, cache: Arc<ToolCache>) -> Self {
        Self::with_options(connector, cache, PoolOptions::default())
    }

    pub fn with_options(
        connector: Arc<dyn BackendConnector>,
        cache: Arc<ToolCache>,
        options: PoolOptions,
    ) -> Self {
        Self {
            connector,
            cache,
            options,
            connections: RwLock::new(Connections::default()),
        }
    }

    pub fn cache(&self) -> &Arc<ToolCache> {
        &self.cache
    }

    /// Connect to every backend and register its tools.
    ///
    /// Never fails as a whole: each backend's failure is logged and reported
    /// in the returned [`InitializeReport`].
    pub async fn initialize(&self, backends: &[BackendConfig]) -> InitializeReport {
        let mut report = InitializeReport::default();

        if self.is_closed() {
            warn!("Backend pool already closed, skipping initialization");
            return report;
        }

        info!(
            backends = backends.len(),
            parallel = self.options.parallel_connect,
            "Connecting to backends"
        );

        let attempts: Vec<Result<OpenedBackend, BackendError>> = if self.options.parallel_connect {
            join_all(backends.iter().map(|config| self.open_backend(config))).await
        } else {
            let mut attempts = Vec::with_capacity(backends.len());
            for config in backends {
                attempts.push(self.open_backend(config).await);
            }
            attempts
        };

        for (config, attempt) in backends.iter().zip(attempts) {
            match attempt {
                Ok((connection, definitions)) => {
                    match self.register_backend(config, connection, &definitions).await {
                        Ok(()) => report.connected.push(ConnectedBackend {
                            id: config.id.clone(),
                            transport: config.transport.kind(),
                            tool_count: definitions.len(),
                        }),
                        Err(e) => report.failed.push(FailedBackend {
                            id: config.id.clone(),
                            error: e.to_string(),
                        }),
                    }
                }
                Err(e) => {
                    warn!(
                        backend = %config.id,
                        transport = %config.transport,
                        error = %e,
                        "Failed to connect to backend, skipping"
                    );
                    report.failed.push(FailedBackend {
                        id: config.id.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        report.total_tools = self.cache.size();
        info!(
            connected = report.connected.len(),
            failed = report.failed.len(),
            tools = report.total_tools,
            "Backend pool initialized"
        );
        report
    }

    /// Connect and enumerate tools, within the connect deadline.
    async fn open_backend(&self, config: &BackendConfig) -> Result<OpenedBackend, BackendError> {
        debug!(backend = %config.id, transport = %config.transport, "Connecting to backend");

        let attempt = async {
            let connection = self.connector.connect(config).await?;
            match connection.list_tools().await {
                Ok(tools) => Ok::<_, BackendError>((connection, tools)),
                Err(e) => {
                    if let Err(close_err) = connection.close().await {
                        debug!(backend = %config.id, error = %close_err, "Close after failed listing");
                    }
                    Err(e)
                }
            }
        };

        let (connection, tools) = timeout(self.options.connect_timeout, attempt)
            .await
            .map_err(|_| BackendError::Timeout(self.options.connect_timeout))??;

        let definitions = tools
            .into_iter()
            .map(BackendTool::into_definition)
            .collect();
        Ok((connection, definitions))
    }

    /// Register a freshly opened backend. A pool closed in the meantime
    /// refuses it and the connection is closed instead.
    async fn register_backend(
        &self,
        config: &BackendConfig,
        connection: Arc<dyn BackendConnection>,
        definitions: &[ToolDefinition],
    ) -> Result<(), PoolError> {
        let inserted = {
            let mut connections = self
                .connections
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            if connections.closed {
                Err(connection)
            } else {
                let registration = self.cache.register(&config.id, definitions);
                let previous = connections
                    .by_id
                    .insert(config.id.clone(), connection);
                if previous.is_none() {
                    connections.order.push(config.id.clone());
                }
                Ok((registration, previous))
            }
        };

        let (registration, previous) = match inserted {
            Ok(inserted) => inserted,
            Err(connection) => {
                warn!(backend = %config.id, "Backend pool closed during startup, dropping late connection");
                if let Err(e) = connection.close().await {
                    warn!(backend = %config.id, error = %e, "Failed to close late connection");
                }
                return Err(PoolError::PoolClosed);
            }
        };

        for replaced in &registration.replaced {
            warn!(
                tool = %replaced.unique_id,
                previous_backend = %replaced.previous_backend,
                backend = %config.id,
                "Tool identifier collision, keeping latest registration"
            );
        }

        if let Some(previous) = previous {
            warn!(backend = %config.id, "Backend connected twice, closing previous connection");
            if let Err(e) = previous.close().await {
                warn!(backend = %config.id, error = %e, "Failed to close previous connection");
            }
        }

        info!(
            backend = %config.id,
            transport = config.transport.kind(),
            tools = definitions.len(),
            "Backend connected"
        );
        Ok(())
    }

    fn connection(&self, backend_id: &str) -> Result<Arc<dyn BackendConnection>, PoolError> {
        let connections = self
            .connections
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        if connections.closed {
            return Err(PoolError::PoolClosed);
        }
        connections
            .by_id
            .get(backend_id)
            .cloned()
            .ok_or_else(|| PoolError::BackendNotFound(backend_id.to_string()))
    }

    /// Dispatch a call to `original_name` on `backend_id`.
    ///
    /// The backend's result document is returned unmodified.
    pub async fn route(
        &self,
        backend_id: &str,
        original_name: &str,
        arguments: Map<String, Value>,
    ) -> Result<Value, PoolError> {
        let connection = self.connection(backend_id)?;

        debug!(backend = %backend_id, tool = %original_name, "Routing tool call");

        match timeout(
            self.options.call_timeout,
            connection.call_tool(original_name, arguments),
        )
        .await
        {
            Ok(result) => result.map_err(|source| PoolError::Backend {
                backend: backend_id.to_string(),
                source,
            }),
            Err(_) => Err(PoolError::Timeout {
                backend: backend_id.to_string(),
                tool: original_name.to_string(),
                timeout: self.options.call_timeout,
            }),
        }
    }

    /// Identifiers of all live backends, in declaration order.
    pub fn connected_backends(&self) -> Vec<String> {
        self.connections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .order
            .clone()
    }

    pub fn is_closed(&self) -> bool {
        self.connections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .closed
    }

    /// Close every connection (best-effort) and mark the pool closed.
    pub async fn close(&self) {
        let drained: Vec<(String, Arc<dyn BackendConnection>)> = {
            let mut connections = self
                .connections
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            connections.closed = true;
            let order = std::mem::take(&mut connections.order);
            let mut by_id = std::mem::take(&mut connections.by_id);
            order
                .into_iter()
                .filter_map(|id| by_id.remove(&id).map(|connection| (id, connection)))
                .collect()
        };

        if drained.is_empty() {
            debug!("Backend pool has no live connections to close");
            return;
        }

        let count = drained.len();
        join_all(drained.into_iter().map(|(id, connection)| async move {
            match connection.close().await {
                Ok(()) => debug!(backend = %id, "Backend connection closed"),
                Err(e) => warn!(backend = %id, error = %e, "Failed to close backend connection"),
            }
        }))
        .await;

        info!(closed = count, "Backend pool closed");
    }
}
