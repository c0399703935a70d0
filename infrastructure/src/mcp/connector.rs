//! Opens MCP sessions according to a backend's transport.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rmcp::{
    ServiceExt,
    transport::{
        ConfigureCommandExt, StreamableHttpClientTransport, TokioChildProcess,
        streamable_http_client::StreamableHttpClientTransportConfig,
    },
};
use tokio::process::Command;
use toolsearch_application::{BackendConnection, BackendConnector, BackendError};
use toolsearch_domain::{BackendConfig, BackendTransport, HttpTransport, StdioTransport};
use tracing::{debug, info};

use super::connection::{McpClient, McpConnection};

/// [`BackendConnector`] for MCP servers.
pub struct McpBackendConnector {
    http_connect_timeout: Duration,
}

impl McpBackendConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_http_connect_timeout(mut self, timeout: Duration) -> Self {
        self.http_connect_timeout = timeout;
        self
    }

    async fn spawn_stdio(&self, id: &str, stdio: &StdioTransport) -> Result<McpClient, BackendError> {
        debug!(backend = id, command = %stdio.command, "Spawning backend process");

        let command = Command::new(&stdio.command).configure(|cmd| {
            cmd.args(&stdio.args)
                .envs(stdio.env.iter())
                .stderr(std::process::Stdio::inherit());
            if let Some(cwd) = &stdio.cwd {
                cmd.current_dir(cwd);
            }

            // Linux: the kernel sends SIGTERM to the child when the proxy dies,
            // even if it is killed before pool shutdown runs.
            #[cfg(target_os = "linux")]
            unsafe {
                cmd.pre_exec(|| {
                    libc::prctl(libc::PR_SET_PDEATHSIG, libc::SIGTERM);
                    Ok(())
                });
            }
        });

        let transport = TokioChildProcess::new(command)
            .map_err(|e| BackendError::ConnectionFailed(format!("spawn '{}': {}", stdio.command, e)))?;

        ().serve(transport)
            .await
            .map_err(|e| BackendError::ConnectionFailed(format!("initialize stdio client: {}", e)))
    }

    async fn connect_http(&self, id: &str, http: &HttpTransport) -> Result<McpClient, BackendError> {
        debug!(backend = id, url = %http.url, "Connecting to remote backend");

        let client = build_http_client(&http.headers, self.http_connect_timeout)?;
        let config = StreamableHttpClientTransportConfig::with_uri(http.url.as_str());
        let transport = StreamableHttpClientTransport::with_client(client, config);

        ().serve(transport).await.map_err(|e| {
            BackendError::ConnectionFailed(format!("initialize streamable client: {}", e))
        })
    }
}

impl Default for McpBackendConnector {
    fn default() -> Self {
        Self {
            http_connect_timeout: Duration::from_secs(10),
        }
    }
}

fn build_request_headers(
    headers: &HashMap<String, String>,
) -> Result<reqwest::header::HeaderMap, BackendError> {
    let mut map = reqwest::header::HeaderMap::new();
    for (key, value) in headers {
        map.insert(
            reqwest::header::HeaderName::from_bytes(key.as_bytes())
                .map_err(|e| BackendError::Transport(format!("header name '{}': {}", key, e)))?,
            value
                .parse()
                .map_err(|e| BackendError::Transport(format!("header value for '{}': {}", key, e)))?,
        );
    }
    Ok(map)
}

fn build_http_client(
    headers: &HashMap<String, String>,
    connect_timeout: Duration,
) -> Result<reqwest::Client, BackendError> {
    let mut builder = reqwest::Client::builder().connect_timeout(connect_timeout);

    let headers = build_request_headers(headers)?;
    if !headers.is_empty() {
        builder = builder.default_headers(headers);
    }

    builder
        .build()
        .map_err(|e| BackendError::Transport(format!("build HTTP client: {}", e)))
}

#[async_trait]
impl BackendConnector for McpBackendConnector {
    async fn connect(&self, config: &BackendConfig) -> Result<Arc<dyn BackendConnection>, BackendError> {
        let service = match &config.transport {
            BackendTransport::Stdio(stdio) => self.spawn_stdio(&config.id, stdio).await?,
            BackendTransport::Http(http) => self.connect_http(&config.id, http).await?,
        };

        if let Some(info) = service.peer_info() {
            info!(
                backend = %config.id,
                server = %info.server_info.name,
                version = %info.server_info.version,
                "Backend initialized"
            );
        }

        Ok(Arc::new(McpConnection::new(&config.id, service)))
    }
}
