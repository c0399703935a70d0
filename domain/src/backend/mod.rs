//! Backend configuration types.
//!
//! A backend is an independent tool-providing server. How it is reached is
//! described by a [`BackendTransport`]: either a local subprocess speaking
//! over stdio, or a remote server reached by URL. A [`BackendEntry`] is one
//! raw entry of the configuration document; [`BackendEntry::into_config`]
//! checks it and picks the transport. Reading the document itself is an
//! infrastructure concern.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

/// A configuration entry that cannot describe a backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("backend '{0}': both 'command' and 'url' are set")]
    AmbiguousTransport(String),

    #[error("backend '{0}': one of 'command' or 'url' is required")]
    MissingTransport(String),

    #[error("backend '{id}': unsupported transport type '{kind}'")]
    UnsupportedType { id: String, kind: String },

    #[error("backend '{id}': invalid entry: {reason}")]
    InvalidEntry { id: String, reason: String },

    #[error("backend identifier must not be empty")]
    EmptyId,
}

/// How to reach one backend.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendConfig {
    /// Backend identifier (the prefix of every unique tool identifier)
    pub id: String,
    pub transport: BackendTransport,
}

/// Transport selection for a backend. The two variants are mutually exclusive.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendTransport {
    /// Local subprocess speaking MCP over stdin/stdout
    Stdio(StdioTransport),
    /// Remote server reached over streamable HTTP
    Http(HttpTransport),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StdioTransport {
    pub command: String,
    pub args: Vec<String>,
    /// Extra environment variables for the child process
    pub env: HashMap<String, String>,
    /// Working directory for the child process
    pub cwd: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct HttpTransport {
    pub url: String,
    /// Headers attached to every request (e.g. Authorization)
    pub headers: HashMap<String, String>,
}

impl BackendConfig {
    pub fn stdio(id: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            transport: BackendTransport::Stdio(StdioTransport {
                command: command.into(),
                ..Default::default()
            }),
        }
    }

    pub fn http(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            transport: BackendTransport::Http(HttpTransport {
                url: url.into(),
                ..Default::default()
            }),
        }
    }
}

/// One raw entry of the backend configuration document.
///
/// ```json
/// { "command": "npx", "args": ["-y", "server"], "env": {"TOKEN": "..."}, "cwd": "/srv" }
/// { "url": "https://example.com/mcp", "type": "http", "headers": {"Authorization": "..."} }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BackendEntry {
    pub command: Option<String>,
    pub args: Vec<String>,
    pub env: HashMap<String, String>,
    pub cwd: Option<PathBuf>,
    pub url: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub headers: HashMap<String, String>,
}

impl BackendEntry {
    /// Transport types accepted for remote entries.
    pub const REMOTE_TYPES: &'static [&'static str] = &["http", "streamable-http", "streamableHttp"];

    pub fn into_config(self, id: impl Into<String>) -> Result<BackendConfig, ConfigError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ConfigError::EmptyId);
        }

        let transport = match (self.command, self.url) {
            (Some(_), Some(_)) => return Err(ConfigError::AmbiguousTransport(id)),
            (None, None) => return Err(ConfigError::MissingTransport(id)),
            (Some(command), None) => {
                if let Some(kind) = self.kind.filter(|k| k != "stdio") {
                    return Err(ConfigError::UnsupportedType { id, kind });
                }
                BackendTransport::Stdio(StdioTransport {
                    command,
                    args: self.args,
                    env: self.env,
                    cwd: self.cwd,
                })
            }
            (None, Some(url)) => {
                if let Some(kind) = self
                    .kind
                    .filter(|k| !Self::REMOTE_TYPES.contains(&k.as_str()))
                {
                    return Err(ConfigError::UnsupportedType { id, kind });
                }
                BackendTransport::Http(HttpTransport {
                    url,
                    headers: self.headers,
                })
            }
        };

        Ok(BackendConfig { id, transport })
    }
}

impl BackendTransport {
    pub fn kind(&self) -> &'static str {
        match self {
            BackendTransport::Stdio(_) => "stdio",
            BackendTransport::Http(_) => "http",
        }
    }
}

impl fmt::Display for BackendTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendTransport::Stdio(stdio) => {
                write!(f, "stdio: {}", stdio.command)?;
                for arg in &stdio.args {
                    write!(f, " {}", arg)?;
                }
                Ok(())
            }
            // Headers may carry credentials; never print them
            BackendTransport::Http(http) => write!(f, "http: {}", http.url),
        }
    }
}
