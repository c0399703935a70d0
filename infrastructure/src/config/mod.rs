//! Configuration loading for toolsearch-proxy
//!
//! Two documents are read at startup:
//!
//! - Proxy settings (TOML, merged with figment). Priority, highest first:
//!   1. `TOOLSEARCH_*` environment variables (`__` separates sections)
//!   2. `--config <path>` specified file
//!   3. Project root: `./toolsearch.toml`
//!   4. Global: `~/.config/toolsearch-proxy/config.toml`
//!   5. Default values
//! - The backend document (JSON) named by `backends_path`.

mod backends;
mod loader;
mod settings;

use std::path::PathBuf;

use thiserror::Error;

pub use backends::{
    BackendDocument, load_backends, load_backends_or_empty, parse_backends, substitute_env_vars,
    substitute_with,
};
pub use loader::ConfigLoader;
pub use settings::{BackendSettings, ProxySettings, SearchSettings};

/// Errors raised while reading configuration
#[derive(Error, Debug)]
pub enum ConfigLoadError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed backend document: {0}")]
    Malformed(String),

    #[error("settings error: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("invalid setting {field}: {reason}")]
    Invalid { field: String, reason: String },
}
