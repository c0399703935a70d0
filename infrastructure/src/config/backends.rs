//! Backend configuration document loading
//!
//! The document is JSON, either wrapped as `{"mcpServers": {...}}` or a bare
//! mapping from backend id to entry. Mapping order is declaration order.
//! `${VAR}` references are expanded textually before parsing.

use std::path::Path;

use serde_json::{Map, Value};
use toolsearch_domain::{BackendConfig, BackendEntry, ConfigError};
use tracing::{info, warn};

use super::ConfigLoadError;

const SERVERS_KEY: &str = "mcpServers";

/// Parsed backend document: the usable backends and the rejected entries.
#[derive(Debug, Default)]
pub struct BackendDocument {
    pub backends: Vec<BackendConfig>,
    pub rejected: Vec<ConfigError>,
}

/// Read and parse the backend document at `path`.
pub fn load_backends(path: &Path) -> Result<BackendDocument, ConfigLoadError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_backends(&substitute_env_vars(&raw))
}

/// Like [`load_backends`], but a missing or malformed document yields zero
/// backends so the proxy can still start.
pub fn load_backends_or_empty(path: &Path) -> Vec<BackendConfig> {
    match load_backends(path) {
        Ok(document) => {
            for rejected in &document.rejected {
                warn!(error = %rejected, "Skipping backend entry");
            }
            info!(
                path = %path.display(),
                backends = document.backends.len(),
                "Loaded backend configuration"
            );
            document.backends
        }
        Err(e) => {
            warn!(error = %e, "No usable backend configuration, starting without backends");
            Vec::new()
        }
    }
}

/// Parse an already-substituted backend document.
pub fn parse_backends(raw: &str) -> Result<BackendDocument, ConfigLoadError> {
    let root: Value = serde_json::from_str(raw)?;
    let Value::Object(mut root) = root else {
        return Err(ConfigLoadError::Malformed(
            "top level must be an object".to_string(),
        ));
    };

    let servers: Map<String, Value> = match root.remove(SERVERS_KEY) {
        Some(Value::Object(servers)) => servers,
        Some(_) => {
            return Err(ConfigLoadError::Malformed(format!(
                "'{SERVERS_KEY}' must be an object"
            )));
        }
        None => root,
    };

    let mut document = BackendDocument::default();
    for (id, value) in servers {
        let parsed = serde_json::from_value::<BackendEntry>(value)
            .map_err(|e| ConfigError::InvalidEntry {
                id: id.clone(),
                reason: e.to_string(),
            })
            .and_then(|entry| entry.into_config(id));
        match parsed {
            Ok(config) => document.backends.push(config),
            Err(e) => document.rejected.push(e),
        }
    }
    Ok(document)
}

/// Expand `${VAR}` references from the process environment.
pub fn substitute_env_vars(raw: &str) -> String {
    substitute_with(raw, |name| std::env::var(name).ok())
}

/// Expand `${VAR}` references using `lookup`.
///
/// Unknown variables become the empty string. A `$` not followed by `{` is
/// kept, and an unterminated `${` is copied through verbatim.
pub fn substitute_with<F>(raw: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };

        let name = &after[..end];
        match lookup(name) {
            Some(value) => out.push_str(&value),
            None => warn!(variable = name, "Environment variable not set, substituting empty string"),
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use toolsearch_domain::BackendTransport;

    fn env(name: &str) -> Option<String> {
        match name {
            "TOKEN" => Some("s3cret".to_string()),
            "HOME" => Some("/home/me".to_string()),
            _ => None,
        }
    }

    #[test]
    fn test_substitute_known_and_unknown() {
        assert_eq!(
            substitute_with("Bearer ${TOKEN} at ${HOME}/x", env),
            "Bearer s3cret at /home/me/x"
        );
        assert_eq!(substitute_with("a${MISSING}b", env), "ab");
    }

    #[test]
    fn test_substitute_leaves_plain_dollar() {
        assert_eq!(substitute_with("cost $5 and $HOME", env), "cost $5 and $HOME");
    }

    #[test]
    fn test_substitute_unterminated() {
        assert_eq!(substitute_with("x ${TOKEN} ${OPEN", env), "x s3cret ${OPEN");
    }

    #[test]
    fn test_parse_wrapped_preserves_order() {
        let document = parse_backends(
            r#"{"mcpServers": {
                "zeta": {"command": "z"},
                "alpha": {"command": "a", "args": ["--x"]},
                "mid": {"url": "http://localhost:9000/mcp", "type": "streamable-http"}
            }}"#,
        )
        .unwrap();

        let ids: Vec<&str> = document.backends.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["zeta", "alpha", "mid"]);
        assert!(document.rejected.is_empty());
    }

    #[test]
    fn test_parse_bare_mapping() {
        let document = parse_backends(
            r#"{"remote": {"url": "https://example.com/mcp", "type": "http", "headers": {"Authorization": "Bearer t"}}}"#,
        )
        .unwrap();

        let BackendTransport::Http(http) = &document.backends[0].transport else {
            panic!("expected http transport");
        };
        assert_eq!(http.headers["Authorization"], "Bearer t");
    }

    #[test]
    fn test_invalid_entries_are_skipped() {
        let document = parse_backends(
            r#"{"mcpServers": {
                "both": {"command": "x", "url": "http://y"},
                "good": {"command": "ok"},
                "neither": {"args": []},
                "weird": {"url": "http://y", "type": "sse"},
                "scalar": 42
            }}"#,
        )
        .unwrap();

        assert_eq!(document.backends.len(), 1);
        assert_eq!(document.backends[0].id, "good");
        assert_eq!(document.rejected.len(), 4);
    }

    #[test]
    fn test_malformed_documents() {
        assert!(matches!(parse_backends("{oops"), Err(ConfigLoadError::Json(_))));
        assert!(matches!(parse_backends("[]"), Err(ConfigLoadError::Malformed(_))));
        assert!(matches!(
            parse_backends(r#"{"mcpServers": []}"#),
            Err(ConfigLoadError::Malformed(_))
        ));
    }

    #[test]
    fn test_missing_file_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let backends = load_backends_or_empty(&dir.path().join("absent.json"));
        assert!(backends.is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{"mcpServers": {{"fs": {{"command": "npx", "args": ["-y", "server-fs"]}}}}}}"#
        )
        .unwrap();

        let document = load_backends(file.path()).unwrap();
        assert_eq!(document.backends[0].transport.to_string(), "stdio: npx -y server-fs");
    }
}
