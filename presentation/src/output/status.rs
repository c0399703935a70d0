//! Status report for the `status` command

use colored::Colorize;
use serde::Serialize;
use toolsearch_application::InitializeReport;
use toolsearch_domain::ToolCache;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackendStatus {
    pub id: String,
    pub transport: String,
    /// Unique identifiers this backend owns in the cache
    pub tools: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedStatus {
    pub id: String,
    pub error: String,
}

/// What the proxy would serve right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub connected: Vec<BackendStatus>,
    pub failed: Vec<FailedStatus>,
    pub total_tools: usize,
}

impl StatusReport {
    pub fn collect(report: &InitializeReport, cache: &ToolCache) -> Self {
        Self {
            connected: report
                .connected
                .iter()
                .map(|backend| BackendStatus {
                    id: backend.id.clone(),
                    transport: backend.transport.to_string(),
                    tools: cache.identifiers_for_backend(&backend.id),
                })
                .collect(),
            failed: report
                .failed
                .iter()
                .map(|f| FailedStatus {
                    id: f.id.clone(),
                    error: f.error.clone(),
                })
                .collect(),
            total_tools: cache.size(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Formats a [`StatusReport`] for the terminal
pub struct StatusFormatter;

impl StatusFormatter {
    pub fn format(report: &StatusReport) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{} {} backends, {} tools\n",
            "Connected:".cyan().bold(),
            report.connected.len(),
            report.total_tools
        ));

        for backend in &report.connected {
            output.push_str(&format!(
                "\n{} {}\n",
                format!("── {} ──", backend.id).green().bold(),
                format!("({}, {} tools)", backend.transport, backend.tools.len()).dimmed()
            ));
            for tool in &backend.tools {
                output.push_str(&format!("  {}\n", tool));
            }
        }

        if !report.failed.is_empty() {
            output.push_str(&format!("\n{}\n", "Failed:".red().bold()));
            for failed in &report.failed {
                output.push_str(&format!("  {}: {}\n", failed.id.red(), failed.error));
            }
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolsearch_application::{ConnectedBackend, FailedBackend};
    use toolsearch_domain::ToolDefinition;

    fn report() -> StatusReport {
        let cache = ToolCache::new();
        cache.register(
            "fs",
            &[
                ToolDefinition::new("read", "", ToolDefinition::empty_object_schema()),
                ToolDefinition::new("write", "", ToolDefinition::empty_object_schema()),
            ],
        );

        let init = InitializeReport {
            connected: vec![ConnectedBackend {
                id: "fs".to_string(),
                transport: "stdio",
                tool_count: 2,
            }],
            failed: vec![FailedBackend {
                id: "gh".to_string(),
                error: "Connection failed: refused".to_string(),
            }],
            total_tools: 2,
        };
        StatusReport::collect(&init, &cache)
    }

    #[test]
    fn test_collect() {
        let report = report();
        assert_eq!(report.total_tools, 2);
        assert_eq!(report.connected[0].tools, vec!["fs__read", "fs__write"]);
        assert_eq!(report.failed[0].id, "gh");
    }

    #[test]
    fn test_format_lists_tools_and_failures() {
        colored::control::set_override(false);
        let text = StatusFormatter::format(&report());

        assert!(text.contains("Connected: 1 backends, 2 tools"));
        assert!(text.contains("  fs__write\n"));
        assert!(text.contains("gh: Connection failed: refused"));
    }

    #[test]
    fn test_json() {
        let value: serde_json::Value = serde_json::from_str(&report().to_json()).unwrap();
        assert_eq!(value["connected"][0]["transport"], "stdio");
    }
}
