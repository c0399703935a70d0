//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for the status command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum StatusFormat {
    /// Human-readable listing
    #[default]
    Text,
    /// JSON document
    Json,
}

/// CLI arguments for toolsearch-proxy
#[derive(Parser, Debug)]
#[command(name = "toolsearch-proxy")]
#[command(author, version, about = "MCP proxy exposing discover/invoke over many backend servers")]
#[command(long_about = r#"
toolsearch-proxy sits between one MCP client and any number of backend MCP
servers. The client sees two tools only:

  discover_tools   find backend tools for a plain-language query
  invoke_tool      call a backend tool by its 'backend__tool' identifier

Discovery is delegated to the Bedrock tool search capability.

Configuration files are loaded from (in priority order):
1. TOOLSEARCH_* environment variables
2. --config <path>     Explicit config file
3. ./toolsearch.toml   Project-level config
4. ~/.config/toolsearch-proxy/config.toml   Global config

Example:
  toolsearch-proxy --backends ./mcp_servers.json
  toolsearch-proxy status -v
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Path to the backend configuration document (overrides backends_path)
    #[arg(long, value_name = "PATH", global = true)]
    pub backends: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Serve the proxy over stdio (default)
    Serve,
    /// Connect to every backend, print what is available, then exit
    Status {
        #[arg(short, long, value_enum, default_value = "text")]
        output: StatusFormat,
    },
}

impl Cli {
    /// The subcommand to run; `serve` when none was given.
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve)
    }
}
