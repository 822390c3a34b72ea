pub mod toml_config;

pub use toml_config::{FailurePolicy, RunWhen, ToolSpec, ToolsConfig};

#[cfg(feature = "cli")]
use clap::Parser;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_FILE: &str = "subenum.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(Parser))]
#[cfg_attr(feature = "cli", command(name = "subenum", version))]
#[cfg_attr(
    feature = "cli",
    command(about = "Run subdomain enumeration tools and merge their results")
)]
pub struct CliConfig {
    /// Domain to enumerate subdomains for (a URL is reduced to its host)
    #[cfg_attr(feature = "cli", arg(short, long))]
    pub domain: String,

    /// Show tool output in real-time
    #[cfg_attr(feature = "cli", arg(short, long))]
    pub verbose: bool,

    /// Enable bruteforce enumeration modes
    #[cfg_attr(feature = "cli", arg(short, long))]
    pub bruteforce: bool,

    /// Resolve subdomains and write a report with suggested scan commands
    #[cfg_attr(feature = "cli", arg(short, long))]
    pub report: bool,

    /// Path to the tool configuration file
    #[cfg_attr(feature = "cli", arg(short, long, default_value = DEFAULT_CONFIG_FILE))]
    pub config: String,

    /// Directory under which the per-domain workspace is created
    #[cfg_attr(feature = "cli", arg(long))]
    pub work_root: Option<String>,

    /// Print the planned commands without running them
    #[cfg_attr(feature = "cli", arg(long))]
    pub dry_run: bool,

    /// Emit logs as JSON lines
    #[cfg_attr(feature = "cli", arg(long))]
    pub log_json: bool,
}

/// Settings of one enumeration run, after CLI and file configuration are combined.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub domain: String,
    pub verbose: bool,
    pub bruteforce: bool,
    pub report: bool,
    pub tools: ToolsConfig,
}

impl RunOptions {
    pub fn work_root(&self) -> std::path::PathBuf {
        self.tools.work_root()
    }
}

impl CliConfig {
    /// Applies CLI overrides on top of the file configuration.
    pub fn into_run_options(self, mut tools: ToolsConfig) -> RunOptions {
        if let Some(root) = self.work_root {
            tools.workspace = Some(toml_config::WorkspaceConfig { root: Some(root) });
        }

        RunOptions {
            domain: crate::utils::validation::normalize_target(&self.domain),
            verbose: self.verbose,
            bruteforce: self.bruteforce,
            report: self.report,
            tools,
        }
    }
}
