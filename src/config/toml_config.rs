use crate::adapters::workspace::Workspace;
use crate::domain::model::{CommandSpec, OutputMode};
use crate::utils::error::{Result, SubenumError};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_WORK_ROOT: &str = "/tmp";
pub const DEFAULT_RESOLVE_CONCURRENCY: usize = 10;

pub fn default_report_commands() -> Vec<String> {
    vec![
        "nmap -p80,443 {ip}".to_string(),
        "nmap -sC -sV {ip}".to_string(),
        "nmap -p1-65535 -T4 {ip}".to_string(),
    ]
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolsConfig {
    pub workspace: Option<WorkspaceConfig>,
    pub execution: Option<ExecutionConfig>,
    pub report: Option<ReportConfig>,
    #[serde(default)]
    pub tools: Vec<ToolSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    pub root: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionConfig {
    pub on_tool_failure: Option<FailurePolicy>,
    pub tool_timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    #[default]
    Abort,
    Continue,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub resolve_concurrency: Option<usize>,
    pub commands: Option<Vec<String>>,
}

/// When a tool takes part in a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunWhen {
    #[default]
    Always,
    /// Only with `--bruteforce`.
    Bruteforce,
    /// Only without `--bruteforce`.
    Standard,
}

impl RunWhen {
    pub fn applies(self, bruteforce: bool) -> bool {
        match self {
            RunWhen::Always => true,
            RunWhen::Bruteforce => bruteforce,
            RunWhen::Standard => !bruteforce,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
    /// File name inside the workspace; must end in `.txt` to be merged.
    pub output: String,
    #[serde(default)]
    pub when: RunWhen,
    #[serde(default)]
    pub stdout_to_output: bool,
}

impl ToolSpec {
    /// Substitutes `{domain}`, `{output}` and `{workdir}` in the arguments.
    pub fn render(
        &self,
        domain: &str,
        workspace: &Workspace,
        mode: OutputMode,
        timeout: Option<Duration>,
    ) -> CommandSpec {
        let output = workspace.output_path(&self.output);
        let output_str = output.display().to_string();
        let workdir = workspace.path().display().to_string();

        let args = self
            .args
            .iter()
            .map(|arg| {
                arg.replace("{domain}", domain)
                    .replace("{output}", &output_str)
                    .replace("{workdir}", &workdir)
            })
            .collect();

        CommandSpec {
            tool: self.name.clone(),
            program: self.program.clone(),
            args,
            working_dir: workspace.path().to_path_buf(),
            mode,
            stdout_to: self.stdout_to_output.then_some(output),
            timeout,
        }
    }
}

impl ToolsConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SubenumError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}")?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn work_root(&self) -> PathBuf {
        self.workspace
            .as_ref()
            .and_then(|w| w.root.clone())
            .unwrap_or_else(|| DEFAULT_WORK_ROOT.to_string())
            .into()
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.execution
            .as_ref()
            .and_then(|e| e.on_tool_failure)
            .unwrap_or_default()
    }

    pub fn tool_timeout(&self) -> Option<Duration> {
        self.execution
            .as_ref()
            .and_then(|e| e.tool_timeout_seconds)
            .map(Duration::from_secs)
    }

    pub fn resolve_concurrency(&self) -> usize {
        self.report
            .as_ref()
            .and_then(|r| r.resolve_concurrency)
            .unwrap_or(DEFAULT_RESOLVE_CONCURRENCY)
    }

    pub fn report_commands(&self) -> Vec<String> {
        self.report
            .as_ref()
            .and_then(|r| r.commands.clone())
            .unwrap_or_else(default_report_commands)
    }

    /// Tools taking part in this run, in configuration order.
    pub fn planned_tools(&self, bruteforce: bool) -> Vec<&ToolSpec> {
        self.tools
            .iter()
            .filter(|tool| tool.when.applies(bruteforce))
            .collect()
    }

    pub fn validate_config(&self) -> Result<()> {
        if let Some(root) = self.workspace.as_ref().and_then(|w| w.root.as_deref()) {
            validation::validate_path("workspace.root", root)?;
        }

        if let Some(seconds) = self.execution.as_ref().and_then(|e| e.tool_timeout_seconds) {
            validation::validate_positive_number("execution.tool_timeout_seconds", seconds as usize, 1)?;
        }

        validation::validate_positive_number("report.resolve_concurrency", self.resolve_concurrency(), 1)?;

        if self.tools.is_empty() {
            return Err(SubenumError::MissingConfigError {
                field: "tools".to_string(),
            });
        }

        let mut seen_outputs = std::collections::HashSet::new();
        for tool in &self.tools {
            validation::validate_non_empty_string("tools.name", &tool.name)?;
            validation::validate_non_empty_string("tools.program", &tool.program)?;
            validation::validate_file_name("tools.output", &tool.output)?;

            if tool.output == crate::core::merger::MERGED_FILE_NAME {
                return Err(SubenumError::InvalidConfigValueError {
                    field: "tools.output".to_string(),
                    value: tool.output.clone(),
                    reason: "Reserved for the merged result".to_string(),
                });
            }
            if !tool.output.ends_with(crate::core::merger::RECOGNIZED_EXTENSION) {
                tracing::warn!(
                    "Output '{}' of {} does not end in {} and will not be merged",
                    tool.output,
                    tool.name,
                    crate::core::merger::RECOGNIZED_EXTENSION
                );
            }
            if !seen_outputs.insert(tool.output.as_str()) {
                return Err(SubenumError::InvalidConfigValueError {
                    field: "tools.output".to_string(),
                    value: tool.output.clone(),
                    reason: "Two tools write to the same output file".to_string(),
                });
            }
        }

        Ok(())
    }
}

impl Validate for ToolsConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
