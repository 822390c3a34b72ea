use crate::adapters::workspace::Workspace;
use crate::config::{FailurePolicy, RunOptions};
use crate::core::merger::ResultMerger;
use crate::core::report::{self, ReportBuilder};
use crate::domain::model::{CommandSpec, MergedResult, OutputMode, RunSummary, ToolOutcome};
use crate::domain::ports::{EventLog, HostResolver, ToolRunner};
use crate::utils::error::{Result, SubenumError};
use crate::utils::validation::validate_domain;
use std::sync::Arc;

const STDERR_TAIL_LINES: usize = 10;

/// Runs the configured tools for one domain, merges their output and optionally reports.
pub struct EnumerationEngine<T: ToolRunner, R: HostResolver + 'static, L: EventLog> {
    runner: T,
    resolver: Arc<R>,
    log: L,
    merger: ResultMerger,
    options: RunOptions,
}

impl<T: ToolRunner, R: HostResolver + 'static, L: EventLog> EnumerationEngine<T, R, L> {
    /// Fails on an invalid domain before anything touches the filesystem.
    pub fn new(runner: T, resolver: R, log: L, options: RunOptions) -> Result<Self> {
        validate_domain(&options.domain)?;
        Ok(Self {
            runner,
            resolver: Arc::new(resolver),
            log,
            merger: ResultMerger::new()?,
            options,
        })
    }

    fn output_mode(&self) -> OutputMode {
        if self.options.verbose {
            OutputMode::Stream
        } else {
            OutputMode::Capture
        }
    }

    /// Commands a run would execute, rendered against `workspace`.
    pub fn plan(&self, workspace: &Workspace) -> Vec<CommandSpec> {
        let timeout = self.options.tools.tool_timeout();
        self.options
            .tools
            .planned_tools(self.options.bruteforce)
            .into_iter()
            .map(|tool| tool.render(&self.options.domain, workspace, self.output_mode(), timeout))
            .collect()
    }

    /// The plan against the workspace path a run would use, without creating it.
    pub fn dry_run(&self) -> Vec<CommandSpec> {
        let workspace = Workspace::open(self.options.work_root().join(&self.options.domain));
        self.plan(&workspace)
    }

    pub async fn run(&self) -> Result<RunSummary> {
        let opts = &self.options;
        self.log.info(&format!("Enumerating subdomains for domain: {}", opts.domain));
        self.log.info(&format!(
            "Bruteforce mode: {} | Report mode: {} | Verbose mode: {}",
            opts.bruteforce, opts.report, opts.verbose
        ));

        let workspace = Workspace::prepare(&opts.work_root(), &opts.domain)?;
        self.log.debug(&format!("Workspace: {}", workspace.path().display()));

        let failed_tools = self.run_tools(&workspace).await?;

        self.log.info("Merging results...");
        let merged = self.merge(&workspace).await?;
        let merged_path = workspace.merged_path();
        self.log.info(&format!("Merged results stored in: {}", merged_path.display()));
        self.log.info(&format!("Unique subdomain count: {}", merged.len()));
        if merged.skipped_files > 0 {
            self.log.warn(&format!("{} output file(s) could not be read", merged.skipped_files));
        }
        let subdomains = merged.to_sorted_vec();

        let report_path = if opts.report {
            Some(self.report(&workspace, &subdomains).await?)
        } else {
            None
        };

        self.log.info("Subdomain enumeration finished!");

        Ok(RunSummary {
            workspace: workspace.path().to_path_buf(),
            merged_path,
            subdomains,
            report_path,
            failed_tools,
        })
    }

    /// Runs tools in order; returns the names of those that failed under the continue policy.
    async fn run_tools(&self, workspace: &Workspace) -> Result<Vec<String>> {
        let policy = self.options.tools.failure_policy();
        let mut failed = Vec::new();

        for spec in self.plan(workspace) {
            self.log.info(&format!("Running {}...", spec.tool));
            let error = match self.runner.run(&spec).await {
                Ok(outcome) if outcome.success() => {
                    self.log.info(&format!("{} completed successfully.", spec.tool));
                    tracing::debug!("{} took {:?}", spec.tool, outcome.duration);
                    continue;
                }
                Ok(outcome) => {
                    self.log_stderr_tail(&spec.tool, &outcome);
                    SubenumError::ToolFailed {
                        tool: spec.tool.clone(),
                        code: outcome.exit_code,
                    }
                }
                Err(e) => e,
            };

            self.log.error(&format!("ERROR: {}.", error));
            match policy {
                FailurePolicy::Abort => return Err(error),
                FailurePolicy::Continue => failed.push(spec.tool.clone()),
            }
        }

        Ok(failed)
    }

    fn log_stderr_tail(&self, tool: &str, outcome: &ToolOutcome) {
        let lines: Vec<&str> = outcome.stderr.lines().collect();
        let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
        for line in &lines[start..] {
            self.log.debug(&format!("[{}] {}", tool, line));
        }
    }

    async fn merge(&self, workspace: &Workspace) -> Result<MergedResult> {
        let merger = self.merger.clone();
        let dir = workspace.path().to_path_buf();
        tokio::task::spawn_blocking(move || merger.merge_and_write(&dir))
            .await
            .map_err(|e| SubenumError::IoError(std::io::Error::other(e)))?
    }

    async fn report(&self, workspace: &Workspace, subdomains: &[String]) -> Result<std::path::PathBuf> {
        self.log.info("Resolving subdomains and building report...");
        let tools = &self.options.tools;
        let builder = ReportBuilder::new(
            Arc::clone(&self.resolver),
            tools.resolve_concurrency(),
            tools.report_commands(),
        );
        let built = builder.build(&self.options.domain, subdomains).await;
        self.log.info(&format!("Resolved {} of {} subdomains", built.resolved, built.total));

        let path = workspace.report_path();
        report::write_report(&path, &built)?;
        self.log.info(&format!("Report generated: {}", path.display()));
        Ok(path)
    }
}
