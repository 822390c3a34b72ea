use crate::domain::model::{CommandSpec, OutputMode, ToolOutcome};
use crate::domain::ports::ToolRunner;
use crate::utils::error::{Result, SubenumError};
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;

/// Runs tools as child processes. Arguments are passed as a vector, never through a shell.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }

    fn build_command(spec: &CommandSpec) -> Result<Command> {
        let mut command = Command::new(&spec.program);
        command
            .args(&spec.args)
            .current_dir(&spec.working_dir)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        match spec.mode {
            OutputMode::Stream => {
                command.stdout(Stdio::inherit()).stderr(Stdio::inherit());
            }
            OutputMode::Capture => {
                command.stdout(Stdio::piped()).stderr(Stdio::piped());
            }
        }

        if let Some(path) = &spec.stdout_to {
            let file = std::fs::File::create(path)?;
            command.stdout(Stdio::from(file));
        }

        Ok(command)
    }
}

#[async_trait]
impl ToolRunner for ProcessRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<ToolOutcome> {
        tracing::debug!("Spawning {}: {}", spec.tool, spec.display_line());
        let mut command = Self::build_command(spec)?;

        let started = Instant::now();
        let child = command.spawn().map_err(|source| SubenumError::ToolSpawnError {
            tool: spec.tool.clone(),
            source,
        })?;

        let output = match spec.timeout {
            Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| SubenumError::ToolTimeout {
                    tool: spec.tool.clone(),
                    seconds: limit.as_secs(),
                })??,
            None => child.wait_with_output().await?,
        };

        Ok(ToolOutcome {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            duration: started.elapsed(),
        })
    }
}
