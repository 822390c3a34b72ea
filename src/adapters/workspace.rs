use crate::core::merger;
use crate::utils::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

pub const REPORT_FILE_NAME: &str = "report.json";

/// Per-domain working directory that holds every tool output of a run.
#[derive(Debug, Clone)]
pub struct Workspace {
    path: PathBuf,
}

impl Workspace {
    /// Creates `<root>/<domain>` fresh, deleting whatever a previous run left there.
    pub fn prepare(root: &Path, domain: &str) -> Result<Self> {
        let path = root.join(domain);
        if path.exists() {
            tracing::debug!("Removing previous workspace {}", path.display());
            fs::remove_dir_all(&path)?;
        }
        fs::create_dir_all(&path)?;
        Ok(Self { path })
    }

    /// Wraps an existing directory without touching its contents.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.path.join(file_name)
    }

    pub fn merged_path(&self) -> PathBuf {
        merger::merged_path(&self.path)
    }

    pub fn report_path(&self) -> PathBuf {
        self.path.join(REPORT_FILE_NAME)
    }
}
