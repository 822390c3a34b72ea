use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::time::Duration;

/// Lowercased hostnames collected from every tool output file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedResult {
    subdomains: BTreeSet<String>,
    pub scanned_files: usize,
    pub skipped_files: usize,
}

impl MergedResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lowercases and inserts; returns false for repeats.
    pub fn insert(&mut self, hostname: &str) -> bool {
        self.subdomains.insert(hostname.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.subdomains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subdomains.is_empty()
    }

    pub fn contains(&self, hostname: &str) -> bool {
        self.subdomains.contains(hostname)
    }

    pub fn to_sorted_vec(&self) -> Vec<String> {
        self.subdomains.iter().cloned().collect()
    }

    /// One hostname per line, each terminated by `\n`.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.subdomains.iter().map(|s| s.len() + 1).sum());
        for subdomain in &self.subdomains {
            out.push_str(subdomain);
            out.push('\n');
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputMode {
    /// Child inherits the terminal.
    Stream,
    /// Output is piped and returned in [`ToolOutcome`].
    Capture,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub tool: String,
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
    pub mode: OutputMode,
    pub stdout_to: Option<PathBuf>,
    pub timeout: Option<Duration>,
}

impl CommandSpec {
    /// Shell-like rendering, for logs and dry runs only.
    pub fn display_line(&self) -> String {
        let mut line = std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .map(|part| {
                if part.is_empty() || part.contains(char::is_whitespace) {
                    format!("'{}'", part)
                } else {
                    part.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" ");
        if let Some(path) = &self.stdout_to {
            line.push_str(&format!(" > {}", path.display()));
        }
        line
    }
}

#[derive(Debug, Clone, Default)]
pub struct ToolOutcome {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
}

impl ToolOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub subdomain: String,
    pub address: Option<Ipv4Addr>,
    pub suggested_commands: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubdomainReport {
    pub domain: String,
    pub generated_at: DateTime<Utc>,
    pub total: usize,
    pub resolved: usize,
    pub entries: Vec<ReportEntry>,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub workspace: PathBuf,
    pub merged_path: PathBuf,
    pub subdomains: Vec<String>,
    pub report_path: Option<PathBuf>,
    pub failed_tools: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merged_result_collapses_case() {
        let mut merged = MergedResult::new();
        assert!(merged.insert("Foo.Example.com"));
        assert!(!merged.insert("foo.example.COM"));
        assert!(merged.insert("bar.example.com"));
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.render(), "bar.example.com\nfoo.example.com\n");
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(MergedResult::new().render(), "");
    }

    #[test]
    fn test_display_line_quotes_whitespace() {
        let spec = CommandSpec {
            tool: "Knock".to_string(),
            program: "knockpy".to_string(),
            args: vec!["-d".to_string(), "example.com".to_string(), "a b".to_string()],
            working_dir: PathBuf::from("/tmp/example.com"),
            mode: OutputMode::Capture,
            stdout_to: Some(PathBuf::from("/tmp/example.com/knock.txt")),
            timeout: None,
        };
        assert_eq!(
            spec.display_line(),
            "knockpy -d example.com 'a b' > /tmp/example.com/knock.txt"
        );
    }
}
