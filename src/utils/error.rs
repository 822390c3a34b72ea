use thiserror::Error;

#[derive(Error, Debug)]
pub enum SubenumError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Pattern compilation error: {0}")]
    PatternError(#[from] regex::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid domain format: {domain}")]
    InvalidDomain { domain: String },

    #[error("Working directory does not exist: {path}")]
    WorkspaceMissing { path: String },

    #[error("{tool} failed with return code {}", describe_code(.code))]
    ToolFailed { tool: String, code: Option<i32> },

    #[error("Failed to start {tool}: {source}")]
    ToolSpawnError {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} timed out after {seconds}s")]
    ToolTimeout { tool: String, seconds: u64 },
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "none (terminated by signal)".to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    FileSystem,
    ExternalTool,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SubenumError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SubenumError::ConfigValidationError { .. }
            | SubenumError::InvalidConfigValueError { .. }
            | SubenumError::MissingConfigError { .. } => ErrorCategory::Configuration,
            SubenumError::InvalidDomain { .. } => ErrorCategory::Input,
            SubenumError::IoError(_) | SubenumError::WorkspaceMissing { .. } => {
                ErrorCategory::FileSystem
            }
            SubenumError::ToolFailed { .. }
            | SubenumError::ToolSpawnError { .. }
            | SubenumError::ToolTimeout { .. } => ErrorCategory::ExternalTool,
            SubenumError::SerializationError(_) | SubenumError::PatternError(_) => {
                ErrorCategory::Internal
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration
            | ErrorCategory::Input
            | ErrorCategory::FileSystem
            | ErrorCategory::ExternalTool => ErrorSeverity::High,
            ErrorCategory::Internal => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            SubenumError::ConfigValidationError { field, .. }
            | SubenumError::InvalidConfigValueError { field, .. } => {
                format!("Check the '{}' entry in your configuration file", field)
            }
            SubenumError::MissingConfigError { field } => {
                format!(
                    "Provide '{}' or copy subenum.example.toml to subenum.toml and adjust it",
                    field
                )
            }
            SubenumError::InvalidDomain { .. } => {
                "Pass a bare domain such as 'example.com' (a URL is also accepted)".to_string()
            }
            SubenumError::WorkspaceMissing { .. } => {
                "Make sure the work root exists and is writable".to_string()
            }
            SubenumError::IoError(_) => "Check file permissions and free disk space".to_string(),
            SubenumError::ToolFailed { tool, .. } => format!(
                "Re-run with --verbose to see the output of {}, or set on_tool_failure = \"continue\"",
                tool
            ),
            SubenumError::ToolSpawnError { tool, .. } => {
                format!("Verify that the program configured for {} is installed and on PATH", tool)
            }
            SubenumError::ToolTimeout { .. } => {
                "Raise execution.tool_timeout_seconds or remove it".to_string()
            }
            SubenumError::SerializationError(_) | SubenumError::PatternError(_) => {
                "This is a bug; please report it with the failing input".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Input => format!("Invalid input: {}", self),
            ErrorCategory::FileSystem => format!("File system problem: {}", self),
            ErrorCategory::ExternalTool => format!("External tool problem: {}", self),
            ErrorCategory::Internal => format!("Internal error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, SubenumError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_failed_message() {
        let err = SubenumError::ToolFailed {
            tool: "Amass".to_string(),
            code: Some(2),
        };
        assert_eq!(err.to_string(), "Amass failed with return code 2");
        assert_eq!(err.category(), ErrorCategory::ExternalTool);
        // A failed tool exits the process with status 1, like any other run failure.
        assert_eq!(err.severity(), ErrorSeverity::High);

        let signalled = SubenumError::ToolFailed {
            tool: "Amass".to_string(),
            code: None,
        };
        assert!(signalled.to_string().contains("terminated by signal"));
    }

    #[test]
    fn test_severity_mapping() {
        let invalid = SubenumError::InvalidDomain {
            domain: "nope".to_string(),
        };
        assert_eq!(invalid.severity(), ErrorSeverity::High);
        assert!(invalid.user_friendly_message().starts_with("Invalid input"));

        let pattern = SubenumError::PatternError(regex::Regex::new("(").unwrap_err());
        assert_eq!(pattern.severity(), ErrorSeverity::Critical);
    }
}
