pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::{ProcessRunner, SystemResolver, Workspace};
pub use crate::config::{CliConfig, RunOptions, ToolsConfig};
pub use crate::core::{engine::EnumerationEngine, merger::ResultMerger};
pub use crate::domain::model::{MergedResult, RunSummary};
pub use crate::utils::error::{Result, SubenumError};
pub use crate::utils::logger::TracingLog;
