pub mod engine;
pub mod merger;
pub mod report;

pub use crate::domain::model::{CommandSpec, MergedResult, ToolOutcome};
pub use crate::domain::ports::{EventLog, HostResolver, ToolRunner};
pub use crate::utils::error::Result;
