use crate::domain::model::{CommandSpec, ToolOutcome};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::net::Ipv4Addr;
use tracing::Level;

/// Executes one external command. Implementations own all process mechanics.
#[async_trait]
pub trait ToolRunner: Send + Sync {
    async fn run(&self, spec: &CommandSpec) -> Result<ToolOutcome>;
}

#[async_trait]
pub trait HostResolver: Send + Sync {
    async fn resolve_ipv4(&self, host: &str) -> Option<Ipv4Addr>;
}

/// Injected progress log, so components never reach for console state.
pub trait EventLog: Send + Sync {
    fn log(&self, level: Level, message: &str);

    fn info(&self, message: &str) {
        self.log(Level::INFO, message);
    }

    fn warn(&self, message: &str) {
        self.log(Level::WARN, message);
    }

    fn error(&self, message: &str) {
        self.log(Level::ERROR, message);
    }

    fn debug(&self, message: &str) {
        self.log(Level::DEBUG, message);
    }
}
