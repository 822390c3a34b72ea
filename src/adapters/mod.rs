// Adapters layer: concrete implementations for external systems (filesystem, processes, DNS).

pub mod process;
pub mod resolver;
pub mod workspace;

pub use process::ProcessRunner;
pub use resolver::SystemResolver;
pub use workspace::Workspace;
