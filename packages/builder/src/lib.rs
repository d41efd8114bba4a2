//! Webforge Builder - Sandboxed build-and-preview orchestration
//!
//! This crate owns one build cycle: given a sandbox handle and a set of
//! generated project files, it installs dependencies, starts the dev
//! server, aggregates process output into a categorized log feed with
//! heuristic progress estimation, and flips to `ready` when the sandbox
//! reports the server reachable. Faults at any stage land in the
//! published state instead of propagating to the host.

pub mod log;
pub mod orchestrator;
pub mod progress;
pub mod types;

// Re-export key types for easier use
pub use log::LogBuffer;
pub use orchestrator::{BuildOptions, BuildOrchestrator};
pub use progress::Progress;
pub use types::{BuildPhase, BuildState, LogCategory, LogEntry};

/// Version information for the builder crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
