// ABOUTME: Sandbox handle contract and local implementation for Webforge builds
// ABOUTME: Defines the abstract interface the build orchestrator drives processes through

pub mod detect;
pub mod error;
pub mod handle;
pub mod local;
pub mod types;

// Re-export commonly used types
pub use error::{Result, SandboxError};
pub use handle::Sandbox;
pub use local::LocalSandbox;
pub use types::{ProcessExit, ReadySignal, SandboxProcess};
