// ABOUTME: Error types for sandbox operations
// ABOUTME: Covers process launch, filesystem mounting, and handle lifecycle failures

use thiserror::Error;

/// Main error type for sandbox operations
#[derive(Error, Debug)]
pub enum SandboxError {
    /// The sandbox could not launch a requested process
    #[error("Failed to spawn process '{command}': {error}")]
    SpawnFailed { command: String, error: String },

    /// Writing the file set into the sandbox filesystem failed
    #[error("Failed to mount '{path}': {error}")]
    MountFailed { path: String, error: String },

    /// The sandbox scratch directory could not be prepared
    #[error("Failed to prepare sandbox root '{path}': {error}")]
    RootUnavailable { path: String, error: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for Results that return SandboxError
pub type Result<T> = std::result::Result<T, SandboxError>;
