//! Webforge Files - Generated project file model
//!
//! This crate owns the data model for generated projects: the file tree
//! supplied to the build orchestrator, the ordered build-step plan, and
//! the parser that turns a model response into that plan.

pub mod parser;
pub mod plan;
pub mod tree;

pub use parser::parse_artifact;
pub use plan::{apply_steps, Step, StepKind, StepStatus};
pub use tree::{FileKind, FileNode, FileSet};

use thiserror::Error;

/// Error types for file plan operations
#[derive(Debug, Error)]
pub enum FilesError {
    #[error("Invalid file path: {0}")]
    InvalidPath(String),

    #[error("Artifact markup contained no actions")]
    EmptyArtifact,

    #[error("Unterminated action block starting at offset {0}")]
    UnterminatedAction(usize),
}

/// Result type for file plan operations
pub type FilesResult<T> = std::result::Result<T, FilesError>;
