// ABOUTME: Core type definitions for sandbox process execution
// ABOUTME: Defines spawned process handles, exit reports, and the readiness signal

use tokio::sync::{mpsc, oneshot};

/// Fired by the sandbox runtime when a started dev server begins
/// accepting connections. At most one signal is emitted per spawned
/// server process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadySignal {
    pub port: u16,
    pub url: String,
}

/// Terminal report for a spawned process.
///
/// An `Exited` report is a non-exceptional termination regardless of the
/// status code; `Faulted` means the sandbox lost the process mid-run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessExit {
    Exited { code: Option<i32> },
    Faulted { message: String },
}

impl ProcessExit {
    pub fn is_success(&self) -> bool {
        matches!(self, ProcessExit::Exited { code: Some(0) })
    }
}

/// Live handles for one process running inside a sandbox.
///
/// `output` yields text chunks in arrival order (stdout and stderr
/// interleaved as observed); the channel closes when the process stops
/// emitting. `exit` resolves exactly once with the terminal report.
#[derive(Debug)]
pub struct SandboxProcess {
    pub output: mpsc::UnboundedReceiver<String>,
    pub exit: oneshot::Receiver<ProcessExit>,
}
