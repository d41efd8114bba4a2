use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::log::LogBuffer;

/// Stage of a build cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildPhase {
    Idle,
    Installing,
    Starting,
    Ready,
    Failed,
}

impl BuildPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildPhase::Idle => "idle",
            BuildPhase::Installing => "installing",
            BuildPhase::Starting => "starting",
            BuildPhase::Ready => "ready",
            BuildPhase::Failed => "failed",
        }
    }
}

/// Category of a build log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogCategory {
    Install,
    Devserver,
    Error,
    Success,
}

impl LogCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogCategory::Install => "install",
            LogCategory::Devserver => "devserver",
            LogCategory::Error => "error",
            LogCategory::Success => "success",
        }
    }
}

/// One categorized entry of the build log feed.
///
/// Entries are immutable once created; `sequence` is strictly
/// increasing in append order within a build cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub sequence: u64,
    pub category: LogCategory,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Aggregate state of one build cycle, published as snapshots.
///
/// `progress` is a heuristic estimate in [0, 100], monotone within a
/// cycle; `endpoint` is set exactly when the cycle reached `ready`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildState {
    pub phase: BuildPhase,
    pub logs: LogBuffer,
    pub progress: u8,
    pub endpoint: Option<String>,
    pub error: Option<String>,
}

impl BuildState {
    pub fn new(max_log_entries: usize) -> Self {
        Self {
            phase: BuildPhase::Idle,
            logs: LogBuffer::new(max_log_entries),
            progress: 0,
            endpoint: None,
            error: None,
        }
    }

    /// Reset for a fresh cycle: logs cleared, progress back to zero,
    /// endpoint and error unset, phase at `installing`.
    pub fn reset_for_cycle(&mut self) {
        self.phase = BuildPhase::Installing;
        self.logs.clear();
        self.progress = 0;
        self.endpoint = None;
        self.error = None;
    }
}

impl Default for BuildState {
    fn default() -> Self {
        Self::new(crate::log::DEFAULT_MAX_LOG_ENTRIES)
    }
}
