use std::collections::VecDeque;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::types::{LogCategory, LogEntry};

/// Default retention bound for one build cycle's log feed.
/// Can be overridden via WEBFORGE_MAX_LOG_ENTRIES.
pub const DEFAULT_MAX_LOG_ENTRIES: usize = 1000;

/// Append-only aggregator for build output.
///
/// Entries are appended in arrival order of the underlying output
/// chunks; there is no reordering and no deduplication. Sequence numbers
/// are strictly increasing even after old entries are dropped by the
/// retention bound.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogBuffer {
    entries: VecDeque<LogEntry>,
    next_sequence: u64,
    max_entries: usize,
}

impl LogBuffer {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            next_sequence: 0,
            max_entries,
        }
    }

    /// Append an entry, assigning it the next sequence number. The
    /// oldest entry is dropped once the retention bound is reached.
    pub fn append(&mut self, category: LogCategory, message: impl Into<String>) -> LogEntry {
        let entry = LogEntry {
            sequence: self.next_sequence,
            category,
            message: message.into(),
            timestamp: Utc::now(),
        };
        self.next_sequence += 1;

        self.entries.push_back(entry.clone());
        if self.entries.len() > self.max_entries {
            self.entries.pop_front();
        }
        entry
    }

    /// Drop all entries and restart sequence numbering. Called at the
    /// start of a new build cycle.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.next_sequence = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.back()
    }

    /// Entries with a sequence number of at least `sequence`, oldest
    /// first. Lets a renderer pick up where it left off.
    pub fn since(&self, sequence: u64) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(move |e| e.sequence >= sequence)
    }
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LOG_ENTRIES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequences_are_strictly_increasing_in_append_order() {
        let mut buffer = LogBuffer::new(100);
        buffer.append(LogCategory::Install, "a");
        buffer.append(LogCategory::Install, "b");
        buffer.append(LogCategory::Success, "c");

        let sequences: Vec<u64> = buffer.iter().map(|e| e.sequence).collect();
        assert_eq!(sequences, vec![0, 1, 2]);
        let messages: Vec<&str> = buffer.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["a", "b", "c"]);
    }

    #[test]
    fn retention_drops_oldest_but_keeps_sequences() {
        let mut buffer = LogBuffer::new(3);
        for i in 0..5 {
            buffer.append(LogCategory::Devserver, format!("chunk {}", i));
        }

        assert_eq!(buffer.len(), 3);
        let sequences: Vec<u64> = buffer.iter().map(|e| e.sequence).collect();
        assert_eq!(sequences, vec![2, 3, 4]);
    }

    #[test]
    fn clear_restarts_sequence_numbering() {
        let mut buffer = LogBuffer::new(10);
        buffer.append(LogCategory::Install, "a");
        buffer.clear();
        let entry = buffer.append(LogCategory::Install, "b");

        assert_eq!(entry.sequence, 0);
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn since_skips_already_seen_entries() {
        let mut buffer = LogBuffer::new(10);
        buffer.append(LogCategory::Install, "a");
        buffer.append(LogCategory::Install, "b");
        buffer.append(LogCategory::Install, "c");

        let fresh: Vec<&str> = buffer.since(2).map(|e| e.message.as_str()).collect();
        assert_eq!(fresh, vec!["c"]);
    }
}
