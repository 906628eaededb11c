//! Bounded in-memory log buffer.

use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which hook produced an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogKind {
    /// `before-operation`.
    BeforeOperation,
    /// `after-operation`.
    AfterOperation,
    /// `error`.
    Error,
}

/// One recorded event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Event kind.
    #[serde(rename = "type")]
    pub kind: LogKind,
    /// Human-readable message.
    pub message: String,
    /// When the entry was recorded.
    pub timestamp: DateTime<Utc>,
    /// Hook payload at the time of the event.
    pub data: Value,
}

impl LogEntry {
    /// Create an entry stamped with the current time.
    pub fn new(kind: LogKind, message: impl Into<String>, data: Value) -> Self {
        Self {
            kind,
            message: message.into(),
            timestamp: Utc::now(),
            data,
        }
    }
}

#[derive(Debug)]
struct BufferState {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

/// Thread-safe ring of log entries; the oldest entry is evicted at capacity.
#[derive(Debug)]
pub struct LogBuffer {
    state: Mutex<BufferState>,
}

impl LogBuffer {
    /// Create a buffer holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Mutex::new(BufferState {
                entries: VecDeque::new(),
                capacity: capacity.max(1),
            }),
        }
    }

    /// Change the capacity, evicting the oldest entries if needed.
    pub fn set_capacity(&self, capacity: usize) {
        if let Ok(mut state) = self.state.lock() {
            state.capacity = capacity.max(1);
            while state.entries.len() > state.capacity {
                state.entries.pop_front();
            }
        }
    }

    /// Append an entry.
    pub fn push(&self, entry: LogEntry) {
        if let Ok(mut state) = self.state.lock() {
            if state.entries.len() >= state.capacity {
                state.entries.pop_front();
            }
            state.entries.push_back(entry);
        }
    }

    /// Copy of all entries, oldest first.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.state
            .lock()
            .map(|state| state.entries.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Remove all entries.
    pub fn clear(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.entries.clear();
        }
    }

    /// Number of entries held.
    pub fn len(&self) -> usize {
        self.state.lock().map(|state| state.entries.len()).unwrap_or(0)
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new(1000)
    }
}
