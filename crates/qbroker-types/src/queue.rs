//! Queue snapshot types for qbroker

use serde::{Deserialize, Serialize};

/// Point-in-time statistics for one queue
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStats {
    /// Queue name
    pub name: String,

    /// Number of payloads waiting to be dequeued
    pub depth: usize,

    /// Number of dequeue calls currently blocked on this queue
    pub waiters: usize,
}

impl QueueStats {
    /// True when the queue holds no payloads and nobody is waiting on it
    pub fn is_idle(&self) -> bool {
        self.depth == 0 && self.waiters == 0
    }
}
