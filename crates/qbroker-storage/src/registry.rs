//! Queue registry
//!
//! Maps queue names to their `QueueSlot`, creating queues lazily on first
//! reference. Nothing is persisted; all queues are lost when the process exits.

use std::sync::Arc;

use dashmap::DashMap;
use qbroker_types::QueueStats;
use tracing::{debug, info};

use crate::slot::QueueSlot;

/// In-memory registry of named queues
pub struct QueueRegistry {
    /// Queues stored by name
    queues: DashMap<String, Arc<QueueSlot>>,
}

impl QueueRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        info!("Initializing in-memory queue registry");
        Self {
            queues: DashMap::new(),
        }
    }

    /// Return the queue registered under `name`, creating an empty one if needed.
    ///
    /// Concurrent calls for the same name always observe the same slot: the
    /// insert goes through the map's entry lock for that key.
    pub fn resolve(&self, name: &str) -> Arc<QueueSlot> {
        if let Some(slot) = self.queues.get(name) {
            return Arc::clone(slot.value());
        }

        let slot = self
            .queues
            .entry(name.to_string())
            .or_insert_with(|| {
                debug!(queue = %name, "Queue created");
                Arc::new(QueueSlot::new(name))
            });
        Arc::clone(slot.value())
    }

    /// Look up a queue without creating it
    pub fn get(&self, name: &str) -> Option<Arc<QueueSlot>> {
        self.queues.get(name).map(|slot| Arc::clone(slot.value()))
    }

    /// Snapshot of a queue, if it has ever been referenced
    pub fn stats(&self, name: &str) -> Option<QueueStats> {
        self.get(name).map(|slot| slot.stats())
    }

    /// Number of queues created so far
    pub fn len(&self) -> usize {
        self.queues.len()
    }

    /// True when no queue has been referenced yet
    pub fn is_empty(&self) -> bool {
        self.queues.is_empty()
    }
}

impl Default for QueueRegistry {
    fn default() -> Self {
        Self::new()
    }
}
