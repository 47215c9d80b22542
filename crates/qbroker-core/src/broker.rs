//! Broker - Main message broker orchestrator
//!
//! The Broker owns the queue registry and implements enqueue and the
//! blocking-with-timeout dequeue protocol on top of it.

use std::sync::Arc;
use std::time::Duration;

use qbroker_storage::QueueRegistry;
use qbroker_types::QueueStats;
use tracing::{debug, info};

use crate::wait::PendingWait;

/// Main message broker
pub struct Broker {
    /// Named queues
    registry: Arc<QueueRegistry>,
}

impl Broker {
    /// Create a broker with an empty registry
    pub fn new() -> Self {
        Self::with_registry(Arc::new(QueueRegistry::new()))
    }

    /// Create a broker over an existing registry
    pub fn with_registry(registry: Arc<QueueRegistry>) -> Self {
        info!("Initializing qbroker broker");
        Self { registry }
    }

    /// Get a reference to the queue registry
    pub fn registry(&self) -> &QueueRegistry {
        self.registry.as_ref()
    }

    // ==================== Message Operations ====================

    /// Append `payload` to the tail of `queue_name` and wake one blocked dequeuer.
    ///
    /// Never waits on consumers. Callers reject empty names and payloads first.
    pub fn enqueue(&self, queue_name: &str, payload: impl Into<String>) {
        self.registry.resolve(queue_name).push(payload.into());
    }

    /// Remove and return the head of `queue_name` without waiting
    pub fn try_dequeue(&self, queue_name: &str) -> Option<String> {
        self.registry.resolve(queue_name).pop()
    }

    /// Remove and return the head of `queue_name`, waiting up to `timeout` for
    /// one to arrive. A zero timeout never waits.
    ///
    /// Returns `None` when nothing was available in time. A payload handed out
    /// here is gone from the queue for good.
    pub async fn dequeue(&self, queue_name: &str, timeout: Duration) -> Option<String> {
        let slot = self.registry.resolve(queue_name);

        if let Some(payload) = slot.pop() {
            return Some(payload);
        }
        if timeout.is_zero() {
            return None;
        }

        // Sleep computes its own deadline, saturating for very large timeouts.
        let expired = tokio::time::sleep(timeout);
        tokio::pin!(expired);

        loop {
            let mut wait = PendingWait::spawn(Arc::clone(&slot));
            let woke = tokio::select! {
                _ = wait.ready() => true,
                _ = &mut expired => false,
            };

            if !woke {
                wait.cancel().await;
                debug!(queue = %queue_name, ?timeout, "Dequeue timed out");
                return None;
            }

            // Another dequeuer may have taken the payload between the wakeup
            // and this pop; if so, wait again until the deadline.
            if let Some(payload) = slot.pop() {
                return Some(payload);
            }
        }
    }

    // ==================== Inspection ====================

    /// Snapshot of a queue, if it has ever been referenced
    pub fn stats(&self, queue_name: &str) -> Option<QueueStats> {
        self.registry.stats(queue_name)
    }
}

impl Default for Broker {
    fn default() -> Self {
        Self::new()
    }
}
