//! Per-queue state
//!
//! A `QueueSlot` pairs the FIFO payload list of one queue with the wait/notify
//! primitive that blocked dequeuers park on.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use qbroker_types::QueueStats;
use tokio::sync::futures::Notified;
use tokio::sync::Notify;
use tracing::debug;

/// One named queue and its wait condition
pub struct QueueSlot {
    /// Queue name
    name: String,
    /// Pending payloads, oldest at the front
    payloads: Mutex<VecDeque<String>>,
    /// Woken once per enqueue
    available: Notify,
    /// Blocked dequeue calls currently registered
    waiters: AtomicUsize,
}

impl QueueSlot {
    /// Create an empty queue
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payloads: Mutex::new(VecDeque::new()),
            available: Notify::new(),
            waiters: AtomicUsize::new(0),
        }
    }

    /// Queue name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a payload to the tail and wake one waiter.
    pub fn push(&self, payload: String) {
        let depth = {
            let mut payloads = self.payloads.lock();
            payloads.push_back(payload);
            payloads.len()
        };
        self.available.notify_one();

        debug!(queue = %self.name, depth, "Payload pushed");
    }

    /// Remove and return the head payload, if any. Never blocks.
    pub fn pop(&self) -> Option<String> {
        let payload = self.payloads.lock().pop_front();
        if payload.is_some() {
            debug!(queue = %self.name, "Payload popped");
        }
        payload
    }

    /// Future that resolves on the next enqueue signal.
    ///
    /// Call `enable` on the pinned future before re-checking the queue so a
    /// signal sent between the check and the `.await` is not lost.
    pub fn notified(&self) -> Notified<'_> {
        self.available.notified()
    }

    /// Register a blocked dequeue call; the registration ends when the guard drops.
    pub fn register_waiter(&self) -> WaiterGuard<'_> {
        self.waiters.fetch_add(1, Ordering::SeqCst);
        WaiterGuard { slot: self }
    }

    /// Number of payloads currently held
    pub fn len(&self) -> usize {
        self.payloads.lock().len()
    }

    /// True when no payloads are held
    pub fn is_empty(&self) -> bool {
        self.payloads.lock().is_empty()
    }

    /// Number of blocked dequeue calls
    pub fn waiters(&self) -> usize {
        self.waiters.load(Ordering::SeqCst)
    }

    /// Snapshot of this queue
    pub fn stats(&self) -> QueueStats {
        QueueStats {
            name: self.name.clone(),
            depth: self.len(),
            waiters: self.waiters(),
        }
    }
}

impl std::fmt::Debug for QueueSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueSlot")
            .field("name", &self.name)
            .field("depth", &self.len())
            .field("waiters", &self.waiters())
            .finish()
    }
}

/// Keeps a waiter counted on its queue while alive
#[must_use = "the waiter is unregistered as soon as the guard is dropped"]
pub struct WaiterGuard<'a> {
    slot: &'a QueueSlot,
}

impl Drop for WaiterGuard<'_> {
    fn drop(&mut self) {
        self.slot.waiters.fetch_sub(1, Ordering::SeqCst);
    }
}
