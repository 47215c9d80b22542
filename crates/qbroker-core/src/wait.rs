//! Blocking wait for a payload
//!
//! A dequeue that finds its queue empty hands the actual wait to a background
//! task so the caller can race it against a deadline. The task only reports
//! that the queue is non-empty; the caller does the pop, so an abandoned wait
//! never holds a payload.

use std::sync::Arc;

use qbroker_storage::QueueSlot;
use tokio::task::JoinHandle;
use tracing::debug;

/// Wait until `slot` holds at least one payload.
///
/// Every wakeup re-checks the queue under its lock: a signal can be stale (a
/// stored permit from an enqueue nobody was waiting for) or already spent by
/// another dequeuer that took the payload first.
pub async fn wait_available(slot: &QueueSlot) {
    let _waiter = slot.register_waiter();

    loop {
        let notified = slot.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();

        if !slot.is_empty() {
            return;
        }

        notified.await;
    }
}

/// A blocked dequeue call and its background wait task.
///
/// The task is aborted when this value is dropped, so a caller that goes away
/// (timeout or disconnect) never leaves a waiter behind.
pub(crate) struct PendingWait {
    queue: String,
    task: JoinHandle<()>,
}

impl PendingWait {
    /// Start waiting on `slot` in a separate task
    pub(crate) fn spawn(slot: Arc<QueueSlot>) -> Self {
        let queue = slot.name().to_string();
        let task = tokio::spawn(async move { wait_available(&slot).await });
        debug!(queue = %queue, "Dequeue waiting for a payload");
        Self { queue, task }
    }

    /// Resolves once the wait task has seen a payload in the queue
    pub(crate) async fn ready(&mut self) {
        let _ = (&mut self.task).await;
    }

    /// Tear the wait task down after the deadline fired and wait until it is gone
    pub(crate) async fn cancel(mut self) {
        self.task.abort();
        let _ = (&mut self.task).await;
        debug!(queue = %self.queue, "Dequeue wait cancelled");
    }
}

impl Drop for PendingWait {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_wait_returns_when_payload_queued() {
        let slot = QueueSlot::new("test");
        slot.push("ready".to_string());

        wait_available(&slot).await;
        assert_eq!(slot.waiters(), 0);
        assert_eq!(slot.len(), 1);
    }

    #[tokio::test]
    async fn test_stale_signal_is_rechecked() {
        let slot = Arc::new(QueueSlot::new("test"));

        // Leaves a stored permit behind with an empty queue.
        slot.push("taken".to_string());
        assert_eq!(slot.pop().as_deref(), Some("taken"));

        let mut wait = PendingWait::spawn(Arc::clone(&slot));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(slot.waiters(), 1);

        slot.push("fresh".to_string());
        tokio::time::timeout(Duration::from_secs(1), wait.ready())
            .await
            .unwrap();
        assert_eq!(slot.pop().as_deref(), Some("fresh"));
    }

    #[tokio::test]
    async fn test_cancel_releases_waiter() {
        let slot = Arc::new(QueueSlot::new("test"));
        let wait = PendingWait::spawn(Arc::clone(&slot));
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(slot.waiters(), 1);

        wait.cancel().await;
        assert_eq!(slot.waiters(), 0);

        // A later payload stays in the queue for the next caller.
        slot.push("later".to_string());
        assert_eq!(slot.pop().as_deref(), Some("later"));
    }

    #[tokio::test]
    async fn test_cancel_after_wakeup_keeps_payload() {
        let slot = Arc::new(QueueSlot::new("test"));
        let wait = PendingWait::spawn(Arc::clone(&slot));
        tokio::time::sleep(Duration::from_millis(20)).await;

        // The wait task finishes before the deadline handler gets to run.
        slot.push("x".to_string());
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(slot.waiters(), 0);

        wait.cancel().await;
        assert_eq!(slot.waiters(), 0);
        assert_eq!(slot.len(), 1);
        assert_eq!(slot.pop().as_deref(), Some("x"));
    }

    #[tokio::test]
    async fn test_drop_after_wakeup_keeps_payload() {
        let slot = Arc::new(QueueSlot::new("test"));
        let wait = PendingWait::spawn(Arc::clone(&slot));
        tokio::time::sleep(Duration::from_millis(20)).await;

        slot.push("x".to_string());
        tokio::time::sleep(Duration::from_millis(20)).await;

        drop(wait);
        assert_eq!(slot.len(), 1);
        assert_eq!(slot.pop().as_deref(), Some("x"));
    }

    #[tokio::test]
    async fn test_drop_aborts_wait_task() {
        let slot = Arc::new(QueueSlot::new("test"));
        let wait = PendingWait::spawn(Arc::clone(&slot));
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(slot.waiters(), 1);

        drop(wait);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(slot.waiters(), 0);
    }
}
