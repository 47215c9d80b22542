//! qbroker Storage - Queue registry for the message broker
//!
//! Holds every named queue in memory together with the wait condition its
//! blocked dequeuers park on.

pub mod registry;
pub mod slot;

// Re-exports
pub use registry::QueueRegistry;
pub use slot::{QueueSlot, WaiterGuard};
