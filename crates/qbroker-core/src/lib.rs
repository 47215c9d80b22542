//! qbroker Core - Core business logic for the message broker
//!
//! This crate contains the broker implementation:
//! - Broker: enqueue and dequeue over the queue registry
//! - Blocking dequeue with a per-call deadline

pub mod broker;
pub mod wait;

// Re-exports
pub use broker::Broker;
