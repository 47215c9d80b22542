//! qbroker Types - Core domain types for the message broker
//!
//! This crate contains the error taxonomy and snapshot types shared across
//! qbroker components.

pub mod error;
pub mod queue;

// Re-export commonly used types
pub use error::{Error, Result};
pub use queue::QueueStats;
