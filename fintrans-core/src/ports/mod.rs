//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. Services depend
//! only on these traits, not on concrete implementations.

mod processor;
mod storage;

pub use processor::TransferProcessor;
pub use storage::{is_valid_key, KeyValueStore};
