//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - JSON files on disk (and an in-memory map) for KeyValueStore
//! - reqwest HTTP client and an in-process stub for TransferProcessor

pub mod file_store;
pub mod http_processor;
pub mod local_processor;
pub mod memory_store;

pub use file_store::FileStore;
pub use http_processor::HttpProcessor;
pub use local_processor::LocalProcessor;
pub use memory_store::MemoryStore;
