//! Storage contract and the in-memory backend.
//!
//! The traits define what the engine needs from a record store. The
//! in-memory backend and dataset loader serve tests, benchmarks and the CLI.

mod dataset;
mod memory;
mod traits;

pub use dataset::Dataset;
pub use memory::{InMemoryRecordStore, InMemoryStores, StaticUserCount};
pub use traits::{RecordStore, RecordStores, StorageError, UserCountProvider};
