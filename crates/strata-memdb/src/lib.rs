//! In-memory ordered store backend
//!
//! Provides a sorted key/value store for bounded key counts (tests, local
//! tooling, ephemeral state).
//!
//! Key features:
//! - Hash map plus sorted key index, updated together under one reader/writer lock
//! - Raw byte ordering for keys of any length
//! - Snapshot iterators, forward and reverse, isolated from later writes
//! - Ordered (non-atomic) write batches
//! - No `Durable` capability: sync/close/stats do not exist on this backend

pub mod batch;
pub mod iter;
pub mod keys;
pub mod store;

pub use batch::MemBatch;
pub use iter::{Direction, MemIterator};
pub use store::MemDb;
