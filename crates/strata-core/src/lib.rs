//! Strata Core: Traits and types for the strata state layer
//!
//! This crate defines the shared abstractions used by the codec and the store
//! backends:
//! - Heights, wire formats and per-type format capabilities
//! - The ordered key/value store contract (`KvStore`, `StoreIterator`, `WriteBatch`)
//! - The `Durable` capability, absent from in-memory backends
//! - Codec and cache configuration
//! - Optional metrics shims (`observe` feature)

pub mod config;
pub mod error;
pub mod observe;
pub mod traits;
pub mod types;

pub use config::{CodecConfig, DecodeCacheConfig};
pub use error::{Result, StrataError};
pub use traits::{Durable, KvStore, StoreIterator, WriteBatch};
pub use types::{Capabilities, Format, Height, WriteInfo, LATEST_HEIGHT};
