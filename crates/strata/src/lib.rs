//! Strata: height-versioned state encoding and storage
//!
//! Every validator must encode and decode state identically at every height,
//! including across the switch from the legacy to the modern wire format.
//! Strata provides:
//! - **UpgradeGate**: which format is canonical at a height
//! - **FeatureActivationRegistry**: per-feature activation heights with tolerance windows
//! - **DualCodec**: marshal/unmarshal in the format a height calls for
//! - **DecodeCache**: type-checked, LRU-bounded cache of decoded values
//! - **MemDb**: ordered in-memory store with snapshot iterators and batches
//! - **StateDb**: typed reads and writes tying codec and store together
//!
//! # Quick Start
//!
//! ```
//! use strata::prelude::*;
//!
//! #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
//! struct Account {
//!     addr: String,
//!     balance: u64,
//! }
//! impl Encodable for Account {}
//!
//! # fn main() -> Result<()> {
//! let mut builder = DualCodec::builder(CodecConfig::new(9));
//! builder.register_structure::<Account>("auth/Account")?;
//! let db = StateDb::new(Arc::new(builder.build()?), MemDb::new());
//!
//! let account = Account { addr: "abc".into(), balance: 100 };
//! db.put(b"acct/abc", &account, 12)?;
//! assert_eq!(db.get::<Account>(b"acct/abc", 12)?, Some(account));
//! # Ok(())
//! # }
//! ```

pub mod activation;
pub mod codec;
pub mod db;
pub mod decode_cache;
pub mod prelude;
pub mod upgrade;

// Re-export core types
pub use strata_core::{
    config::{CodecConfig, DecodeCacheConfig},
    error::{Result, StrataError},
    traits::{Durable, KvStore, StoreIterator, WriteBatch},
    types::{Capabilities, Format, Height, WriteInfo, LATEST_HEIGHT},
};

// Re-export the in-memory backend
pub use strata_memdb::{Direction, MemBatch, MemDb, MemIterator};

// Re-export main types from this crate
pub use activation::FeatureActivationRegistry;
pub use codec::{CodecBuilder, DualCodec, Encodable, TypeRegistry};
pub use db::{StateBatch, StateDb};
pub use decode_cache::{CacheStats, DecodeCache, Fingerprint, Pointee, TypeTag};
pub use upgrade::{OverrideGuard, UpgradeGate};
