//! Strata Prelude
//!
//! Import this to get all commonly used types and traits:
//!
//! ```
//! use strata::prelude::*;
//! ```

// Core types
pub use crate::{Capabilities, Format, Height, Result, StrataError, WriteInfo, LATEST_HEIGHT};

// Configs
pub use crate::{CodecConfig, DecodeCacheConfig};

// Traits
pub use crate::{Encodable, KvStore, StoreIterator, WriteBatch};

// Codec
pub use crate::{CodecBuilder, DualCodec, FeatureActivationRegistry, UpgradeGate};

// Storage
pub use crate::{MemDb, StateBatch, StateDb};

// Re-export common external deps
pub use anyhow;
pub use serde::{Deserialize, Serialize};
pub use std::sync::Arc;
pub use tracing;
