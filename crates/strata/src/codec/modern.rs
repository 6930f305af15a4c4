//! Modern (post-upgrade) wire format.
//!
//! Compact positional binary via `bincode`: fixed-width little-endian integers,
//! no structure names, trailing bytes rejected, bounded allocation.

use bincode::Options;
use serde::{de::DeserializeOwned, Serialize};
use strata_core::{Result, StrataError};

/// Upper bound on a single encoded value
pub const MAX_MODERN_SIZE: u64 = 64 * 1024 * 1024;

fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
        .with_limit(MAX_MODERN_SIZE)
        .reject_trailing_bytes()
}

pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    options()
        .serialize(value)
        .map_err(|e| StrataError::Encode(e.to_string()))
}

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    options()
        .deserialize(bytes)
        .map_err(|e| StrataError::Decode(e.to_string()))
}
