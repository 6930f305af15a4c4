pub mod codec;

pub use codec::{CodecConfig, DecodeCacheConfig};
