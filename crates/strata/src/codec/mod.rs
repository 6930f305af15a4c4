//! Height-versioned dual-format codec.
//!
//! Every marshal and unmarshal is tied to a block height. The
//! [`UpgradeGate`] decides whether the legacy or the modern format is
//! canonical at that height, and the value's declared [`Capabilities`] decide
//! whether it may be carried in that format at all:
//!
//! | has modern | after upgrade | result |
//! |------------|---------------|--------|
//! | no         | no            | legacy |
//! | no         | yes           | `IncompatibleType` |
//! | yes        | yes           | modern |
//! | yes        | no            | legacy (or `IncompatibleType` if modern-only) |
//!
//! Decodes consult the [`DecodeCache`] first.
//!
//! # Example
//!
//! ```
//! use serde::{Deserialize, Serialize};
//! use strata::codec::{DualCodec, Encodable};
//! use strata::CodecConfig;
//!
//! #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
//! struct Account {
//!     addr: String,
//!     balance: u64,
//! }
//! impl Encodable for Account {}
//!
//! # fn main() -> strata::Result<()> {
//! let mut builder = DualCodec::builder(CodecConfig::new(9));
//! builder.register_structure::<Account>("auth/Account")?;
//! let codec = builder.build()?;
//!
//! let account = Account { addr: "abc".into(), balance: 100 };
//! let bytes = codec.marshal_binary_bare(&account, 5)?;
//! let decoded: Account = codec.decode(&bytes, 5)?;
//! assert_eq!(decoded, account);
//! # Ok(())
//! # }
//! ```

pub mod encodable;
pub mod framing;
pub mod legacy;
pub mod modern;
pub mod registry;

pub use encodable::Encodable;
pub use registry::TypeRegistry;

use std::sync::Arc;
use strata_core::{observe, Capabilities, CodecConfig, Format, Height, Result, StrataError};

use crate::activation::FeatureActivationRegistry;
use crate::decode_cache::DecodeCache;
use crate::upgrade::UpgradeGate;

/// Collects registrations before the codec is used.
///
/// Registration must finish before any marshal/unmarshal traffic;
/// [`build`](Self::build) freezes it.
pub struct CodecBuilder {
    config: CodecConfig,
    registry: TypeRegistry,
}

impl CodecBuilder {
    pub fn new(config: CodecConfig) -> Self {
        Self {
            config,
            registry: TypeRegistry::new(),
        }
    }

    /// Register a concrete type name under both formats.
    pub fn register_structure<T: Encodable>(&mut self, name: &str) -> Result<&mut Self> {
        self.registry.register_structure::<T>(name)?;
        Ok(self)
    }

    /// Register a tagged-union interface and its allowed concrete tags under
    /// both formats.
    pub fn register_interface<I: Encodable>(
        &mut self,
        name: &str,
        impls: &[&str],
    ) -> Result<&mut Self> {
        self.registry.register_interface::<I>(name, impls)?;
        Ok(self)
    }

    /// Validate the configuration and freeze the registrations.
    pub fn build(self) -> Result<DualCodec> {
        self.config.validate()?;

        let gate = Arc::new(UpgradeGate::new(self.config.upgrade_height));
        let features = Arc::new(FeatureActivationRegistry::new(
            self.config.feature_activation_heights.clone(),
        ));
        let cache = DecodeCache::from_config(&self.config.decode_cache);

        tracing::info!(
            "Codec ready: upgrade height {}, {} structures, {} interfaces, {} features, decode cache {}",
            self.config.upgrade_height,
            self.registry.structure_count(),
            self.registry.interface_count(),
            self.config.feature_activation_heights.len(),
            if self.config.decode_cache.enabled {
                format!("capacity {}", self.config.decode_cache.capacity)
            } else {
                "disabled".to_string()
            }
        );

        Ok(DualCodec {
            gate,
            features,
            registry: self.registry,
            cache,
        })
    }
}

/// Marshals and unmarshals values in whichever format a height calls for.
///
/// Immutable after construction apart from the test-only upgrade override and
/// the feature map, so one instance can be shared across threads.
pub struct DualCodec {
    gate: Arc<UpgradeGate>,
    features: Arc<FeatureActivationRegistry>,
    registry: TypeRegistry,
    cache: DecodeCache,
}

impl DualCodec {
    pub fn builder(config: CodecConfig) -> CodecBuilder {
        CodecBuilder::new(config)
    }

    /// Codec with no registrations.
    pub fn new(config: CodecConfig) -> Result<Self> {
        CodecBuilder::new(config).build()
    }

    pub fn upgrade_gate(&self) -> &Arc<UpgradeGate> {
        &self.gate
    }

    pub fn features(&self) -> &Arc<FeatureActivationRegistry> {
        &self.features
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn decode_cache(&self) -> &DecodeCache {
        &self.cache
    }

    /// Whether `height` is on or after the format upgrade.
    ///
    /// Exposed so other modules branch exactly as the codec does.
    pub fn is_after_upgrade(&self, height: Height) -> bool {
        self.gate.is_after_upgrade(height)
    }

    /// Format a `T` is carried in at `height`, or `IncompatibleType`.
    pub fn format_for<T: Encodable>(&self, height: Height) -> Result<Format> {
        let after_upgrade = self.gate.is_after_upgrade(height);
        let format = match T::CAPABILITIES {
            caps if !caps.has_modern() && after_upgrade => {
                return Err(StrataError::IncompatibleType {
                    type_name: T::type_name(),
                    height,
                    format: Format::Modern,
                })
            }
            Capabilities::ModernOnly if !after_upgrade => {
                return Err(StrataError::IncompatibleType {
                    type_name: T::type_name(),
                    height,
                    format: Format::Legacy,
                })
            }
            _ => Format::for_upgrade(after_upgrade),
        };
        tracing::trace!("{} at height {} -> {}", T::type_name(), height, format);
        Ok(format)
    }

    pub fn marshal_binary_bare<T: Encodable>(&self, value: &T, height: Height) -> Result<Vec<u8>> {
        let format = self.format_for::<T>(height)?;
        self.registry.check_concrete(value, format)?;

        let bytes = match format {
            Format::Legacy => legacy::encode(value, self.registry.structure_name::<T>(format))?,
            Format::Modern => modern::encode(value)?,
        };
        observe::record_encode(format);
        Ok(bytes)
    }

    pub fn marshal_binary_length_prefixed<T: Encodable>(
        &self,
        value: &T,
        height: Height,
    ) -> Result<Vec<u8>> {
        let payload = self.marshal_binary_bare(value, height)?;
        Ok(framing::frame(&payload))
    }

    /// Decode `bytes` written at `height` into `target`.
    ///
    /// `target` is left untouched on error.
    pub fn unmarshal_binary_bare<T: Encodable>(
        &self,
        bytes: &[u8],
        target: &mut T,
        height: Height,
    ) -> Result<()> {
        let format = self.format_for::<T>(height)?;
        if self.cache.get_and_assign(bytes, format, target) {
            observe::record_decode(format);
            return Ok(());
        }
        *target = self.decode_uncached(bytes, format)?;
        Ok(())
    }

    pub fn unmarshal_binary_length_prefixed<T: Encodable>(
        &self,
        bytes: &[u8],
        target: &mut T,
        height: Height,
    ) -> Result<()> {
        let payload = framing::unframe(bytes)?;
        self.unmarshal_binary_bare(payload, target, height)
    }

    /// Decode `bytes` written at `height`, returning the value.
    pub fn decode<T: Encodable>(&self, bytes: &[u8], height: Height) -> Result<T> {
        let format = self.format_for::<T>(height)?;
        if let Some(value) = self.cache.get::<T>(bytes, format) {
            observe::record_decode(format);
            return Ok(value);
        }
        self.decode_uncached(bytes, format)
    }

    /// Length-prefixed counterpart of [`decode`](Self::decode).
    pub fn decode_length_prefixed<T: Encodable>(&self, bytes: &[u8], height: Height) -> Result<T> {
        self.decode(framing::unframe(bytes)?, height)
    }

    fn decode_uncached<T: Encodable>(&self, bytes: &[u8], format: Format) -> Result<T> {
        let value: T = match format {
            Format::Legacy => legacy::decode(bytes, self.registry.structure_name::<T>(format))?,
            Format::Modern => modern::decode(bytes)?,
        };
        self.registry.check_concrete(&value, format)?;
        observe::record_decode(format);

        self.cache.add(bytes, format, value.clone());
        Ok(value)
    }
}
