use crate::error::{Result, StrataError};
use crate::types::Height;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration for the decode cache
///
/// The cache only affects latency; disabling it never changes what a decode
/// returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecodeCacheConfig {
    /// Whether decoded values are cached (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Maximum number of cached decodes (default: 1,000,000)
    ///
    /// Least-recently-used entries are evicted once this is reached.
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,
}

impl Default for DecodeCacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            capacity: default_cache_capacity(),
        }
    }
}

impl DecodeCacheConfig {
    /// Enabled cache with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            enabled: true,
            capacity,
        }
    }

    /// Disabled cache
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            capacity: 0,
        }
    }
}

/// Configuration for the dual-format codec
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Height at which the network switches from the legacy to the modern format
    ///
    /// Heights `>= upgrade_height` use the modern format.
    pub upgrade_height: Height,

    /// Named feature activation heights, independent of the main upgrade
    ///
    /// Replaced wholesale on reconfiguration, never merged.
    #[serde(default)]
    pub feature_activation_heights: BTreeMap<String, Height>,

    /// Decode cache settings
    #[serde(default)]
    pub decode_cache: DecodeCacheConfig,
}

fn default_true() -> bool {
    true
}

fn default_cache_capacity() -> usize {
    1_000_000
}

impl CodecConfig {
    pub fn new(upgrade_height: Height) -> Self {
        Self {
            upgrade_height,
            feature_activation_heights: BTreeMap::new(),
            decode_cache: DecodeCacheConfig::default(),
        }
    }

    pub fn with_upgrade_height(mut self, upgrade_height: Height) -> Self {
        self.upgrade_height = upgrade_height;
        self
    }

    /// Register a single feature activation height
    pub fn with_feature(mut self, name: impl Into<String>, height: Height) -> Self {
        self.feature_activation_heights.insert(name.into(), height);
        self
    }

    /// Replace the whole feature activation map
    pub fn with_features(mut self, features: BTreeMap<String, Height>) -> Self {
        self.feature_activation_heights = features;
        self
    }

    pub fn with_decode_cache(mut self, decode_cache: DecodeCacheConfig) -> Self {
        self.decode_cache = decode_cache;
        self
    }

    /// Set the decode cache capacity, keeping it enabled
    pub fn with_decode_cache_capacity(mut self, capacity: usize) -> Self {
        self.decode_cache = DecodeCacheConfig::with_capacity(capacity);
        self
    }

    pub fn without_decode_cache(mut self) -> Self {
        self.decode_cache = DecodeCacheConfig::disabled();
        self
    }

    /// Check the configuration for values that cannot work
    pub fn validate(&self) -> Result<()> {
        if self.decode_cache.enabled && self.decode_cache.capacity == 0 {
            return Err(StrataError::Config(
                "decode cache is enabled with zero capacity".into(),
            ));
        }
        if self.upgrade_height < 0 {
            return Err(StrataError::Config(format!(
                "upgrade height must not be negative, got {}",
                self.upgrade_height
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_json() {
        let cfg: CodecConfig = serde_json::from_str(r#"{ "upgrade_height": 9 }"#).unwrap();
        assert_eq!(cfg.upgrade_height, 9);
        assert!(cfg.feature_activation_heights.is_empty());
        assert!(cfg.decode_cache.enabled);
        assert_eq!(cfg.decode_cache.capacity, 1_000_000);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_features_from_json() {
        let cfg: CodecConfig = serde_json::from_str(
            r#"{
                "upgrade_height": 100,
                "feature_activation_heights": { "RSCAL": 20000, "BLOCK": 300 },
                "decode_cache": { "capacity": 16 }
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.feature_activation_heights.get("RSCAL"), Some(&20000));
        assert_eq!(cfg.feature_activation_heights.len(), 2);
        assert!(cfg.decode_cache.enabled);
        assert_eq!(cfg.decode_cache.capacity, 16);
    }

    #[test]
    fn test_with_features_replaces() {
        let mut replacement = BTreeMap::new();
        replacement.insert("B".to_string(), 5);
        let cfg = CodecConfig::new(1)
            .with_feature("A", 10)
            .with_features(replacement);
        assert!(!cfg.feature_activation_heights.contains_key("A"));
        assert_eq!(cfg.feature_activation_heights.get("B"), Some(&5));
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let cfg = CodecConfig::new(1).with_decode_cache_capacity(0);
        assert!(matches!(cfg.validate(), Err(StrataError::Config(_))));

        let cfg = CodecConfig::new(1).without_decode_cache();
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_negative_upgrade_height() {
        let cfg = CodecConfig::new(-1);
        assert!(cfg.validate().is_err());
    }
}
