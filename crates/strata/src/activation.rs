//! Named feature activation heights.
//!
//! Each feature switches on at its own height, independently of the main
//! format upgrade. The map is set at startup and replaced wholesale, never
//! merged, when reconfigured.

use parking_lot::RwLock;
use std::collections::BTreeMap;
use strata_core::{types::height::is_latest, Height};

/// Maps feature names to activation heights.
#[derive(Debug, Default)]
pub struct FeatureActivationRegistry {
    heights: RwLock<BTreeMap<String, Height>>,
}

impl FeatureActivationRegistry {
    pub fn new(heights: BTreeMap<String, Height>) -> Self {
        Self {
            heights: RwLock::new(heights),
        }
    }

    /// Replace the whole map.
    pub fn replace(&self, heights: BTreeMap<String, Height>) {
        tracing::debug!("Replacing feature activation map ({} features)", heights.len());
        *self.heights.write() = heights;
    }

    pub fn activation_height(&self, feature: &str) -> Option<Height> {
        self.heights.read().get(feature).copied()
    }

    /// Registered feature names with their heights, sorted by name.
    pub fn features(&self) -> Vec<(String, Height)> {
        self.heights
            .read()
            .iter()
            .map(|(name, height)| (name.clone(), *height))
            .collect()
    }

    /// True iff `feature` is registered and activates exactly at `height`.
    pub fn is_on_activation_height(&self, height: Height, feature: &str) -> bool {
        self.activation_height(feature) == Some(height)
    }

    /// True iff `feature` is registered and `|height - activation| <= tolerance`.
    ///
    /// A negative tolerance matches nothing.
    pub fn is_on_activation_height_with_tolerance(
        &self,
        height: Height,
        feature: &str,
        tolerance: Height,
    ) -> bool {
        if tolerance < 0 {
            return false;
        }
        match self.activation_height(feature) {
            Some(activation) => height.abs_diff(activation) <= tolerance.unsigned_abs(),
            None => false,
        }
    }

    /// True iff `feature` is registered and `height` is at or past its
    /// activation. The latest-height sentinel counts as past every activation.
    pub fn is_after_activation(&self, height: Height, feature: &str) -> bool {
        match self.activation_height(feature) {
            Some(activation) => is_latest(height) || height >= activation,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> FeatureActivationRegistry {
        let mut heights = BTreeMap::new();
        heights.insert("RSCAL".to_string(), 20000);
        heights.insert("BLOCK".to_string(), 30);
        FeatureActivationRegistry::new(heights)
    }

    #[test]
    fn test_exact_match() {
        let reg = registry();
        assert!(reg.is_on_activation_height(20000, "RSCAL"));
        assert!(!reg.is_on_activation_height(20001, "RSCAL"));
        assert!(!reg.is_on_activation_height(20000, "BLOCK"));
        assert!(!reg.is_on_activation_height(20000, "UNKNOWN"));
    }

    #[test]
    fn test_tolerance_window() {
        let reg = registry();
        for height in 19995..=20005 {
            assert!(
                reg.is_on_activation_height_with_tolerance(height, "RSCAL", 5),
                "height {} should be inside the window",
                height
            );
        }
        assert!(!reg.is_on_activation_height_with_tolerance(19994, "RSCAL", 5));
        assert!(!reg.is_on_activation_height_with_tolerance(20006, "RSCAL", 5));
        assert!(!reg.is_on_activation_height_with_tolerance(0, "RSCAL", 5));
        assert!(!reg.is_on_activation_height_with_tolerance(20000, "UNKNOWN", 5));
        assert!(!reg.is_on_activation_height_with_tolerance(20000, "RSCAL", -1));
    }

    #[test]
    fn test_tolerance_does_not_special_case_low_heights() {
        let mut heights = BTreeMap::new();
        heights.insert("GENESIS".to_string(), 2);
        let reg = FeatureActivationRegistry::new(heights);
        assert!(reg.is_on_activation_height_with_tolerance(0, "GENESIS", 2));
        assert!(reg.is_on_activation_height_with_tolerance(-1, "GENESIS", 3));
    }

    #[test]
    fn test_after_activation() {
        let reg = registry();
        assert!(!reg.is_after_activation(29, "BLOCK"));
        assert!(reg.is_after_activation(30, "BLOCK"));
        assert!(reg.is_after_activation(-1, "BLOCK"));
        assert!(!reg.is_after_activation(-1, "UNKNOWN"));
    }

    #[test]
    fn test_replace_is_wholesale() {
        let reg = registry();
        let mut heights = BTreeMap::new();
        heights.insert("NEW".to_string(), 7);
        reg.replace(heights);

        assert_eq!(reg.activation_height("RSCAL"), None);
        assert_eq!(reg.features(), vec![("NEW".to_string(), 7)]);
    }
}
