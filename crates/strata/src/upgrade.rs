//! Height-gated format switch.
//!
//! The network changes from the legacy to the modern wire format at a single
//! upgrade height. All nodes must agree on the answer for every height:
//!
//! - heights `< upgrade_height`: legacy
//! - heights `>= upgrade_height`: modern
//! - [`LATEST_HEIGHT`] (`-1`): always modern
//!
//! A tri-state override (unset / force-legacy / force-modern) exists for tests.
//! It is atomic, and [`UpgradeGate::override_scope`] restores the previous state
//! when the guard drops.

use std::sync::atomic::{AtomicU8, Ordering};
use strata_core::{types::height::is_latest, Format, Height};

const OVERRIDE_UNSET: u8 = 0;
const OVERRIDE_LEGACY: u8 = 1;
const OVERRIDE_MODERN: u8 = 2;

fn encode_override(state: Option<bool>) -> u8 {
    match state {
        None => OVERRIDE_UNSET,
        Some(false) => OVERRIDE_LEGACY,
        Some(true) => OVERRIDE_MODERN,
    }
}

fn decode_override(raw: u8) -> Option<bool> {
    match raw {
        OVERRIDE_LEGACY => Some(false),
        OVERRIDE_MODERN => Some(true),
        _ => None,
    }
}

/// Decides whether the modern format applies at a height.
#[derive(Debug)]
pub struct UpgradeGate {
    upgrade_height: Height,
    override_state: AtomicU8,
}

impl UpgradeGate {
    pub fn new(upgrade_height: Height) -> Self {
        Self {
            upgrade_height,
            override_state: AtomicU8::new(OVERRIDE_UNSET),
        }
    }

    pub fn upgrade_height(&self) -> Height {
        self.upgrade_height
    }

    /// Whether `height` is on or after the upgrade.
    ///
    /// An active override wins unconditionally.
    pub fn is_after_upgrade(&self, height: Height) -> bool {
        if let Some(forced) = self.current_override() {
            return forced;
        }
        is_latest(height) || height >= self.upgrade_height
    }

    /// Canonical format at `height`.
    pub fn format_at(&self, height: Height) -> Format {
        Format::for_upgrade(self.is_after_upgrade(height))
    }

    /// Force every height to be treated as after (`true`) or before (`false`)
    /// the upgrade. Test use only; pair with [`clear_override`](Self::clear_override)
    /// or prefer [`override_scope`](Self::override_scope).
    pub fn set_override(&self, after_upgrade: bool) {
        tracing::warn!(
            "Upgrade override set: treating all heights as {} upgrade",
            if after_upgrade { "after" } else { "before" }
        );
        self.override_state
            .store(encode_override(Some(after_upgrade)), Ordering::SeqCst);
    }

    pub fn clear_override(&self) {
        if self.override_state.swap(OVERRIDE_UNSET, Ordering::SeqCst) != OVERRIDE_UNSET {
            tracing::warn!("Upgrade override cleared");
        }
    }

    pub fn current_override(&self) -> Option<bool> {
        decode_override(self.override_state.load(Ordering::SeqCst))
    }

    /// Set the override until the returned guard is dropped, then restore
    /// whatever state was active before.
    pub fn override_scope(&self, after_upgrade: bool) -> OverrideGuard<'_> {
        let previous = self
            .override_state
            .swap(encode_override(Some(after_upgrade)), Ordering::SeqCst);
        tracing::warn!(
            "Scoped upgrade override: treating all heights as {} upgrade",
            if after_upgrade { "after" } else { "before" }
        );
        OverrideGuard {
            gate: self,
            previous,
        }
    }
}

/// Restores the previous override state on drop.
#[must_use = "the override is reverted as soon as the guard is dropped"]
pub struct OverrideGuard<'a> {
    gate: &'a UpgradeGate,
    previous: u8,
}

impl Drop for OverrideGuard<'_> {
    fn drop(&mut self) {
        self.gate
            .override_state
            .store(self.previous, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upgrade_boundary() {
        let gate = UpgradeGate::new(9);
        assert!(!gate.is_after_upgrade(0));
        assert!(!gate.is_after_upgrade(8));
        assert!(gate.is_after_upgrade(9));
        assert!(gate.is_after_upgrade(10));
        assert!(gate.is_after_upgrade(-1));
    }

    #[test]
    fn test_latest_always_after_upgrade() {
        for upgrade_height in [0, 1, 9, 1_000_000, Height::MAX] {
            assert!(UpgradeGate::new(upgrade_height).is_after_upgrade(-1));
        }
    }

    #[test]
    fn test_format_at() {
        let gate = UpgradeGate::new(9);
        assert_eq!(gate.format_at(5), Format::Legacy);
        assert_eq!(gate.format_at(9), Format::Modern);
    }

    #[test]
    fn test_override_wins() {
        let gate = UpgradeGate::new(9);

        gate.set_override(false);
        assert!(!gate.is_after_upgrade(100));
        assert!(!gate.is_after_upgrade(-1));

        gate.set_override(true);
        assert!(gate.is_after_upgrade(0));

        gate.clear_override();
        assert_eq!(gate.current_override(), None);
        assert!(!gate.is_after_upgrade(0));
    }

    #[test]
    fn test_override_scope_restores_previous() {
        let gate = UpgradeGate::new(9);
        {
            let _outer = gate.override_scope(true);
            assert!(gate.is_after_upgrade(1));
            {
                let _inner = gate.override_scope(false);
                assert!(!gate.is_after_upgrade(100));
            }
            assert_eq!(gate.current_override(), Some(true));
        }
        assert_eq!(gate.current_override(), None);
        assert!(!gate.is_after_upgrade(1));
    }
}
