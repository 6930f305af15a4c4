/// Consensus block number.
///
/// Signed so that [`LATEST_HEIGHT`] can be expressed; real heights are never
/// negative.
pub type Height = i64;

/// Sentinel height used by height-unaware call sites.
///
/// Always treated as being after the upgrade, regardless of where the upgrade
/// height sits.
pub const LATEST_HEIGHT: Height = -1;

/// Whether `height` is the latest-height sentinel.
#[inline]
pub fn is_latest(height: Height) -> bool {
    height == LATEST_HEIGHT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_sentinel() {
        assert!(is_latest(-1));
        assert!(!is_latest(0));
        assert!(!is_latest(9));
    }
}
