use strata_core::{Result, StrataError};

/// Reject empty keys. A store key must carry at least one byte.
#[inline]
pub fn check_key(key: &[u8]) -> Result<()> {
    if key.is_empty() {
        return Err(StrataError::EmptyKey);
    }
    Ok(())
}

/// Reject explicitly empty range bounds. `None` is the open bound.
pub fn check_bounds(start: Option<&[u8]>, end: Option<&[u8]>) -> Result<()> {
    if let Some(start) = start {
        check_key(start)?;
    }
    if let Some(end) = end {
        check_key(end)?;
    }
    Ok(())
}

/// Exclusive upper bound covering every key that starts with `prefix`
///
/// Increments the last byte that is not `0xff`, dropping the trailing `0xff`
/// bytes. Returns `None` when no such bound exists (empty prefix or all
/// `0xff`), meaning the range is open-ended.
pub fn prefix_end(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut end = prefix.to_vec();
    while let Some(last) = end.last_mut() {
        if *last == 0xff {
            end.pop();
        } else {
            *last += 1;
            return Some(end);
        }
    }
    None
}
