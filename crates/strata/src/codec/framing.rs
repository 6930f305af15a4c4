//! Length-prefixed framing.
//!
//! A frame is an unsigned LEB128 varint holding the payload length, followed by
//! exactly that many payload bytes.

use strata_core::{Result, StrataError};

/// Longest varint encoding of a u64
pub const MAX_VARINT_LEN: usize = 10;

/// Append `value` as an unsigned LEB128 varint.
pub fn write_uvarint(buf: &mut Vec<u8>, mut value: u64) {
    while value >= 0x80 {
        buf.push((value as u8 & 0x7F) | 0x80);
        value >>= 7;
    }
    buf.push(value as u8);
}

/// Read an unsigned LEB128 varint, returning `(value, bytes_consumed)`.
///
/// Returns `None` for empty, truncated or overflowing input.
pub fn read_uvarint(buf: &[u8]) -> Option<(u64, usize)> {
    let mut value: u64 = 0;
    for (i, &byte) in buf.iter().enumerate().take(MAX_VARINT_LEN) {
        let bits = u64::from(byte & 0x7F);
        if i == MAX_VARINT_LEN - 1 && byte > 1 {
            return None;
        }
        value |= bits << (7 * i);
        if byte & 0x80 == 0 {
            return Some((value, i + 1));
        }
    }
    None
}

/// Prefix `payload` with its length.
pub fn frame(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len() + MAX_VARINT_LEN);
    write_uvarint(&mut out, payload.len() as u64);
    out.extend_from_slice(payload);
    out
}

/// Strip the length prefix, requiring the frame to be complete and exact.
pub fn unframe(bytes: &[u8]) -> Result<&[u8]> {
    let (len, consumed) = read_uvarint(bytes)
        .ok_or_else(|| StrataError::Decode("invalid length prefix".into()))?;
    let rest = &bytes[consumed..];
    let len = usize::try_from(len)
        .map_err(|_| StrataError::Decode(format!("length prefix {} too large", len)))?;

    if rest.len() < len {
        return Err(StrataError::Decode(format!(
            "truncated frame: prefix says {} bytes, {} available",
            len,
            rest.len()
        )));
    }
    if rest.len() > len {
        return Err(StrataError::Decode(format!(
            "{} trailing bytes after frame",
            rest.len() - len
        )));
    }
    Ok(rest)
}
