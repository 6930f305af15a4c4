//! Optional metrics instrumentation for strata.
//!
//! When the `observe` feature is enabled, codec, cache and store operations
//! emit counters and gauges via the [`metrics`] crate. A downstream node must
//! install a metrics recorder to collect them.
//!
//! When the feature is **not** enabled every function in this module is a
//! zero-cost no-op.

use crate::types::Format;

/// Record a marshal in the given format.
///
/// - `strata.codec.encode_total` – counter with `format` label
#[inline]
pub fn record_encode(format: Format) {
    #[cfg(feature = "observe")]
    {
        metrics::counter!("strata.codec.encode_total", "format" => format.as_str()).increment(1);
    }
    #[cfg(not(feature = "observe"))]
    {
        let _ = format;
    }
}

/// Record an unmarshal in the given format (cache hits included).
///
/// - `strata.codec.decode_total` – counter with `format` label
#[inline]
pub fn record_decode(format: Format) {
    #[cfg(feature = "observe")]
    {
        metrics::counter!("strata.codec.decode_total", "format" => format.as_str()).increment(1);
    }
    #[cfg(not(feature = "observe"))]
    {
        let _ = format;
    }
}

/// Record a decode cache hit or miss.
///
/// - `strata.decode_cache.lookups_total` – counter with `result` label (`hit` / `miss`)
#[inline]
pub fn record_cache_lookup(hit: bool) {
    #[cfg(feature = "observe")]
    {
        let result = if hit { "hit" } else { "miss" };
        metrics::counter!("strata.decode_cache.lookups_total", "result" => result).increment(1);
    }
    #[cfg(not(feature = "observe"))]
    {
        let _ = hit;
    }
}

/// Set the current decode cache size gauge.
///
/// - `strata.decode_cache.size` – gauge
#[inline]
pub fn set_cache_size(size: usize) {
    #[cfg(feature = "observe")]
    {
        metrics::gauge!("strata.decode_cache.size").set(size as f64);
    }
    #[cfg(not(feature = "observe"))]
    {
        let _ = size;
    }
}

/// Record operations applied by a batch write.
///
/// - `strata.memdb.batch_ops_total` – counter
#[inline]
pub fn record_batch_write(ops: usize) {
    #[cfg(feature = "observe")]
    {
        metrics::counter!("strata.memdb.batch_ops_total").increment(ops as u64);
    }
    #[cfg(not(feature = "observe"))]
    {
        let _ = ops;
    }
}
