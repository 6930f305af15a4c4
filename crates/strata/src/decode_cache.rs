//! Content-addressed cache of decoded values.
//!
//! Decoding the same bytes twice yields the same value, so a decode can be
//! served from memory keyed by a fingerprint of the input. The cache is global
//! to a codec, thread-safe, and bounded by **LRU eviction**: the entry that was
//! read or inserted least recently is dropped first.
//!
//! Every entry carries a [`TypeTag`]. A lookup only hits when the stored tag
//! equals the tag of the requested target type and wire format; anything else
//! behaves as a miss and falls through to a real decode. Entries never need
//! explicit invalidation since the key is derived from the content itself.

use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use std::any::{Any, TypeId};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;
use std::sync::Arc;
use strata_core::{observe, DecodeCacheConfig, Format};

/// SHA-256 of the raw encoded bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub fn of(bytes: &[u8]) -> Self {
        Self(Sha256::digest(bytes).into())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// Discriminant stored next to each cached value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeTag {
    type_id: TypeId,
    type_name: &'static str,
    format: Format,
}

impl TypeTag {
    pub fn of<T: 'static>(format: Format) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            format,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn format(&self) -> Format {
        self.format
    }
}

/// Depth marker: the value itself.
pub struct Direct;

/// Depth marker: one pointer layer above depth `D`.
pub struct Through<D>(PhantomData<D>);

/// Walks a chain of pointers down to a `T`.
///
/// The depth parameter keeps the impls apart, so the compiler picks the one
/// chain that ends in `T` for any nesting of `Box`, `Arc`, `Rc` and `&`.
pub trait Pointee<T, D> {
    fn innermost(&self) -> &T;
}

impl<T> Pointee<T, Direct> for T {
    fn innermost(&self) -> &T {
        self
    }
}

impl<T, D, P: Pointee<T, D> + ?Sized> Pointee<T, Through<D>> for Box<P> {
    fn innermost(&self) -> &T {
        (**self).innermost()
    }
}

impl<T, D, P: Pointee<T, D> + ?Sized> Pointee<T, Through<D>> for Arc<P> {
    fn innermost(&self) -> &T {
        (**self).innermost()
    }
}

impl<T, D, P: Pointee<T, D> + ?Sized> Pointee<T, Through<D>> for Rc<P> {
    fn innermost(&self) -> &T {
        (**self).innermost()
    }
}

impl<T, D, P: Pointee<T, D> + ?Sized> Pointee<T, Through<D>> for &P {
    fn innermost(&self) -> &T {
        (**self).innermost()
    }
}

struct CacheEntry {
    tag: TypeTag,
    value: Arc<dyn Any + Send + Sync>,
    /// Tick of the last insert or hit, key into `CacheState::recency`
    last_used: u64,
}

/// Entries plus their recency index, kept under one lock.
///
/// Invariant: `recency` holds exactly one tick per entry, equal to that
/// entry's `last_used`, so the smallest tick names the eviction victim.
#[derive(Default)]
struct CacheState {
    entries: HashMap<Fingerprint, CacheEntry>,
    recency: BTreeMap<u64, Fingerprint>,
    tick: u64,
}

impl CacheState {
    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    /// Move `fingerprint` to the newest position.
    fn touch(&mut self, fingerprint: &Fingerprint) {
        let tick = self.next_tick();
        if let Some(entry) = self.entries.get_mut(fingerprint) {
            self.recency.remove(&entry.last_used);
            entry.last_used = tick;
            self.recency.insert(tick, *fingerprint);
        }
    }

    /// Insert or replace, then drop the stalest entries beyond `capacity`.
    fn insert(
        &mut self,
        fingerprint: Fingerprint,
        tag: TypeTag,
        value: Arc<dyn Any + Send + Sync>,
        capacity: usize,
    ) {
        let tick = self.next_tick();
        let entry = CacheEntry {
            tag,
            value,
            last_used: tick,
        };
        if let Some(replaced) = self.entries.insert(fingerprint, entry) {
            self.recency.remove(&replaced.last_used);
        }
        self.recency.insert(tick, fingerprint);

        while self.entries.len() > capacity {
            match self.recency.pop_first() {
                Some((_, stale)) => {
                    self.entries.remove(&stale);
                }
                None => break,
            }
        }
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.recency.clear();
    }
}

/// Thread-safe, LRU-bounded cache of decoded values.
pub struct DecodeCache {
    state: Mutex<CacheState>,
    capacity: usize,
    enabled: bool,
}

impl DecodeCache {
    /// Create an enabled cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Mutex::new(CacheState {
                entries: HashMap::with_capacity(capacity.min(4096)),
                ..CacheState::default()
            }),
            capacity,
            enabled: capacity > 0,
        }
    }

    /// Create a disabled cache (all operations are no-ops).
    pub fn disabled() -> Self {
        Self::new(0)
    }

    pub fn from_config(config: &DecodeCacheConfig) -> Self {
        if config.enabled {
            Self::new(config.capacity)
        } else {
            Self::disabled()
        }
    }

    /// Look up `bytes` and, if the cached value was decoded into a `T` from
    /// `format`, clone it into `target`.
    ///
    /// Returns `false` without touching `target` on a miss or on a tag
    /// mismatch.
    pub fn get_and_assign<T>(&self, bytes: &[u8], format: Format, target: &mut T) -> bool
    where
        T: Clone + 'static,
    {
        match self.get::<T>(bytes, format) {
            Some(value) => {
                *target = value;
                true
            }
            None => false,
        }
    }

    /// Cached value for `bytes` if it was decoded into a `T` from `format`.
    pub fn get<T>(&self, bytes: &[u8], format: Format) -> Option<T>
    where
        T: Clone + 'static,
    {
        if !self.enabled {
            return None;
        }

        let fingerprint = Fingerprint::of(bytes);
        let wanted = TypeTag::of::<T>(format);

        let mut state = self.state.lock();
        let hit = state
            .entries
            .get(&fingerprint)
            .filter(|entry| entry.tag == wanted)
            .and_then(|entry| entry.value.downcast_ref::<T>().cloned());

        if hit.is_some() {
            state.touch(&fingerprint);
        }
        drop(state);

        observe::record_cache_lookup(hit.is_some());
        hit
    }

    /// Cache `value` as the decode of `bytes` in `format`.
    ///
    /// An existing entry for the same bytes is replaced, whatever its type.
    pub fn add<T>(&self, bytes: &[u8], format: Format, value: T)
    where
        T: Send + Sync + 'static,
    {
        if !self.enabled {
            return;
        }

        let fingerprint = Fingerprint::of(bytes);
        let tag = TypeTag::of::<T>(format);

        let mut state = self.state.lock();
        state.insert(fingerprint, tag, Arc::new(value), self.capacity);
        let size = state.entries.len();
        drop(state);

        observe::set_cache_size(size);
    }

    /// Cache the value behind any number of pointer layers (`Box`, `Arc`,
    /// `Rc`, `&`).
    ///
    /// `T` names the innermost value type and is what the entry is tagged
    /// with, so `&Box<Box<Account>>` satisfies later lookups for `Account`:
    ///
    /// ```
    /// use strata::{DecodeCache, Format};
    ///
    /// let cache = DecodeCache::new(8);
    /// cache.add_ptr::<u64, _, _>(b"bytes", Format::Modern, &Box::new(Box::new(7u64)));
    /// assert_eq!(cache.get::<u64>(b"bytes", Format::Modern), Some(7));
    /// ```
    pub fn add_ptr<T, D, P>(&self, bytes: &[u8], format: Format, ptr: &P)
    where
        T: Clone + Send + Sync + 'static,
        P: Pointee<T, D> + ?Sized,
    {
        self.add(bytes, format, ptr.innermost().clone());
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.clear();
        drop(state);
        observe::set_cache_size(0);
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.len(),
            capacity: self.capacity,
            enabled: self.enabled,
        }
    }
}

/// Statistics about the cache state.
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Current number of entries in the cache
    pub size: usize,
    /// Maximum capacity
    pub capacity: usize,
    /// Whether the cache is enabled
    pub enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[derive(Debug, Clone, PartialEq)]
    struct Account {
        addr: String,
        balance: u64,
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Validator {
        addr: String,
        power: u64,
    }

    fn account() -> Account {
        Account {
            addr: "abc".into(),
            balance: 100,
        }
    }

    #[test]
    fn test_cache_basic_operations() {
        let cache = DecodeCache::new(100);

        let mut target = Account {
            addr: String::new(),
            balance: 0,
        };
        assert!(!cache.get_and_assign(b"raw", Format::Legacy, &mut target));

        cache.add(b"raw", Format::Legacy, account());
        assert!(cache.get_and_assign(b"raw", Format::Legacy, &mut target));
        assert_eq!(target, account());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_type_mismatch_is_miss() {
        let cache = DecodeCache::new(100);
        cache.add(b"same-bytes", Format::Modern, account());

        let mut target = Validator {
            addr: "untouched".into(),
            power: 7,
        };
        assert!(!cache.get_and_assign(b"same-bytes", Format::Modern, &mut target));
        assert_eq!(target.addr, "untouched");
        assert_eq!(target.power, 7);
    }

    #[test]
    fn test_format_mismatch_is_miss() {
        let cache = DecodeCache::new(100);
        cache.add(b"same-bytes", Format::Legacy, account());
        assert!(cache.get::<Account>(b"same-bytes", Format::Modern).is_none());
        assert!(cache.get::<Account>(b"same-bytes", Format::Legacy).is_some());
    }

    #[test]
    fn test_add_ptr_dereferences() {
        let cache = DecodeCache::new(100);
        cache.add_ptr::<Account, _, _>(b"boxed", Format::Modern, &Box::new(account()));
        cache.add_ptr::<Account, _, _>(b"shared", Format::Modern, &Arc::new(account()));

        assert_eq!(cache.get::<Account>(b"boxed", Format::Modern), Some(account()));
        assert_eq!(cache.get::<Account>(b"shared", Format::Modern), Some(account()));
        assert!(cache.get::<Box<Account>>(b"boxed", Format::Modern).is_none());
    }

    #[test]
    fn test_add_ptr_walks_nested_pointers() {
        let cache = DecodeCache::new(100);
        let nested = Box::new(Box::new(account()));
        cache.add_ptr::<Account, _, _>(b"nested", Format::Modern, &nested);

        let mixed = Arc::new(Box::new(Rc::new(account())));
        let borrowed = &&mixed;
        cache.add_ptr::<Account, _, _>(b"mixed", Format::Legacy, borrowed);

        assert_eq!(cache.get::<Account>(b"nested", Format::Modern), Some(account()));
        assert_eq!(cache.get::<Account>(b"mixed", Format::Legacy), Some(account()));
        assert!(cache.get::<Box<Account>>(b"nested", Format::Modern).is_none());
    }

    #[test]
    fn test_add_ptr_can_stop_at_intermediate_layer() {
        let cache = DecodeCache::new(100);
        let nested = Box::new(Box::new(account()));
        cache.add_ptr::<Box<Account>, _, _>(b"nested", Format::Modern, &nested);

        assert_eq!(
            cache.get::<Box<Account>>(b"nested", Format::Modern),
            Some(Box::new(account()))
        );
        assert!(cache.get::<Account>(b"nested", Format::Modern).is_none());
    }

    #[test]
    fn test_hit_refreshes_entry_against_eviction() {
        let cache = DecodeCache::new(2);
        cache.add(b"validator-set", Format::Modern, 10u64);
        cache.add(b"params", Format::Modern, 20u64);

        // A hit on the older entry makes the newer one the eviction victim
        assert_eq!(cache.get::<u64>(b"validator-set", Format::Modern), Some(10));
        cache.add(b"block-meta", Format::Modern, 30u64);

        assert_eq!(cache.get::<u64>(b"params", Format::Modern), None);
        assert_eq!(cache.get::<u64>(b"validator-set", Format::Modern), Some(10));
        assert_eq!(cache.get::<u64>(b"block-meta", Format::Modern), Some(30));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_type_mismatch_does_not_refresh() {
        let cache = DecodeCache::new(2);
        cache.add(b"first", Format::Modern, 1u64);
        cache.add(b"second", Format::Modern, 2u64);

        // Only real hits count as use
        assert!(cache.get::<u32>(b"first", Format::Modern).is_none());
        cache.add(b"third", Format::Modern, 3u64);

        assert!(cache.get::<u64>(b"first", Format::Modern).is_none());
        assert!(cache.get::<u64>(b"second", Format::Modern).is_some());
    }

    #[test]
    fn test_replacement_refreshes_entry() {
        let cache = DecodeCache::new(2);
        cache.add(b"a", Format::Legacy, 1u64);
        cache.add(b"b", Format::Legacy, 2u64);
        cache.add(b"a", Format::Legacy, 11u64);
        cache.add(b"c", Format::Legacy, 3u64);

        assert_eq!(cache.get::<u64>(b"a", Format::Legacy), Some(11));
        assert!(cache.get::<u64>(b"b", Format::Legacy).is_none());
    }

    #[test]
    fn test_replacing_entry_does_not_grow() {
        let cache = DecodeCache::new(2);
        cache.add(b"a", Format::Legacy, 1u64);
        cache.add(b"a", Format::Legacy, 1u64);
        cache.add(b"b", Format::Legacy, 2u64);
        assert_eq!(cache.len(), 2);
        assert!(cache.get::<u64>(b"a", Format::Legacy).is_some());
    }

    #[test]
    fn test_cache_disabled() {
        let cache = DecodeCache::disabled();
        cache.add(b"a", Format::Legacy, 1u64);
        assert!(cache.get::<u64>(b"a", Format::Legacy).is_none());

        let stats = cache.stats();
        assert!(!stats.enabled);
        assert_eq!(stats.size, 0);

        let cache = DecodeCache::from_config(&DecodeCacheConfig::disabled());
        assert!(!cache.stats().enabled);
    }

    #[test]
    fn test_cache_clear() {
        let cache = DecodeCache::new(10);
        cache.add(b"a", Format::Legacy, 1u64);
        cache.add(b"b", Format::Legacy, 2u64);
        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.get::<u64>(b"a", Format::Legacy).is_none());
    }

    #[test]
    fn test_fingerprint_is_content_addressed() {
        assert_eq!(Fingerprint::of(b"abc"), Fingerprint::of(b"abc"));
        assert_ne!(Fingerprint::of(b"abc"), Fingerprint::of(b"abd"));
        assert_eq!(Fingerprint::of(b"abc").to_string().len(), 64);
    }

    #[test]
    fn test_cache_concurrent_access() {
        let cache = Arc::new(DecodeCache::new(500));
        let mut handles = vec![];

        for i in 0..10u64 {
            let cache = Arc::clone(&cache);
            handles.push(thread::spawn(move || {
                for j in 0..200u64 {
                    let key = format!("key-{}-{}", i, j);
                    cache.add(key.as_bytes(), Format::Modern, i * 1000 + j);
                    if let Some(v) = cache.get::<u64>(key.as_bytes(), Format::Modern) {
                        assert_eq!(v, i * 1000 + j);
                    }
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        let stats = cache.stats();
        assert_eq!(stats.size, 500);

        // every entry keeps exactly one recency tick
        let state = cache.state.lock();
        assert_eq!(state.recency.len(), state.entries.len());
        assert!(state
            .recency
            .iter()
            .all(|(tick, fp)| state.entries.get(fp).map(|e| e.last_used) == Some(*tick)));
    }
}
