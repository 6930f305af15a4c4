use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use strata_core::{traits::KvStore, Result};

use crate::batch::MemBatch;
use crate::iter::{Direction, MemIterator};
use crate::keys::{check_bounds, check_key, prefix_end};

/// Map plus sorted key index, always mutated together under one lock.
///
/// Invariant: `ordered` holds exactly the keys of `map`, strictly ascending by
/// raw byte order, without duplicates.
#[derive(Default)]
pub(crate) struct MemState {
    pub(crate) map: HashMap<Vec<u8>, Vec<u8>>,
    pub(crate) ordered: Vec<Vec<u8>>,
}

impl MemState {
    pub(crate) fn insert(&mut self, key: &[u8], value: &[u8]) {
        if self.map.insert(key.to_vec(), value.to_vec()).is_none() {
            if let Err(idx) = self.ordered.binary_search_by(|k| k.as_slice().cmp(key)) {
                self.ordered.insert(idx, key.to_vec());
            }
        }
    }

    pub(crate) fn remove(&mut self, key: &[u8]) {
        if self.map.remove(key).is_some() {
            if let Ok(idx) = self.ordered.binary_search_by(|k| k.as_slice().cmp(key)) {
                self.ordered.remove(idx);
            }
        }
    }

    /// Index range of `ordered` falling inside `[start, end)`
    pub(crate) fn window(&self, start: Option<&[u8]>, end: Option<&[u8]>) -> (usize, usize) {
        let lo = match start {
            Some(start) => self.ordered.partition_point(|k| k.as_slice() < start),
            None => 0,
        };
        let hi = match end {
            Some(end) => self.ordered.partition_point(|k| k.as_slice() < end),
            None => self.ordered.len(),
        };
        (lo, hi.max(lo))
    }
}

/// Ordered in-memory key/value store
///
/// Backed by a hash map and a separately maintained sorted key index, guarded by
/// a single reader/writer lock: reads are shared, writes exclusive. Inserting a
/// new key shifts the index (O(n)), so this backend suits bounded key counts
/// such as tests and local tooling, not a production state tree.
///
/// Cloning yields another handle to the same data.
///
/// `MemDb` has nothing to flush or release, so it does not implement
/// [`Durable`](strata_core::Durable). Asking for `sync`, `close`, `print` or
/// `stats` on it is rejected by the compiler:
///
/// ```compile_fail
/// use strata_core::Durable;
/// use strata_memdb::MemDb;
///
/// fn flush<D: Durable>(db: &D) -> strata_core::Result<()> {
///     db.sync()
/// }
///
/// flush(&MemDb::new()).unwrap();
/// ```
///
/// The same call shape compiles against the store operations it does have:
///
/// ```
/// use strata_core::KvStore;
/// use strata_memdb::MemDb;
///
/// fn touch<S: KvStore>(db: &S) -> strata_core::Result<bool> {
///     db.set(b"k", b"v")?;
///     db.has(b"k")
/// }
///
/// assert!(touch(&MemDb::new()).unwrap());
/// ```
#[derive(Clone, Default)]
pub struct MemDb {
    pub(crate) state: Arc<RwLock<MemState>>,
}

impl MemDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live keys
    pub fn len(&self) -> usize {
        self.state.read().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ascending iterator over every key starting with `prefix`
    pub fn prefix_iterator(&self, prefix: &[u8]) -> Result<MemIterator> {
        check_key(prefix)?;
        let end = prefix_end(prefix);
        self.iterator(Some(prefix), end.as_deref())
    }

    /// Descending iterator over every key starting with `prefix`
    pub fn reverse_prefix_iterator(&self, prefix: &[u8]) -> Result<MemIterator> {
        check_key(prefix)?;
        let end = prefix_end(prefix);
        self.reverse_iterator(Some(prefix), end.as_deref())
    }

    fn snapshot(
        &self,
        start: Option<&[u8]>,
        end: Option<&[u8]>,
        direction: Direction,
    ) -> Result<MemIterator> {
        check_bounds(start, end)?;

        let state = self.state.read();
        let (lo, hi) = state.window(start, end);
        let mut keys = Vec::with_capacity(hi - lo);
        let mut values = Vec::with_capacity(hi - lo);
        for key in &state.ordered[lo..hi] {
            if let Some(value) = state.map.get(key) {
                keys.push(key.clone());
                values.push(value.clone());
            }
        }
        drop(state);

        Ok(MemIterator::new(
            start.map(<[u8]>::to_vec),
            end.map(<[u8]>::to_vec),
            keys,
            values,
            direction,
        ))
    }
}

impl KvStore for MemDb {
    type Iter = MemIterator;
    type Batch = MemBatch;

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        check_key(key)?;
        Ok(self.state.read().map.get(key).cloned())
    }

    fn has(&self, key: &[u8]) -> Result<bool> {
        check_key(key)?;
        Ok(self.state.read().map.contains_key(key))
    }

    fn set(&self, key: &[u8], value: &[u8]) -> Result<()> {
        check_key(key)?;
        self.state.write().insert(key, value);
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<()> {
        check_key(key)?;
        self.state.write().remove(key);
        Ok(())
    }

    fn iterator(&self, start: Option<&[u8]>, end: Option<&[u8]>) -> Result<MemIterator> {
        self.snapshot(start, end, Direction::Forward)
    }

    fn reverse_iterator(&self, start: Option<&[u8]>, end: Option<&[u8]>) -> Result<MemIterator> {
        self.snapshot(start, end, Direction::Reverse)
    }

    fn new_batch(&self) -> MemBatch {
        MemBatch::new(self.clone())
    }
}
