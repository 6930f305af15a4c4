use crate::error::Result;
use crate::types::WriteInfo;

/// Cursor over a fixed window of key/value pairs
///
/// Iterators returned by a [`KvStore`] are point-in-time snapshots: writes made
/// to the store after construction are never observed.
pub trait StoreIterator: Send {
    /// Whether the cursor points at an entry. Once false, it stays false.
    fn valid(&self) -> bool;

    /// Advance the cursor in the iterator's direction
    fn next(&mut self);

    /// Key at the cursor, `None` when invalid
    fn key(&self) -> Option<&[u8]>;

    /// Value at the cursor, `None` when invalid
    fn value(&self) -> Option<&[u8]>;

    /// The `[start, end)` bounds the iterator was created with
    fn domain(&self) -> (Option<&[u8]>, Option<&[u8]>);
}

/// Ordered list of pending writes
///
/// Operations are applied in the order they were added. Application is ordered
/// but not atomic: readers may observe a partially applied batch.
pub trait WriteBatch: Send {
    /// Queue a set
    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<()>;

    /// Queue a delete
    fn delete(&mut self, key: &[u8]) -> Result<()>;

    /// Number of queued operations
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Apply all queued operations in order
    fn write(self) -> Result<WriteInfo>;

    /// Apply all queued operations and make them durable, where the backend
    /// has a notion of durability
    fn write_sync(self) -> Result<WriteInfo>;

    /// Discard all queued operations
    fn close(self);
}

/// Ordered key/value store
///
/// Missing keys are never an error: `get` returns `None` and `delete` is a no-op.
/// Range bounds are `[start, end)`; `None` means open-ended.
pub trait KvStore: Send + Sync {
    type Iter: StoreIterator;
    type Batch: WriteBatch;

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    fn has(&self, key: &[u8]) -> Result<bool>;

    fn set(&self, key: &[u8], value: &[u8]) -> Result<()>;

    fn delete(&self, key: &[u8]) -> Result<()>;

    /// Ascending iterator over `[start, end)`
    fn iterator(&self, start: Option<&[u8]>, end: Option<&[u8]>) -> Result<Self::Iter>;

    /// Descending iterator over `[start, end)`
    fn reverse_iterator(&self, start: Option<&[u8]>, end: Option<&[u8]>) -> Result<Self::Iter>;

    fn new_batch(&self) -> Self::Batch;
}

/// Operations only meaningful for persistent backends
///
/// In-memory backends deliberately do not implement this trait, so calling
/// `sync`, `close`, `print` or `stats` on them is a compile error rather than
/// a silent no-op.
pub trait Durable: KvStore {
    /// Flush outstanding writes to stable storage
    fn sync(&self) -> Result<()>;

    /// Release the underlying storage
    fn close(&self) -> Result<()>;

    /// Dump contents for debugging
    fn print(&self) -> Result<()>;

    /// Backend-specific statistics
    fn stats(&self) -> std::collections::BTreeMap<String, String>;
}
