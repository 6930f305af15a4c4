//! Ordered write batches for [`MemDb`].
//!
//! `MemBatch` collects sets and deletes without touching the store, then
//! applies them in insertion order on [`write`](WriteBatch::write).
//!
//! # Example
//!
//! ```
//! use strata_core::traits::{KvStore, WriteBatch};
//! use strata_memdb::MemDb;
//!
//! # fn main() -> strata_core::Result<()> {
//! let db = MemDb::new();
//! let mut batch = db.new_batch();
//! batch.set(b"acct/1", b"100")?;
//! batch.set(b"acct/1", b"250")?;
//! batch.delete(b"acct/2")?;
//! batch.write()?;
//!
//! assert_eq!(db.get(b"acct/1")?, Some(b"250".to_vec()));
//! # Ok(())
//! # }
//! ```

use strata_core::{observe, traits::WriteBatch, types::WriteInfo, Result};

use crate::keys::check_key;
use crate::store::MemDb;

/// A buffered operation in the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
enum BatchOp {
    Set { key: Vec<u8>, value: Vec<u8> },
    Delete { key: Vec<u8> },
}

/// Pending writes against a [`MemDb`]
///
/// Each operation takes the store's write lock on its own, so concurrent
/// readers can observe a batch half-applied. There is no rollback. Dropping
/// the batch without writing discards it.
pub struct MemBatch {
    db: MemDb,
    ops: Vec<BatchOp>,
}

impl MemBatch {
    pub(crate) fn new(db: MemDb) -> Self {
        Self {
            db,
            ops: Vec::new(),
        }
    }

    fn apply(self) -> Result<WriteInfo> {
        let mut info = WriteInfo::empty();
        for op in self.ops {
            match op {
                BatchOp::Set { key, value } => {
                    self.db.state.write().insert(&key, &value);
                    info.keys_written += 1;
                }
                BatchOp::Delete { key } => {
                    self.db.state.write().remove(&key);
                    info.keys_deleted += 1;
                }
            }
        }

        tracing::debug!(
            "Applied batch: {} sets, {} deletes",
            info.keys_written,
            info.keys_deleted
        );
        observe::record_batch_write(info.total());
        Ok(info)
    }
}

impl WriteBatch for MemBatch {
    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        check_key(key)?;
        self.ops.push(BatchOp::Set {
            key: key.to_vec(),
            value: value.to_vec(),
        });
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<()> {
        check_key(key)?;
        self.ops.push(BatchOp::Delete { key: key.to_vec() });
        Ok(())
    }

    fn len(&self) -> usize {
        self.ops.len()
    }

    fn write(self) -> Result<WriteInfo> {
        self.apply()
    }

    // No durability distinction in memory.
    fn write_sync(self) -> Result<WriteInfo> {
        self.apply()
    }

    fn close(self) {}
}
