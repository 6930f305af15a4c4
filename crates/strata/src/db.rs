//! Unified state database interface
//!
//! Bundles a shared [`DualCodec`] with an ordered store so modules can read and
//! write typed values at a height without handling bytes themselves.

use crate::codec::{DualCodec, Encodable};
use crate::{CodecConfig, Height, KvStore, Result, StoreIterator, WriteBatch, WriteInfo};
use std::sync::Arc;
use strata_memdb::MemDb;

/// Typed state access over a key/value store
///
/// Cloning shares both the codec and the store.
#[derive(Clone)]
pub struct StateDb<S: KvStore = MemDb> {
    codec: Arc<DualCodec>,
    store: S,
}

impl StateDb<MemDb> {
    /// In-memory state database with an unregistered codec
    pub fn open_in_memory(config: CodecConfig) -> Result<Self> {
        let codec = Arc::new(DualCodec::new(config)?);
        Ok(Self::new(codec, MemDb::new()))
    }
}

impl<S: KvStore> StateDb<S> {
    pub fn new(codec: Arc<DualCodec>, store: S) -> Self {
        Self { codec, store }
    }

    pub fn codec(&self) -> &Arc<DualCodec> {
        &self.codec
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Marshal `value` in the format of `height` and store it under `key`
    pub fn put<T: Encodable>(&self, key: &[u8], value: &T, height: Height) -> Result<()> {
        let bytes = self.codec.marshal_binary_bare(value, height)?;
        self.store.set(key, &bytes)
    }

    /// Load and unmarshal the value under `key` as written at `height`
    pub fn get<T: Encodable>(&self, key: &[u8], height: Height) -> Result<Option<T>> {
        match self.store.get(key)? {
            Some(bytes) => self.codec.decode(&bytes, height).map(Some),
            None => Ok(None),
        }
    }

    pub fn has(&self, key: &[u8]) -> Result<bool> {
        self.store.has(key)
    }

    pub fn delete(&self, key: &[u8]) -> Result<()> {
        self.store.delete(key)
    }

    /// Decode every entry in `[start, end)`, ascending
    pub fn range<T: Encodable>(
        &self,
        start: Option<&[u8]>,
        end: Option<&[u8]>,
        height: Height,
    ) -> Result<Vec<(Vec<u8>, T)>> {
        let iter = self.store.iterator(start, end)?;
        self.decode_all(iter, height)
    }

    /// Decode every entry in `[start, end)`, descending
    pub fn range_reverse<T: Encodable>(
        &self,
        start: Option<&[u8]>,
        end: Option<&[u8]>,
        height: Height,
    ) -> Result<Vec<(Vec<u8>, T)>> {
        let iter = self.store.reverse_iterator(start, end)?;
        self.decode_all(iter, height)
    }

    fn decode_all<T: Encodable>(
        &self,
        mut iter: S::Iter,
        height: Height,
    ) -> Result<Vec<(Vec<u8>, T)>> {
        let mut out = Vec::new();
        while iter.valid() {
            if let (Some(key), Some(value)) = (iter.key(), iter.value()) {
                out.push((key.to_vec(), self.codec.decode(value, height)?));
            }
            iter.next();
        }
        Ok(out)
    }

    /// Start a typed batch whose values are marshalled for `height`
    pub fn batch(&self, height: Height) -> StateBatch<'_, S::Batch> {
        StateBatch {
            codec: &self.codec,
            height,
            inner: self.store.new_batch(),
        }
    }
}

/// Typed wrapper over a store batch
///
/// Values are marshalled when queued, so an encoding error surfaces before
/// anything is written.
pub struct StateBatch<'a, B: WriteBatch> {
    codec: &'a DualCodec,
    height: Height,
    inner: B,
}

impl<B: WriteBatch> StateBatch<'_, B> {
    pub fn put<T: Encodable>(&mut self, key: &[u8], value: &T) -> Result<&mut Self> {
        let bytes = self.codec.marshal_binary_bare(value, self.height)?;
        self.inner.set(key, &bytes)?;
        Ok(self)
    }

    pub fn delete(&mut self, key: &[u8]) -> Result<&mut Self> {
        self.inner.delete(key)?;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn write(self) -> Result<WriteInfo> {
        self.inner.write()
    }

    /// Apply and make durable where the backend supports it
    pub fn write_sync(self) -> Result<WriteInfo> {
        self.inner.write_sync()
    }

    pub fn close(self) {
        self.inner.close()
    }
}
