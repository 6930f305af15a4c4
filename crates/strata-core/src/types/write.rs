use serde::{Deserialize, Serialize};

/// Summary of an applied write batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteInfo {
    /// Number of set operations applied
    pub keys_written: usize,

    /// Number of delete operations applied
    pub keys_deleted: usize,
}

impl WriteInfo {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Total operations applied
    pub fn total(&self) -> usize {
        self.keys_written + self.keys_deleted
    }
}
