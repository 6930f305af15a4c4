use strata_core::traits::StoreIterator;

/// Iteration direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Reverse,
}

/// Snapshot iterator over a key range of a [`MemDb`](crate::MemDb)
///
/// The keys and values inside `[start, end)` are copied out under the store's
/// read lock when the iterator is built, so later writes to the store are never
/// visible through it.
pub struct MemIterator {
    start: Option<Vec<u8>>,
    end: Option<Vec<u8>>,
    keys: Vec<Vec<u8>>,
    values: Vec<Vec<u8>>,
    cursor: Option<usize>,
    direction: Direction,
}

impl MemIterator {
    pub(crate) fn new(
        start: Option<Vec<u8>>,
        end: Option<Vec<u8>>,
        keys: Vec<Vec<u8>>,
        values: Vec<Vec<u8>>,
        direction: Direction,
    ) -> Self {
        let cursor = match direction {
            _ if keys.is_empty() => None,
            Direction::Forward => Some(0),
            Direction::Reverse => Some(keys.len() - 1),
        };
        Self {
            start,
            end,
            keys,
            values,
            cursor,
            direction,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Number of entries captured in the snapshot
    pub fn snapshot_len(&self) -> usize {
        self.keys.len()
    }

    /// Drain the remaining entries from the cursor onward
    pub fn collect_remaining(mut self) -> Vec<(Vec<u8>, Vec<u8>)> {
        let mut out = Vec::new();
        while let Some(idx) = self.cursor {
            out.push((
                std::mem::take(&mut self.keys[idx]),
                std::mem::take(&mut self.values[idx]),
            ));
            self.next();
        }
        out
    }
}

impl StoreIterator for MemIterator {
    fn valid(&self) -> bool {
        self.cursor.is_some()
    }

    fn next(&mut self) {
        self.cursor = match (self.cursor, self.direction) {
            (Some(idx), Direction::Forward) if idx + 1 < self.keys.len() => Some(idx + 1),
            (Some(idx), Direction::Reverse) => idx.checked_sub(1),
            _ => None,
        };
    }

    fn key(&self) -> Option<&[u8]> {
        self.cursor.map(|idx| self.keys[idx].as_slice())
    }

    fn value(&self) -> Option<&[u8]> {
        self.cursor.map(|idx| self.values[idx].as_slice())
    }

    fn domain(&self) -> (Option<&[u8]>, Option<&[u8]>) {
        (self.start.as_deref(), self.end.as_deref())
    }
}
