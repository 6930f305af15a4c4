pub mod store;

pub use store::{Durable, KvStore, StoreIterator, WriteBatch};
