//! Key-value persistence
//!
//! The secret store and model store are generic over [`KeyValueStore`] so
//! the host application decides where data lives: in memory for tests, in a
//! JSON file on disk, or behind whatever the embedding environment offers.

mod kv;

pub use kv::{FileStore, KeyValueStore, MemoryStore};
