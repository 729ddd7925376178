//! Encrypted secret storage
//!
//! API keys are encrypted with a key derived from a user-chosen master
//! password and persisted through a [`KeyValueStore`](crate::storage::KeyValueStore).
//! The master password itself is never stored, only a one-way hash used for
//! verification.

mod crypto;
mod store;

pub use crypto::CryptoError;
pub use store::SecureStore;
