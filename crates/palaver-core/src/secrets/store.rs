//! Secret store over a key-value backend

use anyhow::{bail, Result};

use super::crypto::{self, CryptoError};
use crate::storage::KeyValueStore;

/// Namespace prefix for everything this store writes
const SECRET_PREFIX: &str = "secure_";

/// Reserved entry holding the master password hash
const MASTER_HASH_KEY: &str = "secure_master_hash";

/// Encrypted secret storage keyed by a master password
///
/// Values are encrypted before they reach the backing store, so the backend
/// only ever sees base64 blobs. The master password is held by the caller
/// for the duration of each operation and never persisted.
pub struct SecureStore<S> {
    store: S,
}

impl<S: KeyValueStore> SecureStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    pub fn has_master_password(&self) -> bool {
        self.store.contains(MASTER_HASH_KEY)
    }

    /// Record the verification hash for a master password
    pub fn set_master_password(&mut self, password: &str) -> Result<()> {
        self.store
            .set(MASTER_HASH_KEY, &crypto::hash_password(password))
    }

    /// Check a password against the stored hash; false when none is set
    pub fn verify_master_password(&self, password: &str) -> bool {
        match self.store.get(MASTER_HASH_KEY) {
            Some(stored) => stored == crypto::hash_password(password),
            None => false,
        }
    }

    /// Encrypt and store a secret under the given name
    pub fn set_secret(&mut self, name: &str, value: &str, password: &str) -> Result<()> {
        if name == "master_hash" {
            bail!("'master_hash' is a reserved name");
        }
        let blob = crypto::encrypt(password, value)?;
        self.store.set(&storage_key(name), &blob)?;
        Ok(())
    }

    /// Decrypt a stored secret. `Ok(None)` when absent; a wrong password or
    /// tampered blob is an error, not absence.
    pub fn get_secret(&self, name: &str, password: &str) -> Result<Option<String>, CryptoError> {
        match self.store.get(&storage_key(name)) {
            Some(blob) => crypto::decrypt(password, &blob).map(Some),
            None => Ok(None),
        }
    }

    pub fn remove_secret(&mut self, name: &str) -> Result<()> {
        self.store.remove(&storage_key(name))
    }

    /// Remove every stored secret; the master password stays set
    pub fn clear_secrets(&mut self) -> Result<()> {
        let keys: Vec<String> = self
            .store
            .keys()
            .into_iter()
            .filter(|k| k.starts_with(SECRET_PREFIX) && k != MASTER_HASH_KEY)
            .collect();
        for key in keys {
            self.store.remove(&key)?;
        }
        Ok(())
    }
}

fn storage_key(name: &str) -> String {
    format!("{SECRET_PREFIX}{name}")
}
