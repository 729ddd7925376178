//! Password-based encryption primitives
//!
//! PBKDF2-HMAC-SHA256 key derivation feeding AES-256-GCM. Each encryption
//! uses a fresh random nonce, prepended to the ciphertext so the blob is
//! self-contained. The salt is a fixed application-wide constant, so the
//! same password always derives the same key.

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use pbkdf2::pbkdf2_hmac;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Application-wide key derivation salt
const SALT: &[u8] = b"palaver-secret-salt";

/// PBKDF2 iteration count
const ITERATIONS: u32 = 100_000;

/// AES-GCM nonce length in bytes
const NONCE_LEN: usize = 12;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    /// Wrong password or tampered ciphertext; GCM authentication failed
    #[error("decryption failed: wrong password or corrupted data")]
    DecryptFailed,

    /// Blob is not valid base64 or is too short to hold a nonce
    #[error("malformed encrypted data")]
    Malformed,

    /// Cipher-level failure during encryption
    #[error("encryption failed")]
    EncryptFailed,
}

/// Derive a 256-bit key from a password
fn derive_key(password: &str) -> [u8; 32] {
    let mut key = [0u8; 32];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), SALT, ITERATIONS, &mut key);
    key
}

/// Encrypt plaintext with a password-derived key.
/// Returns base64(nonce || ciphertext).
pub fn encrypt(password: &str, plaintext: &str) -> Result<String, CryptoError> {
    let key = derive_key(password);
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key));
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, plaintext.as_bytes())
        .map_err(|_| CryptoError::EncryptFailed)?;

    let mut blob = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    blob.extend_from_slice(&nonce);
    blob.extend_from_slice(&ciphertext);
    Ok(BASE64.encode(blob))
}

/// Decrypt a blob produced by [`encrypt`]
pub fn decrypt(password: &str, blob: &str) -> Result<String, CryptoError> {
    let raw = BASE64.decode(blob).map_err(|_| CryptoError::Malformed)?;
    if raw.len() < NONCE_LEN {
        return Err(CryptoError::Malformed);
    }
    let (nonce, ciphertext) = raw.split_at(NONCE_LEN);

    let key = derive_key(password);
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key));
    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| CryptoError::DecryptFailed)?;

    String::from_utf8(plaintext).map_err(|_| CryptoError::Malformed)
}

/// One-way hash of the master password for verification.
/// Returns base64(SHA-256(password || salt)).
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(SALT);
    BASE64.encode(hasher.finalize())
}
