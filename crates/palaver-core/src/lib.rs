//! Core library for Palaver, a provider-agnostic chat client.
//!
//! Talks to OpenAI-, Anthropic-, and Google-style chat completion APIs
//! (plus unknown OpenAI-compatible endpoints) through a single interface:
//! format detection, per-format request building, lenient response parsing,
//! SSE streaming, and retry with linear backoff. API keys live in an
//! encrypted [`secrets::SecureStore`] backed by a pluggable key-value store.

pub mod ai;
pub mod constants;
pub mod secrets;
pub mod storage;

pub use ai::client::{ApiClient, CallOptions, ConnectionTest};
pub use ai::error::ApiError;
pub use ai::format::{ApiFormat, BuiltRequest};
pub use ai::format_detection::detect_api_format;
pub use ai::models::{ModelConfig, ModelStore};
pub use ai::types::{Message, Role};
pub use secrets::{CryptoError, SecureStore};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
