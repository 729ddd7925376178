//! HTTP client for chat completion endpoints
//!
//! Split the same way requests flow: `core` owns the shared HTTP client,
//! validation, and dispatch; `simple` implements single-shot calls; and
//! `streaming` implements SSE streaming.

mod config;
mod core;
mod simple;
mod streaming;

pub use config::CallOptions;
pub use core::ApiClient;
pub use simple::ConnectionTest;
