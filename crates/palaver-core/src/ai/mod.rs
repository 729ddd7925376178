//! Chat API adaptation and streaming
//!
//! The pipeline: detect the wire format from the endpoint URL, validate
//! generation parameters, build a format-specific request, send it (with
//! retry), and parse the response leniently back to plain text.

pub mod client;
pub mod error;
pub mod format;
pub mod format_detection;
pub mod models;
pub mod params;
pub mod parsers;
pub mod retry;
pub mod sse;
pub mod types;
