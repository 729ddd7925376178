//! SSE (Server-Sent Events) stream processing
//!
//! Handles the `data: <json>` framing used by all supported providers.
//! Network reads can split frames anywhere, so an incomplete trailing line
//! is carried over to the next chunk.

use serde_json::Value;
use tracing::{debug, info, warn};

use super::format::ApiFormat;
use super::parsers::parse_chunk;

/// Incremental SSE processor that turns raw bytes into text deltas
pub struct SseStreamProcessor {
    format: ApiFormat,
    /// Carry-over bytes from previous chunks: an incomplete trailing line
    /// and/or a multibyte character split at the read boundary
    partial: Vec<u8>,
    /// Event counter for logging
    event_count: usize,
    /// Bytes received counter
    bytes_received: usize,
    /// Set once the `[DONE]` terminator arrives
    done: bool,
}

impl SseStreamProcessor {
    pub fn new(format: ApiFormat) -> Self {
        Self {
            format,
            partial: Vec::new(),
            event_count: 0,
            bytes_received: 0,
            done: false,
        }
    }

    /// Whether the stream terminator has been seen
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Process a chunk of bytes, invoking `on_text` for each non-empty text
    /// delta in arrival order
    pub fn process_chunk(&mut self, bytes: &[u8], on_text: &mut dyn FnMut(String)) {
        if self.done {
            return;
        }

        self.bytes_received += bytes.len();

        // Combine with carry-over from the previous chunk, then hold back
        // any trailing incomplete multibyte sequence so a character split
        // at a read boundary is never decoded as U+FFFD.
        let mut buffered = std::mem::take(&mut self.partial);
        buffered.extend_from_slice(bytes);
        let combined = match std::str::from_utf8(&buffered) {
            Ok(s) => s.to_string(),
            Err(e) if e.error_len().is_none() => {
                let valid_up_to = e.valid_up_to();
                self.partial = buffered[valid_up_to..].to_vec();
                String::from_utf8_lossy(&buffered[..valid_up_to]).into_owned()
            }
            Err(_) => String::from_utf8_lossy(&buffered).into_owned(),
        };

        debug!(
            "SSE chunk received: {} bytes (total: {} bytes)",
            bytes.len(),
            self.bytes_received
        );

        let has_trailing_newline = combined.ends_with('\n');
        let mut lines_iter = combined.lines().peekable();

        while let Some(line) = lines_iter.next() {
            // The last line without a trailing newline is an incomplete
            // frame; it precedes any held-back multibyte tail
            if lines_iter.peek().is_none() && !has_trailing_newline {
                let mut keep = line.as_bytes().to_vec();
                keep.extend_from_slice(&self.partial);
                self.partial = keep;
                break;
            }

            // Skip blank separators and SSE comments
            if line.is_empty() || line.starts_with(':') {
                continue;
            }

            if let Some(data) = line.strip_prefix("data: ") {
                self.process_data(data, on_text);
                if self.done {
                    return;
                }
            }
        }
    }

    fn process_data(&mut self, data: &str, on_text: &mut dyn FnMut(String)) {
        self.event_count += 1;

        if data == "[DONE]" {
            info!(
                "SSE [DONE] after {} events, {} bytes",
                self.event_count, self.bytes_received
            );
            self.done = true;
            return;
        }

        match serde_json::from_str::<Value>(data) {
            Ok(json) => {
                let content = parse_chunk(&json, self.format);
                if !content.is_empty() {
                    on_text(content);
                }
            }
            Err(_) => {
                warn!(
                    "failed to parse SSE JSON (event #{}): {}",
                    self.event_count, data
                );
            }
        }
    }
}
