//! Per-call configuration

use std::collections::HashMap;
use std::time::Duration;

/// Options for a single call
///
/// Generation parameters are accepted as raw floats and sanitized before
/// request building; an out-of-range value clamps rather than fails. Absent
/// fields fall back to per-format defaults where the format defines them.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    pub model: Option<String>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<f64>,
    pub top_p: Option<f64>,
    pub top_k: Option<f64>,
    pub frequency_penalty: Option<f64>,
    pub presence_penalty: Option<f64>,
    pub seed: Option<f64>,
    pub system_prompt: Option<String>,

    /// Extra headers; authentication headers always win over these
    pub custom_headers: HashMap<String, String>,
    /// CORS proxy; the real endpoint is passed as an encoded `url` query
    /// parameter
    pub proxy_url: Option<String>,
    /// Total deadline for the call, including the streamed body
    pub timeout: Option<Duration>,
    /// Retries after the initial attempt (so 2 means up to 3 attempts)
    pub retry_attempts: u32,
}

impl CallOptions {
    pub fn with_model(model: impl Into<String>) -> Self {
        Self {
            model: Some(model.into()),
            ..Default::default()
        }
    }
}
