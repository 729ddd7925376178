//! Per-format request building
//!
//! Each supported wire format gets a handler that maps the canonical
//! conversation plus validated parameters onto that provider's request
//! shape. Builders are pure: no network, no defaults leaking between
//! formats, proxying handled elsewhere.

mod anthropic;
mod custom;
mod google;
mod openai;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::params::ValidatedParams;
use super::types::Message;

pub use anthropic::AnthropicFormat;
pub use custom::CustomFormat;
pub use google::GoogleFormat;
pub use openai::OpenAiFormat;

/// Wire format of an API endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ApiFormat {
    /// OpenAI Chat Completions API (/v1/chat/completions)
    #[default]
    OpenAi,
    /// Anthropic Messages API (/v1/messages)
    Anthropic,
    /// Google Generative Language API (googleapis.com)
    Google,
    /// Unknown endpoint, treated as loosely OpenAI-compatible
    Custom,
}

/// A fully prepared request, ready to send
#[derive(Debug, Clone)]
pub struct BuiltRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Value,
}

/// Trait for building requests in a provider's wire format
pub trait FormatHandler: Send + Sync {
    /// Model used when the caller does not name one
    fn default_model(&self) -> &'static str;

    /// Map messages and parameters onto this format's request shape
    fn build_request(
        &self,
        endpoint: &str,
        api_key: &str,
        messages: &[Message],
        params: &ValidatedParams,
        custom_headers: &HashMap<String, String>,
    ) -> BuiltRequest;
}

/// Get the handler for a wire format
pub fn format_handler(format: ApiFormat) -> Box<dyn FormatHandler> {
    match format {
        ApiFormat::OpenAi => Box::new(OpenAiFormat),
        ApiFormat::Anthropic => Box::new(AnthropicFormat),
        ApiFormat::Google => Box::new(GoogleFormat),
        ApiFormat::Custom => Box::new(CustomFormat),
    }
}

/// Content-type plus caller-supplied headers.
///
/// Auth headers are set afterwards via [`set_header`] so a custom header can
/// never mask authentication.
pub(crate) fn base_headers(custom_headers: &HashMap<String, String>) -> Vec<(String, String)> {
    let mut headers = vec![("content-type".to_string(), "application/json".to_string())];
    for (name, value) in custom_headers {
        set_header(&mut headers, name, value.clone());
    }
    headers
}

/// Set a header, replacing any existing entry with the same name
pub(crate) fn set_header(headers: &mut Vec<(String, String)>, name: &str, value: String) {
    headers.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
    headers.push((name.to_string(), value));
}

/// Messages as OpenAI-style `{role, content}` objects, with the system
/// prompt (if any) prepended as the first message.
pub(crate) fn openai_style_messages(messages: &[Message], system_prompt: Option<&str>) -> Value {
    let mut out = Vec::with_capacity(messages.len() + 1);
    if let Some(system) = system_prompt {
        out.push(serde_json::json!({"role": "system", "content": system}));
    }
    for m in messages {
        out.push(serde_json::json!({"role": m.role.as_str(), "content": m.content}));
    }
    Value::Array(out)
}
