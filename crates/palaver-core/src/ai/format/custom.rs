//! Fallback format for unknown endpoints

use std::collections::HashMap;

use serde_json::json;

use super::{base_headers, openai_style_messages, set_header, BuiltRequest, FormatHandler};
use crate::ai::params::ValidatedParams;
use crate::ai::types::Message;

/// Custom format: assume loose OpenAI compatibility but make no guesses
/// about supported parameters. Only what the caller explicitly specified is
/// sent, with no defaults and no model substitution.
pub struct CustomFormat;

impl FormatHandler for CustomFormat {
    fn default_model(&self) -> &'static str {
        ""
    }

    fn build_request(
        &self,
        endpoint: &str,
        api_key: &str,
        messages: &[Message],
        params: &ValidatedParams,
        custom_headers: &HashMap<String, String>,
    ) -> BuiltRequest {
        let mut headers = base_headers(custom_headers);
        set_header(&mut headers, "authorization", format!("Bearer {api_key}"));

        let mut body = json!({
            "messages": openai_style_messages(messages, params.system_prompt.as_deref()),
        });

        if let Some(model) = params.model.as_deref() {
            body["model"] = model.into();
        }
        if let Some(temperature) = params.temperature {
            body["temperature"] = temperature.into();
        }
        if let Some(max_tokens) = params.max_tokens {
            body["max_tokens"] = max_tokens.into();
        }
        if let Some(top_p) = params.top_p {
            body["top_p"] = top_p.into();
        }
        if let Some(top_k) = params.top_k {
            body["top_k"] = top_k.into();
        }
        if let Some(frequency_penalty) = params.frequency_penalty {
            body["frequency_penalty"] = frequency_penalty.into();
        }
        if let Some(presence_penalty) = params.presence_penalty {
            body["presence_penalty"] = presence_penalty.into();
        }
        if let Some(seed) = params.seed {
            body["seed"] = seed.into();
        }

        BuiltRequest {
            url: endpoint.to_string(),
            headers,
            body,
        }
    }
}
