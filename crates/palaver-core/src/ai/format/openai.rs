//! OpenAI Chat Completions request format

use std::collections::HashMap;

use serde_json::json;

use super::{base_headers, openai_style_messages, set_header, BuiltRequest, FormatHandler};
use crate::ai::params::{ranges, ValidatedParams};
use crate::ai::types::Message;

/// OpenAI format: Bearer auth, system prompt travels inside the messages
/// array, snake_case parameter names, defaults applied for the common knobs.
pub struct OpenAiFormat;

impl FormatHandler for OpenAiFormat {
    fn default_model(&self) -> &'static str {
        "gpt-3.5-turbo"
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

        let model = params.model.as_deref().unwrap_or(self.default_model());
        let mut body = json!({
            "model": model,
            "messages": openai_style_messages(messages, params.system_prompt.as_deref()),
            "stream": false,
            "temperature": params.temperature.unwrap_or(ranges::TEMPERATURE_DEFAULT),
            "max_tokens": params.max_tokens.unwrap_or(ranges::MAX_TOKENS_DEFAULT),
            "top_p": params.top_p.unwrap_or(ranges::TOP_P_DEFAULT),
            "frequency_penalty": params.frequency_penalty.unwrap_or(ranges::PENALTY_DEFAULT),
            "presence_penalty": params.presence_penalty.unwrap_or(ranges::PENALTY_DEFAULT),
        });

        // Seed is only meaningful when explicitly requested
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
