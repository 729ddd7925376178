//! Anthropic Messages request format

use std::collections::HashMap;

use serde_json::{json, Value};

use super::{base_headers, set_header, BuiltRequest, FormatHandler};
use crate::ai::params::{ranges, ValidatedParams};
use crate::ai::types::{Message, Role};

/// API version header required by the Messages API
const API_VERSION: &str = "2023-06-01";

/// Anthropic format: x-api-key auth, the system prompt is a top-level field
/// and system messages are stripped from the array. Seed and penalty
/// parameters are unsupported and always omitted.
pub struct AnthropicFormat;

impl FormatHandler for AnthropicFormat {
    fn default_model(&self) -> &'static str {
        "claude-3-sonnet-20240229"
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
        set_header(&mut headers, "x-api-key", api_key.to_string());
        set_header(&mut headers, "anthropic-version", API_VERSION.to_string());

        let converted: Vec<Value> = messages
            .iter()
            .filter(|m| m.role != Role::System)
            .map(|m| {
                let role = match m.role {
                    Role::User => "user",
                    _ => "assistant",
                };
                json!({"role": role, "content": m.content})
            })
            .collect();

        let model = params.model.as_deref().unwrap_or(self.default_model());
        let mut body = json!({
            "model": model,
            "messages": converted,
            "max_tokens": params.max_tokens.unwrap_or(ranges::MAX_TOKENS_DEFAULT),
            "temperature": params.temperature.unwrap_or(ranges::TEMPERATURE_DEFAULT),
            "top_p": params.top_p.unwrap_or(ranges::TOP_P_DEFAULT),
        });

        if let Some(system) = params.system_prompt.as_deref() {
            body["system"] = system.into();
        }

        BuiltRequest {
            url: endpoint.to_string(),
            headers,
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(messages: &[Message], params: &ValidatedParams) -> BuiltRequest {
        AnthropicFormat.build_request(
            "https://api.anthropic.com/v1/messages",
            "sk-ant-test",
            messages,
            params,
            &HashMap::new(),
        )
    }

    #[test]
    fn test_auth_and_version_headers() {
        let request = build(&[Message::user("Hi")], &ValidatedParams::default());
        assert!(request
            .headers
            .iter()
            .any(|(n, v)| n == "x-api-key" && v == "sk-ant-test"));
        assert!(request
            .headers
            .iter()
            .any(|(n, v)| n == "anthropic-version" && v == "2023-06-01"));
        assert!(!request.headers.iter().any(|(n, _)| n == "authorization"));
    }

    #[test]
    fn test_system_messages_stripped_and_prompt_lifted() {
        let messages = [
            Message::system("ignored inline"),
            Message::user("Hi"),
            Message::assistant("Hello"),
        ];
        let params = ValidatedParams {
            system_prompt: Some("Be brief.".into()),
            ..Default::default()
        };
        let request = build(&messages, &params);
        assert_eq!(request.body["system"], "Be brief.");
        let converted = request.body["messages"].as_array().unwrap();
        assert_eq!(converted.len(), 2);
        assert_eq!(converted[0]["role"], "user");
        assert_eq!(converted[1]["role"], "assistant");
    }

    #[test]
    fn test_unsupported_params_always_omitted() {
        let params = ValidatedParams {
            seed: Some(7),
            frequency_penalty: Some(0.5),
            presence_penalty: Some(0.5),
            top_k: Some(20),
            ..Default::default()
        };
        let request = build(&[Message::user("Hi")], &params);
        assert!(request.body.get("seed").is_none());
        assert!(request.body.get("frequency_penalty").is_none());
        assert!(request.body.get("presence_penalty").is_none());
        assert!(request.body.get("top_k").is_none());
    }

    #[test]
    fn test_defaults_for_sampling_params() {
        let request = build(&[Message::user("Hi")], &ValidatedParams::default());
        assert_eq!(request.body["model"], "claude-3-sonnet-20240229");
        assert_eq!(request.body["max_tokens"], 1024);
        assert_eq!(request.body["temperature"], 0.7);
        assert_eq!(request.body["top_p"], 1.0);
        assert!(request.body.get("system").is_none());
    }
}
