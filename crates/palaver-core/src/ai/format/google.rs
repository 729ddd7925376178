//! Google Generative Language request format

use std::collections::HashMap;

use serde_json::{json, Value};

use super::{base_headers, BuiltRequest, FormatHandler};
use crate::ai::params::{ranges, ValidatedParams};
use crate::ai::types::{Message, Role};

/// Google format: the key travels as a `?key=` query parameter, messages
/// become `contents` with `user`/`model` roles, sampling settings live under
/// `generationConfig`, and the system prompt becomes `systemInstruction`.
pub struct GoogleFormat;

impl FormatHandler for GoogleFormat {
    fn default_model(&self) -> &'static str {
        "gemini-pro"
    }

    fn build_request(
        &self,
        endpoint: &str,
        api_key: &str,
        messages: &[Message],
        params: &ValidatedParams,
        custom_headers: &HashMap<String, String>,
    ) -> BuiltRequest {
        let headers = base_headers(custom_headers);

        let contents: Vec<Value> = messages
            .iter()
            .filter(|m| m.role != Role::System)
            .map(|m| {
                let role = match m.role {
                    Role::User => "user",
                    _ => "model",
                };
                json!({"role": role, "parts": [{"text": m.content}]})
            })
            .collect();

        let mut body = json!({
            "contents": contents,
            "generationConfig": {
                "temperature": params.temperature.unwrap_or(ranges::TEMPERATURE_DEFAULT),
                "maxOutputTokens": params.max_tokens.unwrap_or(ranges::MAX_TOKENS_DEFAULT),
                "topP": params.top_p.unwrap_or(ranges::TOP_P_DEFAULT),
                "topK": params.top_k.unwrap_or(ranges::TOP_K_DEFAULT),
                "candidateCount": 1,
            },
        });

        if let Some(system) = params.system_prompt.as_deref() {
            body["systemInstruction"] = json!({"parts": [{"text": system}]});
        }

        BuiltRequest {
            url: format!("{endpoint}?key={api_key}"),
            headers,
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENDPOINT: &str =
        "https://generativelanguage.googleapis.com/v1/models/gemini-pro:generateContent";

    fn build(messages: &[Message], params: &ValidatedParams) -> BuiltRequest {
        GoogleFormat.build_request(ENDPOINT, "g-key", messages, params, &HashMap::new())
    }

    #[test]
    fn test_key_in_query_not_headers() {
        let request = build(&[Message::user("Hi")], &ValidatedParams::default());
        assert_eq!(request.url, format!("{ENDPOINT}?key=g-key"));
        assert!(!request
            .headers
            .iter()
            .any(|(n, _)| n == "authorization" || n == "x-api-key"));
    }

    #[test]
    fn test_assistant_role_maps_to_model() {
        let messages = [Message::user("Hi"), Message::assistant("Hello")];
        let request = build(&messages, &ValidatedParams::default());
        let contents = request.body["contents"].as_array().unwrap();
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[0]["parts"][0]["text"], "Hi");
        assert_eq!(contents[1]["role"], "model");
    }

    #[test]
    fn test_generation_config_defaults() {
        let request = build(&[Message::user("Hi")], &ValidatedParams::default());
        let config = &request.body["generationConfig"];
        assert_eq!(config["temperature"], 0.7);
        assert_eq!(config["maxOutputTokens"], 1024);
        assert_eq!(config["topP"], 1.0);
        assert_eq!(config["topK"], 40);
        assert_eq!(config["candidateCount"], 1);
    }

    #[test]
    fn test_system_instruction_from_prompt() {
        let messages = [Message::system("inline"), Message::user("Hi")];
        let params = ValidatedParams {
            system_prompt: Some("Be helpful.".into()),
            ..Default::default()
        };
        let request = build(&messages, &params);
        assert_eq!(request.body["systemInstruction"]["parts"][0]["text"], "Be helpful.");
        // Inline system messages never reach contents
        assert_eq!(request.body["contents"].as_array().unwrap().len(), 1);
    }
}
