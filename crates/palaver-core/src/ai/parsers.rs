//! Lenient response parsing
//!
//! Extraction is total: malformed or unexpected payloads degrade to a
//! placeholder string, never an error and never raw JSON shown to the user.

use serde_json::Value;
use tracing::warn;

use super::format::ApiFormat;

/// Placeholder when a well-formed response carries no text
pub const NO_RESPONSE: &str = "No response";

/// User-facing message when a custom endpoint's response defies every known
/// shape
pub const UNPARSEABLE_RESPONSE: &str =
    "Sorry, the API response could not be parsed. Check that the API is configured correctly.";

/// Extract the assistant text from a complete (non-streaming) response
pub fn parse_complete(data: &Value, format: ApiFormat) -> String {
    match format {
        ApiFormat::OpenAi => first_choice_content(data)
            .map(String::from)
            .unwrap_or_else(|| NO_RESPONSE.to_string()),
        ApiFormat::Anthropic => data
            .get("content")
            .and_then(|c| c.get(0))
            .and_then(|block| block.get("text"))
            .and_then(|t| t.as_str())
            .filter(|s| !s.is_empty())
            .map(String::from)
            .unwrap_or_else(|| NO_RESPONSE.to_string()),
        ApiFormat::Google => first_candidate_text(data)
            .map(String::from)
            .unwrap_or_else(|| NO_RESPONSE.to_string()),
        ApiFormat::Custom => parse_custom(data),
    }
}

/// Extract the text delta from a streaming chunk; empty means nothing to emit
pub fn parse_chunk(chunk: &Value, format: ApiFormat) -> String {
    match format {
        ApiFormat::OpenAi => first_choice_delta(chunk).unwrap_or_default().to_string(),
        ApiFormat::Anthropic => {
            if chunk.get("type").and_then(|t| t.as_str()) == Some("content_block_delta") {
                chunk
                    .get("delta")
                    .and_then(|d| d.get("text"))
                    .and_then(|t| t.as_str())
                    .unwrap_or_default()
                    .to_string()
            } else {
                String::new()
            }
        }
        ApiFormat::Google => first_candidate_text(chunk).unwrap_or_default().to_string(),
        ApiFormat::Custom => first_choice_delta(chunk)
            .or_else(|| {
                chunk
                    .get("delta")
                    .and_then(|d| d.get("text"))
                    .and_then(|t| t.as_str())
            })
            .or_else(|| chunk.get("text").and_then(|t| t.as_str()))
            .unwrap_or_default()
            .to_string(),
    }
}

fn first_choice_content(data: &Value) -> Option<&str> {
    data.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|choice| choice.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|t| t.as_str())
        .filter(|s| !s.is_empty())
}

fn first_choice_delta(data: &Value) -> Option<&str> {
    data.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|choice| choice.get("delta"))
        .and_then(|d| d.get("content"))
        .and_then(|t| t.as_str())
}

fn first_candidate_text(data: &Value) -> Option<&str> {
    data.get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|candidate| candidate.get("content"))
        .and_then(|content| content.get("parts"))
        .and_then(|parts| parts.get(0))
        .and_then(|part| part.get("text"))
        .and_then(|t| t.as_str())
        .filter(|s| !s.is_empty())
}

/// Coerce a scalar field to text. Falsy scalars (`false`, `0`, `""`) fall
/// through to the next candidate field; objects, arrays, and null are
/// skipped so structured values never leak to the user as serialized JSON.
fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

/// Best-effort extraction for unknown response shapes, tried in priority
/// order
fn parse_custom(data: &Value) -> String {
    for field in ["content", "message", "text"] {
        if let Some(text) = data.get(field).and_then(coerce_text) {
            return text;
        }
    }
    if let Some(text) = first_choice_content(data) {
        return text.to_string();
    }
    if let Some(text) = data.get("result").and_then(coerce_text) {
        return text;
    }

    // The body itself may be a bare string
    if let Some(s) = data.as_str() {
        return s.to_string();
    }

    // Probe other field names seen in the wild
    for field in ["answer", "response", "reply", "output", "completion"] {
        if let Some(text) = data
            .get(field)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
        {
            return text.to_string();
        }
    }

    // A bare array whose first element is a string
    if let Some(first) = data.get(0).and_then(|v| v.as_str()) {
        return first.to_string();
    }

    warn!("unrecognized response shape from custom endpoint");
    UNPARSEABLE_RESPONSE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_openai_complete() {
        let data = json!({"choices": [{"message": {"content": "Hello!"}}]});
        assert_eq!(parse_complete(&data, ApiFormat::OpenAi), "Hello!");
    }

    #[test]
    fn test_anthropic_complete() {
        let data = json!({"content": [{"type": "text", "text": "Hello!"}]});
        assert_eq!(parse_complete(&data, ApiFormat::Anthropic), "Hello!");
    }

    #[test]
    fn test_google_complete() {
        let data = json!({"candidates": [{"content": {"parts": [{"text": "Hello!"}]}}]});
        assert_eq!(parse_complete(&data, ApiFormat::Google), "Hello!");
    }

    #[test]
    fn test_missing_paths_yield_placeholder() {
        for format in [ApiFormat::OpenAi, ApiFormat::Anthropic, ApiFormat::Google] {
            assert_eq!(parse_complete(&json!({}), format), NO_RESPONSE);
            assert_eq!(parse_complete(&json!({"choices": []}), format), NO_RESPONSE);
        }
    }

    #[test]
    fn test_parse_is_total_over_malformed_input() {
        let inputs = [
            json!(null),
            json!(true),
            json!(42),
            json!([{"weird": "shape"}]),
            json!({"choices": "not an array"}),
            json!({"content": {"nested": "object"}}),
        ];
        for input in &inputs {
            for format in [
                ApiFormat::OpenAi,
                ApiFormat::Anthropic,
                ApiFormat::Google,
                ApiFormat::Custom,
            ] {
                // Must produce some string, never panic
                assert!(!parse_complete(input, format).is_empty());
                let _ = parse_chunk(input, format);
            }
        }
    }

    #[test]
    fn test_custom_priority_order() {
        let data = json!({"content": "first", "message": "second", "text": "third"});
        assert_eq!(parse_complete(&data, ApiFormat::Custom), "first");

        let data = json!({"message": "second", "text": "third"});
        assert_eq!(parse_complete(&data, ApiFormat::Custom), "second");

        let data = json!({"result": "fifth", "text": "third"});
        assert_eq!(parse_complete(&data, ApiFormat::Custom), "third");
    }

    #[test]
    fn test_custom_scalar_coercion() {
        assert_eq!(parse_complete(&json!({"content": 42}), ApiFormat::Custom), "42");
        assert_eq!(
            parse_complete(&json!({"message": true}), ApiFormat::Custom),
            "true"
        );
        // Structured values are skipped, not serialized
        let data = json!({"content": {"a": 1}, "text": "fallthrough"});
        assert_eq!(parse_complete(&data, ApiFormat::Custom), "fallthrough");
    }

    #[test]
    fn test_custom_falsy_scalars_fall_through() {
        let data = json!({"content": false, "message": "hi"});
        assert_eq!(parse_complete(&data, ApiFormat::Custom), "hi");

        let data = json!({"content": 0, "message": "hi"});
        assert_eq!(parse_complete(&data, ApiFormat::Custom), "hi");

        let data = json!({"content": "", "message": "hi"});
        assert_eq!(parse_complete(&data, ApiFormat::Custom), "hi");
    }

    #[test]
    fn test_custom_string_body_and_probed_fields() {
        assert_eq!(
            parse_complete(&json!("plain text"), ApiFormat::Custom),
            "plain text"
        );
        assert_eq!(
            parse_complete(&json!({"answer": "probed"}), ApiFormat::Custom),
            "probed"
        );
        assert_eq!(
            parse_complete(&json!(["array first"]), ApiFormat::Custom),
            "array first"
        );
    }

    #[test]
    fn test_custom_fallback_message() {
        let data = json!({"metadata": {"tokens": 10}});
        assert_eq!(parse_complete(&data, ApiFormat::Custom), UNPARSEABLE_RESPONSE);
    }

    #[test]
    fn test_openai_chunk_delta() {
        let chunk = json!({"choices": [{"delta": {"content": "Hel"}}]});
        assert_eq!(parse_chunk(&chunk, ApiFormat::OpenAi), "Hel");
    }

    #[test]
    fn test_anthropic_chunk_requires_delta_type() {
        let chunk = json!({"type": "content_block_delta", "delta": {"text": "Hel"}});
        assert_eq!(parse_chunk(&chunk, ApiFormat::Anthropic), "Hel");

        let chunk = json!({"type": "message_start", "delta": {"text": "Hel"}});
        assert_eq!(parse_chunk(&chunk, ApiFormat::Anthropic), "");
    }

    #[test]
    fn test_google_chunk() {
        let chunk = json!({"candidates": [{"content": {"parts": [{"text": "Hel"}]}}]});
        assert_eq!(parse_chunk(&chunk, ApiFormat::Google), "Hel");
    }

    #[test]
    fn test_custom_chunk_patterns() {
        let openai_like = json!({"choices": [{"delta": {"content": "a"}}]});
        assert_eq!(parse_chunk(&openai_like, ApiFormat::Custom), "a");

        let anthropic_like = json!({"delta": {"text": "b"}});
        assert_eq!(parse_chunk(&anthropic_like, ApiFormat::Custom), "b");

        let bare = json!({"text": "c"});
        assert_eq!(parse_chunk(&bare, ApiFormat::Custom), "c");

        assert_eq!(parse_chunk(&json!({}), ApiFormat::Custom), "");
    }
}
