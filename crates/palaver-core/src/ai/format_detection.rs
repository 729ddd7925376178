//! Endpoint URL format detection
//!
//! Infers the wire format from the endpoint URL so callers only configure a
//! URL and a key. Rules are ordered: host markers win over path markers, so
//! an Anthropic-hosted `/chat/completions`-looking URL still detects as
//! Anthropic.

use super::format::ApiFormat;

/// Detect the wire format for an endpoint URL
pub fn detect_api_format(endpoint: &str) -> ApiFormat {
    if endpoint.contains("anthropic.com") {
        return ApiFormat::Anthropic;
    }
    if endpoint.contains("googleapis.com") {
        return ApiFormat::Google;
    }
    if endpoint.contains("/chat/completions") {
        return ApiFormat::OpenAi;
    }
    if endpoint.contains("/messages") {
        return ApiFormat::Anthropic;
    }
    ApiFormat::Custom
}
