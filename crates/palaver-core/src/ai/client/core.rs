//! Core API client
//!
//! Owns the shared HTTP client and the request path common to single-shot
//! and streaming calls: input validation, format detection, request
//! building, proxy rewriting, and upstream error mapping.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error};
use url::Url;

use super::config::CallOptions;
use crate::ai::error::ApiError;
use crate::ai::format::{format_handler, ApiFormat, BuiltRequest};
use crate::ai::format_detection::detect_api_format;
use crate::ai::params::ValidatedParams;
use crate::ai::retry::parse_retry_after;
use crate::ai::types::Message;
use crate::constants;

/// Client for chat completion APIs in any supported wire format
pub struct ApiClient {
    http: Client,
}

impl ApiClient {
    /// Create the HTTP client with configuration suited to SSE streaming
    fn create_http_client() -> Client {
        Client::builder()
            .user_agent(constants::http::USER_AGENT)
            .connect_timeout(constants::http::CONNECT_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                error!("failed to build HTTP client: {}. Using default client.", e);
                Client::new()
            })
    }

    pub fn new() -> Self {
        Self {
            http: Self::create_http_client(),
        }
    }

    /// Validate inputs, detect the format, and build the wire request.
    /// Fails fast with [`ApiError::InvalidInput`] before any network use.
    pub(crate) fn prepare(
        endpoint: &str,
        api_key: &str,
        messages: &[Message],
        options: &CallOptions,
    ) -> Result<(ApiFormat, BuiltRequest), ApiError> {
        validate_inputs(endpoint, api_key, messages)?;

        let format = detect_api_format(endpoint);
        let params = ValidatedParams::sanitize(options);
        let handler = format_handler(format);
        let built = handler.build_request(
            endpoint,
            api_key,
            messages,
            &params,
            &options.custom_headers,
        );

        debug!(?format, url = %built.url, "request prepared");
        Ok((format, built))
    }

    /// Send a built request and surface non-2xx responses as
    /// [`ApiError::Upstream`]
    pub(crate) async fn dispatch(
        &self,
        built: &BuiltRequest,
        proxy_url: Option<&str>,
        timeout: Duration,
    ) -> Result<reqwest::Response, ApiError> {
        let url = fetch_url(&built.url, proxy_url);

        let mut request = self.http.post(&url).timeout(timeout);
        for (name, value) in &built.headers {
            request = request.header(name, value);
        }

        let response = request
            .json(&built.body)
            .send()
            .await
            .map_err(|e| ApiError::from_transport(e, timeout))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(parse_retry_after);
        let body = response.text().await.unwrap_or_default();
        let message = extract_error_message(&body, status.as_u16());
        error!("API error response: {} - {}", status, message);

        Err(ApiError::Upstream {
            status: status.as_u16(),
            message,
            retry_after,
        })
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_inputs(endpoint: &str, api_key: &str, messages: &[Message]) -> Result<(), ApiError> {
    let url = Url::parse(endpoint)
        .map_err(|_| ApiError::InvalidInput(format!("invalid endpoint URL: {endpoint}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ApiError::InvalidInput(
            "endpoint URL must use http or https".to_string(),
        ));
    }
    if api_key.trim().is_empty() {
        return Err(ApiError::InvalidInput("API key is required".to_string()));
    }
    if messages.is_empty() {
        return Err(ApiError::InvalidInput("no messages to send".to_string()));
    }
    Ok(())
}

/// The URL actually fetched: either the endpoint itself or the proxy with
/// the endpoint as an encoded query parameter
fn fetch_url(target: &str, proxy_url: Option<&str>) -> String {
    match proxy_url {
        Some(proxy) => {
            let encoded: String = url::form_urlencoded::byte_serialize(target.as_bytes()).collect();
            format!("{proxy}?url={encoded}")
        }
        None => target.to_string(),
    }
}

/// Pull a human-readable message out of an error body, falling back to the
/// raw text and finally to a generic status line
fn extract_error_message(body: &str, status: u16) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        let candidates = [
            json.pointer("/error/message"),
            json.get("message"),
            json.get("detail"),
        ];
        for candidate in candidates.into_iter().flatten() {
            if let Some(s) = candidate.as_str() {
                if !s.is_empty() {
                    return s.to_string();
                }
            }
        }
    }
    if body.is_empty() {
        format!("API error ({status})")
    } else {
        body.to_string()
    }
}
