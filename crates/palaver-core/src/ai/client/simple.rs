//! Single-shot (non-streaming) calls

use serde_json::Value;
use tracing::info;

use super::config::CallOptions;
use super::core::ApiClient;
use crate::ai::error::ApiError;
use crate::ai::parsers::parse_complete;
use crate::ai::retry::{with_retry, RetryPolicy};
use crate::ai::types::Message;
use crate::constants;

/// Outcome of probing an endpoint with a minimal request
#[derive(Debug, Clone)]
pub struct ConnectionTest {
    pub success: bool,
    pub status: Option<u16>,
    pub message: String,
}

impl ApiClient {
    /// Make a non-streaming call and return the assistant's text.
    ///
    /// Transient failures (connectivity, retryable statuses) are retried up
    /// to `options.retry_attempts` times with linear backoff before the
    /// error surfaces.
    pub async fn call_once(
        &self,
        endpoint: &str,
        api_key: &str,
        messages: &[Message],
        options: &CallOptions,
    ) -> Result<String, ApiError> {
        let (format, built) = Self::prepare(endpoint, api_key, messages, options)?;
        let timeout = options.timeout.unwrap_or(constants::http::REQUEST_TIMEOUT);
        let policy = RetryPolicy::new(options.retry_attempts);

        let response = with_retry(&policy, || {
            self.dispatch(&built, options.proxy_url.as_deref(), timeout)
        })
        .await?;

        let json: Value = response
            .json()
            .await
            .map_err(|e| ApiError::from_transport(e, timeout))?;

        info!(?format, "completion received");
        Ok(parse_complete(&json, format))
    }

    /// Probe an endpoint with a one-word prompt to verify the URL, key, and
    /// model are usable together
    pub async fn test_connection(
        &self,
        endpoint: &str,
        api_key: &str,
        model: &str,
    ) -> ConnectionTest {
        let options = CallOptions {
            model: Some(model.to_string()),
            max_tokens: Some(10.0),
            ..Default::default()
        };
        let messages = [Message::user("Hi")];

        match self.call_once(endpoint, api_key, &messages, &options).await {
            Ok(_) => ConnectionTest {
                success: true,
                status: None,
                message: "Connection successful".to_string(),
            },
            Err(ApiError::Upstream {
                status, message, ..
            }) => ConnectionTest {
                success: false,
                status: Some(status),
                message,
            },
            Err(e) => ConnectionTest {
                success: false,
                status: None,
                message: e.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn completion_body(text: &str) -> Value {
        json!({"choices": [{"message": {"role": "assistant", "content": text}}]})
    }

    #[tokio::test]
    async fn test_openai_call_sends_expected_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({
                "model": "gpt-3.5-turbo",
                "stream": false,
                "temperature": 0.7,
                "max_tokens": 1024,
                "top_p": 1.0,
                "messages": [{"role": "user", "content": "Hi"}],
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("Hello!")))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new();
        let endpoint = format!("{}/v1/chat/completions", server.uri());
        let text = client
            .call_once(
                &endpoint,
                "sk-test",
                &[Message::user("Hi")],
                &CallOptions::default(),
            )
            .await
            .unwrap();
        assert_eq!(text, "Hello!");
    }

    #[tokio::test]
    async fn test_retries_on_503_then_succeeds() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("recovered")))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new();
        let endpoint = format!("{}/v1/chat/completions", server.uri());
        let options = CallOptions {
            retry_attempts: 2,
            ..Default::default()
        };
        let text = client
            .call_once(&endpoint, "sk-test", &[Message::user("Hi")], &options)
            .await
            .unwrap();
        assert_eq!(text, "recovered");
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(json!({"error": {"message": "invalid key"}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new();
        let endpoint = format!("{}/v1/chat/completions", server.uri());
        let options = CallOptions {
            retry_attempts: 3,
            ..Default::default()
        };
        let err = client
            .call_once(&endpoint, "sk-test", &[Message::user("Hi")], &options)
            .await
            .unwrap_err();
        match err {
            ApiError::Upstream { status, message, .. } => {
                assert_eq!(status, 401);
                assert_eq!(message, "invalid key");
            }
            other => panic!("expected Upstream error, got {other}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_inputs_fail_before_network() {
        let client = ApiClient::new();
        let err = client
            .call_once("nonsense", "key", &[Message::user("Hi")], &CallOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));

        let err = client
            .call_once(
                "https://example.com/v1/chat/completions",
                "",
                &[Message::user("Hi")],
                &CallOptions::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));

        let err = client
            .call_once(
                "https://example.com/v1/chat/completions",
                "key",
                &[],
                &CallOptions::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_proxy_rewrites_fetch_target() {
        let server = MockServer::start().await;
        let target = "https://api.openai.com/v1/chat/completions";
        Mock::given(method("POST"))
            .and(path("/forward"))
            .and(query_param("url", target))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("proxied")))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new();
        let options = CallOptions {
            proxy_url: Some(format!("{}/forward", server.uri())),
            ..Default::default()
        };
        let text = client
            .call_once(target, "sk-test", &[Message::user("Hi")], &options)
            .await
            .unwrap();
        assert_eq!(text, "proxied");
    }

    #[tokio::test]
    async fn test_connection_probe_reports_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(json!({"error": {"message": "invalid key"}})),
            )
            .mount(&server)
            .await;

        let client = ApiClient::new();
        let endpoint = format!("{}/v1/chat/completions", server.uri());
        let result = client.test_connection(&endpoint, "bad-key", "gpt-3.5-turbo").await;
        assert!(!result.success);
        assert_eq!(result.status, Some(401));
        assert_eq!(result.message, "invalid key");
    }
}
