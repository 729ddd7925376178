//! Streaming calls over SSE

use futures::StreamExt;
use tracing::info;

use super::config::CallOptions;
use super::core::ApiClient;
use crate::ai::error::ApiError;
use crate::ai::sse::SseStreamProcessor;
use crate::ai::types::Message;
use crate::constants;

impl ApiClient {
    /// Make a streaming call, invoking `on_chunk` for each text delta in
    /// arrival order. Returns once the stream ends, whether by `[DONE]`
    /// marker or connection close.
    ///
    /// The timeout covers the whole call including the body read, and
    /// defaults higher than the single-shot one since streams are
    /// long-lived.
    pub async fn call_streaming<F>(
        &self,
        endpoint: &str,
        api_key: &str,
        messages: &[Message],
        options: &CallOptions,
        mut on_chunk: F,
    ) -> Result<(), ApiError>
    where
        F: FnMut(String),
    {
        let (format, mut built) = Self::prepare(endpoint, api_key, messages, options)?;
        built.body["stream"] = true.into();

        let timeout = options.timeout.unwrap_or(constants::http::STREAM_TIMEOUT);
        let response = self
            .dispatch(&built, options.proxy_url.as_deref(), timeout)
            .await?;

        let mut processor = SseStreamProcessor::new(format);
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let bytes = chunk.map_err(|e| ApiError::from_transport(e, timeout))?;
            processor.process_chunk(&bytes, &mut on_chunk);
            if processor.is_done() {
                break;
            }
        }

        info!(?format, "stream finished");
        Ok(())
    }
}
