//! Client error taxonomy
//!
//! Splits failures along the lines callers care about: bad input (fail fast,
//! no network), connectivity, timeout, and upstream HTTP errors. Parsing
//! never produces an error; it degrades to a fallback string instead.

use std::time::Duration;

use thiserror::Error;

use super::retry::{is_retryable_status, IsRetryable};

#[derive(Debug, Error)]
pub enum ApiError {
    /// Rejected before any network activity
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Connection-level failure (DNS, TLS, refused, reset)
    #[error("network error: {0}")]
    Network(String),

    /// The configured deadline elapsed
    #[error("request timeout after {0}ms")]
    Timeout(u64),

    /// Non-2xx response from the endpoint
    #[error("API error ({status}): {message}")]
    Upstream {
        status: u16,
        message: String,
        retry_after: Option<Duration>,
    },
}

impl ApiError {
    /// Map a transport-level reqwest failure, attributing timeouts to the
    /// deadline that was configured for this call.
    pub fn from_transport(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            ApiError::Timeout(timeout.as_millis() as u64)
        } else {
            ApiError::Network(format!(
                "unable to reach API ({err}); check your connection and CORS settings"
            ))
        }
    }
}

impl IsRetryable for ApiError {
    fn is_retryable(&self) -> bool {
        match self {
            ApiError::Network(_) => true,
            ApiError::Upstream { status, .. } => is_retryable_status(*status),
            ApiError::InvalidInput(_) | ApiError::Timeout(_) => false,
        }
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            ApiError::Upstream { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}
