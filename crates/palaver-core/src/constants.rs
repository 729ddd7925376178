//! Shared constants
//!
//! Central location for timeouts and retry defaults so they stay consistent
//! across the client and are easy to audit.

pub mod http {
    use std::time::Duration;

    /// TCP connect timeout for all requests
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Total timeout for non-streaming calls
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Total timeout for streaming calls (covers the whole body read)
    pub const STREAM_TIMEOUT: Duration = Duration::from_secs(60);

    /// User agent sent with every request
    pub const USER_AGENT: &str = "Palaver/0.1";
}

pub mod retry {
    use std::time::Duration;

    /// Base unit for linear backoff; attempt n waits (n + 1) times this
    pub const BASE_DELAY: Duration = Duration::from_secs(1);
}
