use thiserror::Error;

/// Top-level error type for the `gatelog-api` crate.
///
/// Covers every failure mode of the gate-log REST surface: transport,
/// HTTP status, body decoding, and the `status` success marker.
/// `gatelog-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── HTTP ────────────────────────────────────────────────────────
    /// Non-success HTTP status from the API.
    #[error("API error (HTTP {status}): {message}")]
    Http { status: u16, message: String },

    /// The requested resource does not exist (HTTP 404).
    #[error("Not found: {message}")]
    NotFound { message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// The body is not JSON at all (proxy error page, truncated reply).
    #[error("Response body is not JSON: {message}")]
    InvalidJson { message: String, body: String },

    /// The payload did not match the expected shape.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// The body parsed but did not carry `status == "success"`.
    #[error("Unexpected response from {endpoint}: status {status:?}")]
    UnexpectedResponse {
        endpoint: String,
        status: Option<String>,
    },
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            _ => false,
        }
    }
}
