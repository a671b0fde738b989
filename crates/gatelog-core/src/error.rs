// ── Core error types ──
//
// User-facing errors from gatelog-core. Consumers never match on HTTP
// status codes or JSON parse failures directly; the
// `From<gatelog_api::Error>` impl folds transport-layer errors into
// domain variants.

use thiserror::Error;

use crate::export::ExportError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach the gate-log API at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request to the gate-log API timed out")]
    Timeout,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("No entries found for vehicle {vehicle_no}")]
    VehicleNotFound { vehicle_no: String },

    #[error("Resource not found: {message}")]
    NotFound { message: String },

    #[error("Unexpected response from API ({endpoint}): status {status:?}")]
    UnexpectedResponse {
        endpoint: String,
        status: Option<String>,
    },

    #[error("Malformed API payload: {message}")]
    InvalidPayload { message: String },

    #[error("API returned a body that is not JSON: {message}")]
    UnreadableBody { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Local errors ─────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error(transparent)]
    Export(#[from] ExportError),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<gatelog_api::Error> for CoreError {
    fn from(err: gatelog_api::Error) -> Self {
        match err {
            gatelog_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            gatelog_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            gatelog_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            gatelog_api::Error::Http { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            gatelog_api::Error::NotFound { message } => CoreError::NotFound { message },
            gatelog_api::Error::InvalidJson { message, body: _ } => {
                CoreError::UnreadableBody { message }
            }
            gatelog_api::Error::Deserialization { message, body: _ } => {
                CoreError::InvalidPayload { message }
            }
            gatelog_api::Error::UnexpectedResponse { endpoint, status } => {
                CoreError::UnexpectedResponse { endpoint, status }
            }
        }
    }
}

// ── Load failure classification ──────────────────────────────────────

/// Why the most recent refresh failed, as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadFailure {
    /// The API could not be reached, answered with an HTTP error, or sent
    /// a body that is not JSON.
    Network,
    /// The API answered with JSON, but not with a successful payload.
    UnexpectedResponse,
}

impl LoadFailure {
    /// Placeholder row text shown in place of the vehicle table.
    pub fn message(self) -> &'static str {
        match self {
            Self::Network => "Error loading data. Is the API running?",
            Self::UnexpectedResponse => "Unexpected response from API.",
        }
    }
}

impl From<&CoreError> for LoadFailure {
    fn from(err: &CoreError) -> Self {
        match err {
            CoreError::UnexpectedResponse { .. } | CoreError::InvalidPayload { .. } => {
                Self::UnexpectedResponse
            }
            _ => Self::Network,
        }
    }
}

impl std::fmt::Display for LoadFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn http_errors_classify_as_network() {
        let err = CoreError::from(gatelog_api::Error::Http {
            status: 502,
            message: "bad gateway".into(),
        });
        assert_eq!(LoadFailure::from(&err), LoadFailure::Network);
    }

    #[test]
    fn missing_marker_classifies_as_unexpected() {
        let err = CoreError::from(gatelog_api::Error::UnexpectedResponse {
            endpoint: "stats".into(),
            status: Some("error".into()),
        });
        assert_eq!(LoadFailure::from(&err), LoadFailure::UnexpectedResponse);
        assert_eq!(
            LoadFailure::from(&err).message(),
            "Unexpected response from API."
        );
    }

    #[test]
    fn non_json_body_classifies_as_network() {
        let err = CoreError::from(gatelog_api::Error::InvalidJson {
            message: "expected value at line 1 column 1".into(),
            body: "<html>502 Bad Gateway</html>".into(),
        });
        assert!(matches!(err, CoreError::UnreadableBody { .. }));
        assert_eq!(LoadFailure::from(&err), LoadFailure::Network);
        assert_eq!(
            LoadFailure::from(&err).message(),
            "Error loading data. Is the API running?"
        );
    }

    #[test]
    fn payload_shape_mismatch_classifies_as_unexpected() {
        let err = CoreError::from(gatelog_api::Error::Deserialization {
            message: "missing field `vehicles`".into(),
            body: "{\"status\":\"success\"}".into(),
        });
        assert_eq!(LoadFailure::from(&err), LoadFailure::UnexpectedResponse);
    }

    #[test]
    fn network_placeholder_text() {
        assert_eq!(
            LoadFailure::Network.to_string(),
            "Error loading data. Is the API running?"
        );
    }
}
