//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use gatelog_config::ConfigError;
use gatelog_core::{CoreError, ExportError};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to the gate-log API at {url}")]
    #[diagnostic(
        code(gatelog::connection_failed),
        help(
            "Error loading data. Is the API running?\n\
             Check the base URL with: gatelog config show\n\
             Override it with: gatelog --api-base http://host:8000/api ..."
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request timed out")]
    #[diagnostic(
        code(gatelog::timeout),
        help("Increase the timeout with --timeout or check API responsiveness.")
    )]
    Timeout,

    // ── API responses ────────────────────────────────────────────────
    #[error("No entries found for vehicle '{vehicle_no}'")]
    #[diagnostic(
        code(gatelog::not_found),
        help("Run: gatelog vehicles --search {vehicle_no}")
    )]
    NotFound { vehicle_no: String },

    #[error("Unexpected response from API ({endpoint})")]
    #[diagnostic(
        code(gatelog::unexpected_response),
        help("The API answered without status \"success\" (got {status}).")
    )]
    UnexpectedResponse { endpoint: String, status: String },

    #[error("Unexpected response from API: {message}")]
    #[diagnostic(
        code(gatelog::invalid_payload),
        help("Rerun with -vv to log the requests being made.")
    )]
    InvalidPayload { message: String },

    #[error("API error: {message}")]
    #[diagnostic(code(gatelog::api_error))]
    ApiError { status: Option<u16>, message: String },

    // ── Export ───────────────────────────────────────────────────────
    #[error("No data to export")]
    #[diagnostic(
        code(gatelog::nothing_to_export),
        help("The API returned no vehicle entries.")
    )]
    NothingToExport,

    #[error(transparent)]
    #[diagnostic(code(gatelog::export))]
    ExportFailed(ExportError),

    // ── Validation / configuration ───────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(gatelog::validation))]
    Validation { field: String, reason: String },

    #[error(transparent)]
    #[diagnostic(
        code(gatelog::config),
        help("Inspect the file with: gatelog config path")
    )]
    Config(#[from] ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize output: {0}")]
    #[diagnostic(code(gatelog::serialization))]
    Serialization(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::NotFound { .. } | Self::ApiError { status: Some(404), .. } => {
                exit_code::NOT_FOUND
            }
            Self::Validation { .. } | Self::NothingToExport => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for CliError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<ExportError> for CliError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::Empty => Self::NothingToExport,
            other @ ExportError::Io { .. } => Self::ExportFailed(other),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },
            CoreError::Timeout => CliError::Timeout,
            CoreError::VehicleNotFound { vehicle_no } => CliError::NotFound { vehicle_no },
            CoreError::NotFound { message } => CliError::ApiError {
                status: Some(404),
                message,
            },
            CoreError::UnexpectedResponse { endpoint, status } => CliError::UnexpectedResponse {
                endpoint,
                status: status.unwrap_or_else(|| "none".into()),
            },
            CoreError::InvalidPayload { message } | CoreError::UnreadableBody { message } => {
                CliError::InvalidPayload { message }
            }
            CoreError::Api { message, status } => CliError::ApiError { status, message },
            CoreError::Config { message } => CliError::Validation {
                field: "api_base".into(),
                reason: message,
            },
            CoreError::Export(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connectivity_errors_map_to_connection_exit_code() {
        let err = CliError::from(CoreError::ConnectionFailed {
            url: "http://127.0.0.1:1/api".into(),
            reason: "refused".into(),
        });
        assert_eq!(err.exit_code(), exit_code::CONNECTION);
        assert_eq!(CliError::from(CoreError::Timeout).exit_code(), exit_code::TIMEOUT);
    }

    #[test]
    fn missing_vehicle_maps_to_not_found() {
        let err = CliError::from(CoreError::VehicleNotFound {
            vehicle_no: "KA01".into(),
        });
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
        assert_eq!(err.to_string(), "No entries found for vehicle 'KA01'");
    }

    #[test]
    fn empty_export_is_reported_plainly() {
        let err = CliError::from(CoreError::Export(ExportError::Empty));
        assert!(matches!(err, CliError::NothingToExport));
        assert_eq!(err.to_string(), "No data to export");
        assert_eq!(err.exit_code(), exit_code::USAGE);
    }

    #[test]
    fn missing_success_marker_names_endpoint() {
        let err = CliError::from(CoreError::UnexpectedResponse {
            endpoint: "vehicles".into(),
            status: None,
        });
        assert_eq!(err.to_string(), "Unexpected response from API (vehicles)");
        assert_eq!(err.exit_code(), exit_code::GENERAL);
    }
}
