// ── Runtime dashboard configuration ──
//
// Describes how to reach the gate-log API and how often to poll it.
// Built by the CLI/TUI from gatelog-config; core never reads files.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use gatelog_api::{GatelogClient, TlsMode, TransportConfig};

use crate::error::CoreError;

/// Default API prefix used when nothing is configured.
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000/api";

/// Default auto-refresh period.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed certs).
    DangerAcceptInvalid,
}

/// Everything needed to talk to one gate-log API.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// API prefix, e.g. `http://127.0.0.1:8000/api`.
    pub api_base: Url,
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Auto-refresh period. Zero disables periodic refresh.
    pub refresh_interval: Duration,
}

impl DashboardConfig {
    /// Config for `api_base` with default timeout and refresh period.
    pub fn new(api_base: Url) -> Self {
        Self {
            api_base,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
        }
    }

    /// Parse `raw` as the API base.
    pub fn from_api_base(raw: &str) -> Result<Self, CoreError> {
        let url = Url::parse(raw).map_err(|e| CoreError::Config {
            message: format!("invalid api_base '{raw}': {e}"),
        })?;
        Ok(Self::new(url))
    }

    pub fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
        }
    }

    /// Build an API client for this configuration.
    pub fn build_client(&self) -> Result<GatelogClient, CoreError> {
        Ok(GatelogClient::new(self.api_base.as_str(), &self.transport())?)
    }
}
