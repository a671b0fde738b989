//! Shared configuration for the gatelog CLI and TUI.
//!
//! `config.toml` + `GATELOG_*` environment variables, resolved into a
//! `gatelog_core::DashboardConfig`, plus the small persisted UI state
//! (`state.toml`) that remembers the chosen theme.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use gatelog_core::config::DEFAULT_API_BASE;
use gatelog_core::{DashboardConfig, ThemeMode, TlsVerification};

/// Prefix for environment overrides, e.g. `GATELOG_API_BASE`.
pub const ENV_PREFIX: &str = "GATELOG_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config ─────────────────────────────────────────────────────

/// Top-level `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// API prefix, e.g. `http://127.0.0.1:8000/api`.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Auto-refresh period in seconds; 0 disables it.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: u64,

    /// Accept invalid TLS certificates.
    #[serde(default)]
    pub insecure: bool,

    /// Custom CA certificate (PEM).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,

    /// Directory for CSV exports; defaults to the current directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            timeout: default_timeout(),
            refresh_interval: default_refresh_interval(),
            insecure: false,
            ca_cert: None,
            export_dir: None,
        }
    }
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.into()
}
fn default_timeout() -> u64 {
    30
}
fn default_refresh_interval() -> u64 {
    30
}

impl Config {
    /// Resolve into the runtime configuration used by gatelog-core.
    pub fn to_dashboard_config(&self) -> Result<DashboardConfig, ConfigError> {
        let url: url::Url = self
            .api_base
            .parse()
            .map_err(|e| ConfigError::Validation {
                field: "api_base".into(),
                reason: format!("invalid URL '{}': {e}", self.api_base),
            })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Validation {
                field: "api_base".into(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        let tls = if self.insecure {
            TlsVerification::DangerAcceptInvalid
        } else if let Some(ref ca_path) = self.ca_cert {
            TlsVerification::CustomCa(ca_path.clone())
        } else {
            TlsVerification::SystemDefaults
        };

        let mut cfg = DashboardConfig::new(url);
        cfg.tls = tls;
        cfg.timeout = Duration::from_secs(self.timeout);
        cfg.refresh_interval = Duration::from_secs(self.refresh_interval);
        Ok(cfg)
    }

    /// Where CSV exports go.
    pub fn export_dir(&self) -> PathBuf {
        self.export_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "gatelog", "gatelog")
}

fn home_fallback(sub: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(sub);
    p.push("gatelog");
    p
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Resolve the persisted UI state path (platform data dir).
pub fn state_path() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(".local/share").join("state.toml"),
        |dirs| dirs.data_dir().join("state.toml"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load `path` merged over defaults and `GATELOG_*` env vars.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX));

    let config: Config = figment.extract()?;
    debug!(path = %path.display(), api_base = %config.api_base, "config loaded");
    Ok(config)
}

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`.
pub fn save_config_to(path: &Path, cfg: &Config) -> Result<(), ConfigError> {
    write_toml(path, cfg)
}

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(&config_path(), cfg)
}

fn write_toml<T: Serialize>(path: &Path, value: &T) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(value)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Persisted UI state ──────────────────────────────────────────────

/// Small state file written by the dashboard, not meant for hand editing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct UiState {
    #[serde(default)]
    pub theme: ThemeMode,
}

impl UiState {
    /// Read the state file; a missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(raw) => toml::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        write_toml(path, self)
    }

    /// Load from the canonical path, defaulting on any error.
    pub fn load_or_default() -> Self {
        Self::load_from(&state_path()).unwrap_or_default()
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&state_path())
    }
}
