//! CLI configuration: thin wrapper around `gatelog_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--api-base, --insecure, --timeout).

use gatelog_core::{DashboardConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use gatelog_config::{Config, config_path, load_config, save_config};

/// Apply flag overrides on top of the loaded file/env config.
///
/// Flags take priority over `config.toml`; clap already folded the
/// matching `GATELOG_*` variables into the flags.
pub fn apply_overrides(mut cfg: Config, global: &GlobalOpts) -> Config {
    if let Some(ref base) = global.api_base {
        cfg.api_base.clone_from(base);
    }
    if global.insecure {
        cfg.insecure = true;
    }
    if let Some(secs) = global.timeout {
        cfg.timeout = secs;
    }
    cfg
}

/// Resolve the effective `DashboardConfig` for API-backed commands.
pub fn resolve(global: &GlobalOpts) -> Result<(Config, DashboardConfig), CliError> {
    let cfg = apply_overrides(load_config()?, global);
    let dashboard = cfg.to_dashboard_config()?;
    if dashboard.tls == TlsVerification::DangerAcceptInvalid {
        tracing::warn!("TLS certificate verification disabled");
    }
    tracing::debug!(
        api_base = %dashboard.api_base,
        timeout = ?dashboard.timeout,
        "resolved configuration"
    );
    Ok((cfg, dashboard))
}
