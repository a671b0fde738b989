//! Config subcommand handlers.

use std::path::PathBuf;

use dialoguer::{Confirm, Input};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, CliError>
where
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e| CliError::Validation {
        field: key.into(),
        reason: format!("'{value}': {e}"),
    })
}

/// Apply `key = value` to `cfg`, validating the result.
fn set_value(cfg: &mut Config, key: &str, value: &str) -> Result<(), CliError> {
    match key {
        "api_base" => value.clone_into(&mut cfg.api_base),
        "timeout" => cfg.timeout = parse_value(key, value)?,
        "refresh_interval" => cfg.refresh_interval = parse_value(key, value)?,
        "insecure" => cfg.insecure = parse_value(key, value)?,
        "ca_cert" => cfg.ca_cert = non_empty_path(value),
        "export_dir" => cfg.export_dir = non_empty_path(value),
        other => {
            return Err(CliError::Validation {
                field: "key".into(),
                reason: format!(
                    "unknown key '{other}' (expected api_base, timeout, refresh_interval, \
                     insecure, ca_cert or export_dir)"
                ),
            });
        }
    }
    cfg.to_dashboard_config()?;
    Ok(())
}

/// An empty value clears an optional path.
fn non_empty_path(value: &str) -> Option<PathBuf> {
    (!value.trim().is_empty()).then(|| PathBuf::from(value))
}

fn format_config(cfg: &Config) -> Result<String, CliError> {
    toml::to_string_pretty(cfg).map_err(|e| CliError::Serialization(e.to_string()))
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("gatelog configuration");
            eprintln!("   Config path: {}\n", config_path.display());

            let defaults = Config::default();
            let api_base: String = Input::new()
                .with_prompt("API base URL")
                .default(defaults.api_base.clone())
                .interact_text()
                .map_err(prompt_err)?;

            let refresh_interval: u64 = Input::new()
                .with_prompt("Dashboard refresh interval (seconds, 0 = off)")
                .default(defaults.refresh_interval)
                .interact_text()
                .map_err(prompt_err)?;

            let insecure = api_base.starts_with("https://")
                && Confirm::new()
                    .with_prompt("Accept self-signed TLS certificates?")
                    .default(false)
                    .interact()
                    .map_err(prompt_err)?;

            let cfg = Config {
                api_base,
                refresh_interval,
                insecure,
                ..defaults
            };
            cfg.to_dashboard_config()?;
            config::save_config(&cfg)?;
            eprintln!("\n   Saved to {}", config_path.display());
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::apply_overrides(config::load_config()?, global);
            output::print_output(format_config(&cfg)?.trim_end(), global.quiet);
            Ok(())
        }

        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config()?;
            set_value(&mut cfg, &key, &value)?;
            config::save_config(&cfg)?;
            output::print_note(&format!("{key} updated"), global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), false);
            Ok(())
        }
    }
}
