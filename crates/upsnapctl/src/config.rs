//! CLI configuration: thin wrapper around `upsnap_config` shared types.
//!
//! Adds CLI-specific resolution that respects `GlobalOpts` flag
//! overrides (--host, --username, --insecure, --timeout).

use upsnap_config::Connection;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use upsnap_config::{Config, Profile, config_path, load_config, save_config};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build a `Connection` from the config file, profile, and CLI overrides.
///
/// Flags take priority over profile values. Without a matching profile,
/// `--host` plus the environment credential chain is enough.
pub fn resolve_connection(global: &GlobalOpts, cfg: &Config) -> Result<Connection, CliError> {
    let profile_name = active_profile_name(global, cfg);
    let flags_only = Profile::default();

    let base = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile,
        None if global.profile.is_some() => {
            let mut names: Vec<_> = cfg.profiles.keys().map(String::as_str).collect();
            names.sort_unstable();
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: if names.is_empty() {
                    "(none)".into()
                } else {
                    names.join(", ")
                },
            });
        }
        None if global.host.is_none() => {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
        None => &flags_only,
    };

    let profile = apply_overrides(base, global);
    let conn = upsnap_config::profile_to_connection(&profile, &profile_name, &cfg.defaults)?;

    tracing::debug!(
        profile = %profile_name,
        host = %conn.credentials.base_url,
        "resolved connection"
    );
    Ok(conn)
}

/// Layer flag values over a profile.
fn apply_overrides(profile: &Profile, global: &GlobalOpts) -> Profile {
    Profile {
        host: global.host.clone().unwrap_or_else(|| profile.host.clone()),
        username: global.username.clone().or_else(|| profile.username.clone()),
        password: profile.password.clone(),
        password_env: profile.password_env.clone(),
        ca_cert: profile.ca_cert.clone(),
        insecure: if global.insecure {
            Some(true)
        } else {
            profile.insecure
        },
        timeout: global.timeout.or(profile.timeout),
    }
}
