//! Config subcommand handlers.

use secrecy::SecretString;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for display, masking sensitive fields.
fn format_config_redacted(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "insecure = {}", cfg.defaults.insecure);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "host = \"{}\"", p.host);
        if let Some(ref u) = p.username {
            let _ = writeln!(out, "username = \"{u}\"");
        }
        if p.password.is_some() {
            let _ = writeln!(out, "password = \"****\"");
        }
        if let Some(ref env) = p.password_env {
            let _ = writeln!(out, "password_env = \"{env}\"");
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
    }

    out
}

/// Insert or replace `name`, making it the default when asked or when
/// the current default points nowhere.
fn upsert_profile(cfg: &mut Config, name: &str, profile: Profile, set_default: bool) {
    cfg.profiles.insert(name.to_owned(), profile);

    let dangling = cfg
        .default_profile
        .as_ref()
        .is_none_or(|d| !cfg.profiles.contains_key(d));
    if set_default || dangling {
        cfg.default_profile = Some(name.to_owned());
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            output::print_output(format_config_redacted(&cfg).trim_end(), global.quiet);
            Ok(())
        }

        ConfigCommand::Init {
            host,
            username,
            password_env,
            set_default,
        } => {
            upsnap_config::parse_host(&host)?;

            let mut cfg = config::load_config()?;
            let name = global.profile.clone().unwrap_or_else(|| "default".into());
            let profile = Profile {
                host,
                username: Some(username),
                password_env,
                ..Profile::default()
            };
            upsert_profile(&mut cfg, &name, profile, set_default);

            let path = config::save_config(&cfg)?;
            output::print_output(
                &format!("Profile '{name}' written to {}", path.display()),
                global.quiet,
            );
            Ok(())
        }

        ConfigCommand::SetPassword => {
            let cfg = config::load_config()?;
            let name = config::active_profile_name(global, &cfg);

            let password = rpassword::prompt_password(format!("Password for '{name}': "))?;
            if password.is_empty() {
                return Err(CliError::Validation {
                    field: "password".into(),
                    reason: "password cannot be empty".into(),
                });
            }

            upsnap_config::store_password(&name, &SecretString::from(password))?;
            output::print_output(
                &format!("Password for '{name}' stored in system keyring"),
                global.quiet,
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lab() -> Profile {
        Profile {
            host: "http://lab.lan:8090".into(),
            username: Some("admin".into()),
            password: Some("hunter2".into()),
            ..Profile::default()
        }
    }

    #[test]
    fn show_masks_password() {
        let mut cfg = Config::default();
        cfg.profiles.insert("lab".into(), lab());

        let out = format_config_redacted(&cfg);

        assert!(out.contains("[profiles.lab]"));
        assert!(out.contains("password = \"****\""));
        assert!(!out.contains("hunter2"));
    }

    #[test]
    fn first_profile_becomes_default() {
        let mut cfg = Config::default();
        upsert_profile(&mut cfg, "lab", lab(), false);
        assert_eq!(cfg.default_profile.as_deref(), Some("lab"));

        upsert_profile(&mut cfg, "home", lab(), false);
        assert_eq!(cfg.default_profile.as_deref(), Some("lab"));

        upsert_profile(&mut cfg, "home", lab(), true);
        assert_eq!(cfg.default_profile.as_deref(), Some("home"));
    }
}
