//! Config subcommand handlers. None of these touch the server.

use std::fmt::Write as _;

use dialoguer::{Input, Select};

use scaledeck_config::{parse_server_url, store_api_key};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for display, masking plaintext keys.
fn format_config_redacted(cfg: &Config) -> String {
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "insecure = {}", cfg.defaults.insecure);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);
    if let Some(ref dir) = cfg.defaults.export_dir {
        let _ = writeln!(out, "export_dir = \"{}\"", dir.display());
    }

    for (name, p) in &cfg.profiles {
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "server = \"{}\"", p.server);
        if p.api_key.is_some() {
            let _ = writeln!(out, "api_key = \"****\"");
        }
        if let Some(ref env) = p.api_key_env {
            let _ = writeln!(out, "api_key_env = \"{env}\"");
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

    out.trim_end().to_owned()
}

/// Copy of `cfg` safe to serialize for `--output json|yaml`.
fn redacted(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for profile in cfg.profiles.values_mut() {
        if profile.api_key.is_some() {
            profile.api_key = Some("****".into());
        }
    }
    cfg
}

fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn prompt_api_key() -> Result<String, CliError> {
    let key = rpassword::prompt_password("API key: ").map_err(prompt_err)?;
    if key.trim().is_empty() {
        return Err(CliError::Validation {
            field: "api_key".into(),
            reason: "API key cannot be empty".into(),
        });
    }
    Ok(key.trim().to_owned())
}

/// Offer the keyring, else return the key for the plaintext config field.
fn prompt_key_storage(profile_name: &str, key: &str) -> Result<Option<String>, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt("Where to store the API key?")
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        store_api_key(profile_name, key)?;
        eprintln!("   ✓ API key stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(key.to_owned()))
    }
}

fn parse_bool(field: &str, value: &str) -> Result<bool, CliError> {
    value.parse().map_err(|_| CliError::Validation {
        field: field.into(),
        reason: format!("expected true or false, got '{value}'"),
    })
}

/// Apply `config set <key> <value>` to a profile.
fn set_field(profile: &mut Profile, key: &str, value: String) -> Result<(), CliError> {
    match key {
        "server" => {
            parse_server_url(&value)?;
            profile.server = value;
        }
        "ca_cert" | "ca-cert" => profile.ca_cert = Some(value.into()),
        "insecure" => profile.insecure = Some(parse_bool("insecure", &value)?),
        "timeout" => {
            let secs = value.parse().map_err(|_| CliError::Validation {
                field: "timeout".into(),
                reason: format!("expected seconds, got '{value}'"),
            })?;
            profile.timeout = Some(secs);
        }
        "api_key_env" | "api-key-env" => profile.api_key_env = Some(value),
        other => {
            return Err(CliError::Validation {
                field: other.into(),
                reason: "unknown key; expected server, ca_cert, insecure, timeout or api_key_env"
                    .into(),
            });
        }
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("scaledeck configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let server: String = Input::new()
                .with_prompt("Headscale server URL")
                .default("https://headscale.example.com".into())
                .interact_text()
                .map_err(prompt_err)?;
            parse_server_url(&server)?;

            let key = prompt_api_key()?;
            let api_key = prompt_key_storage(&profile_name, &key)?;

            let mut cfg = config::load_config_or_default();
            cfg.profiles.insert(
                profile_name.clone(),
                Profile {
                    server,
                    api_key,
                    ..Profile::default()
                },
            );
            cfg.default_profile = Some(profile_name.clone());
            config::save_config(&cfg)?;

            eprintln!("\n✓ Configuration written to {}", config_path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Test it: scaledeck health");
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = redacted(&config::load_config_or_default());
            let out = output::render_single(global.output, &cfg, format_config_redacted, |c| {
                c.profiles.keys().cloned().collect::<Vec<_>>().join("\n")
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            let profile = cfg.profiles.entry(profile_name.clone()).or_default();
            set_field(profile, &key, value)?;
            config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("✓ Set {key} on profile '{profile_name}'");
            }
            Ok(())
        }

        ConfigCommand::SetKey => {
            let cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            let key = prompt_api_key()?;
            store_api_key(&profile_name, &key)?;
            if !global.quiet {
                eprintln!("✓ API key for '{profile_name}' stored in system keyring");
            }
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> Config {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "home".into(),
            Profile {
                server: "https://hs.example.com".into(),
                api_key: Some("secret-key".into()),
                ..Profile::default()
            },
        );
        cfg
    }

    #[test]
    fn show_masks_plaintext_keys() {
        let text = format_config_redacted(&sample());
        assert!(text.contains("[profiles.home]"));
        assert!(text.contains("api_key = \"****\""));
        assert!(!text.contains("secret-key"));

        let structured = redacted(&sample());
        assert_eq!(structured.profiles["home"].api_key.as_deref(), Some("****"));
    }

    #[test]
    fn set_updates_known_fields() {
        let mut profile = Profile::default();
        set_field(&mut profile, "server", "https://hs.example.com".into()).unwrap();
        set_field(&mut profile, "timeout", "5".into()).unwrap();
        set_field(&mut profile, "insecure", "true".into()).unwrap();
        assert_eq!(profile.server, "https://hs.example.com");
        assert_eq!(profile.timeout, Some(5));
        assert_eq!(profile.insecure, Some(true));
    }

    #[test]
    fn set_rejects_bad_input() {
        let mut profile = Profile::default();
        assert!(set_field(&mut profile, "server", "ftp://x".into()).is_err());
        assert!(set_field(&mut profile, "timeout", "soon".into()).is_err());
        assert!(matches!(
            set_field(&mut profile, "color", "red".into()),
            Err(CliError::Validation { .. })
        ));
    }
}
