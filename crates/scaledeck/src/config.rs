//! CLI configuration: thin layer over `scaledeck_config` that applies
//! `GlobalOpts` flag overrides (--server, --api-key, --insecure, --timeout).

use secrecy::SecretString;

use scaledeck_core::ConsoleConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use scaledeck_config::{
    Config, Profile, config_path, load_config_or_default, save_config,
};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.profile_name(global.profile.as_deref()).to_owned()
}

/// Build a `ConsoleConfig` from the config file, the active profile and
/// CLI overrides. Flags win over profile values.
///
/// Without a matching profile, `--server` and `--api-key` alone suffice,
/// unless a profile was named explicitly.
pub fn resolve_console_config(
    global: &GlobalOpts,
    config: &Config,
) -> Result<ConsoleConfig, CliError> {
    let profile_name = active_profile_name(global, config);

    let (mut profile, stored) = match config.profile(&profile_name) {
        Ok(profile) => (profile.clone(), true),
        Err(_) if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(config),
            });
        }
        Err(_) => (Profile::default(), false),
    };

    if let Some(ref server) = global.server {
        profile.server.clone_from(server);
    }
    if profile.server.is_empty() {
        return Err(CliError::NoConfig {
            path: config_path().display().to_string(),
        });
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }

    let api_key = match global.api_key {
        Some(ref key) => SecretString::from(key.clone()),
        None if stored => scaledeck_config::resolve_api_key(&profile, &profile_name)?,
        None => {
            return Err(CliError::NoCredentials {
                profile: profile_name,
            });
        }
    };

    Ok(scaledeck_config::profile_to_console_config(
        &profile,
        &config.defaults,
        api_key,
    )?)
}

fn available_profiles(config: &Config) -> String {
    if config.profiles.is_empty() {
        return "(none)".into();
    }
    config.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use clap::Parser;
    use scaledeck_core::TlsVerification;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["scaledeck"];
        argv.extend_from_slice(args);
        argv.push("health");
        Cli::try_parse_from(argv).unwrap().global
    }

    fn config_with_home() -> Config {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "home".into(),
            Profile {
                server: "https://hs.home.example".into(),
                api_key: Some("plain-key".into()),
                timeout: Some(12),
                ..Profile::default()
            },
        );
        cfg.default_profile = Some("home".into());
        cfg
    }

    #[test]
    fn flags_alone_are_enough_without_profiles() {
        let g = global(&["--server", "https://hs.example.com", "--api-key", "k", "-k"]);
        let resolved = resolve_console_config(&g, &Config::default()).unwrap();
        assert_eq!(resolved.url.as_str(), "https://hs.example.com/");
        assert_eq!(resolved.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(resolved.timeout, Duration::from_secs(30));
    }

    #[test]
    fn missing_server_is_no_config() {
        let g = global(&["--api-key", "k"]);
        let err = resolve_console_config(&g, &Config::default()).unwrap_err();
        assert!(matches!(err, CliError::NoConfig { .. }));
    }

    #[test]
    fn missing_key_without_profile_is_no_credentials() {
        let g = global(&["--server", "https://hs.example.com"]);
        let err = resolve_console_config(&g, &Config::default()).unwrap_err();
        assert!(matches!(err, CliError::NoCredentials { .. }));
    }

    #[test]
    fn explicit_unknown_profile_lists_available() {
        let g = global(&["--profile", "work"]);
        let err = resolve_console_config(&g, &config_with_home()).unwrap_err();
        match err {
            CliError::ProfileNotFound { name, available } => {
                assert_eq!(name, "work");
                assert_eq!(available, "home");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn flags_override_profile_values() {
        let g = global(&["--server", "https://other.example", "--timeout", "3", "--api-key", "k"]);
        let resolved = resolve_console_config(&g, &config_with_home()).unwrap();
        assert_eq!(resolved.url.host_str(), Some("other.example"));
        assert_eq!(resolved.timeout, Duration::from_secs(3));
    }

    #[test]
    fn profile_values_apply_when_no_flags() {
        let g = global(&["--api-key", "k"]);
        let resolved = resolve_console_config(&g, &config_with_home()).unwrap();
        assert_eq!(resolved.url.host_str(), Some("hs.home.example"));
        assert_eq!(resolved.timeout, Duration::from_secs(12));
    }
}
