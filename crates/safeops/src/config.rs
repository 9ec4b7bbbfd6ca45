//! Glue between `safeops-config` profiles and CLI flags.
//!
//! Flags and env vars override profile values; the profile supplies
//! everything else, including the mandatory RPN weight table.

use secrecy::SecretString;

use safeops_config::{Config, Profile, profile_to_client_config};
use safeops_core::{ClientConfig, TlsMode};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use safeops_config::{config_path, load_config_or_default};

/// The profile the command should run against:
/// `--profile` flag → config's `default_profile` → `"default"`.
pub fn active_profile_name(global: &GlobalOpts, cfg: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build a `ClientConfig` from the config file, profile, and CLI overrides.
pub fn resolve_client_config(global: &GlobalOpts) -> Result<ClientConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let Some(profile) = cfg.profiles.get(&profile_name) else {
        // A --profile flag pointing at nothing is its own mistake;
        // otherwise the config file simply hasn't been written yet.
        if global.profile.is_some() {
            return Err(CliError::ProfileNotFound { name: profile_name });
        }
        return Err(CliError::NoConfig {
            path: config_path().display().to_string(),
        });
    };

    let mut config = profile_to_client_config(profile, &profile_name)?;
    apply_overrides(&mut config, profile, global)?;
    Ok(config)
}

fn apply_overrides(
    config: &mut ClientConfig,
    _profile: &Profile,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if let Some(ref backend) = global.backend {
        config.url = backend.parse().map_err(|_| CliError::Validation {
            field: "backend".into(),
            reason: format!("invalid URL: {backend}"),
        })?;
    }

    if let Some(ref key) = global.api_key {
        config.api_key = SecretString::from(key.clone());
    }

    if global.insecure {
        config.tls = TlsMode::DangerAcceptInvalid;
    }

    if let Some(timeout) = global.timeout {
        config.timeout = std::time::Duration::from_secs(timeout);
    }
    Ok(())
}
