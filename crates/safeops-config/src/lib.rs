//! Shared configuration for the SafeOps CLI and embedders.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and translation to `safeops_core::ClientConfig`. The RPN weight
//! table lives here too: it is deployment policy, so every profile must
//! spell it out in full — there is no built-in default scale.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use safeops_core::{ClientConfig, RpnTable, TlsMode};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no API key configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{profile}' has no [rpn] table -- the severity/likelihood weights are required")]
    NoRpnTable { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

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

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// One row of RPN weights in the TOML file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RpnWeights {
    pub low: u32,
    pub medium: u32,
    pub high: u32,
    /// `critical` for the severity row, `very_high` for likelihood.
    #[serde(alias = "very_high")]
    pub critical: u32,
}

/// The full `[profiles.<name>.rpn]` section.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RpnConfig {
    pub severity: RpnWeights,
    pub likelihood: RpnWeights,
}

impl RpnConfig {
    pub fn to_table(&self) -> RpnTable {
        RpnTable::new(
            [
                self.severity.low,
                self.severity.medium,
                self.severity.high,
                self.severity.critical,
            ],
            [
                self.likelihood.low,
                self.likelihood.medium,
                self.likelihood.high,
                self.likelihood.critical,
            ],
        )
    }
}

/// A named backend profile.
#[derive(Debug, Deserialize, Serialize)]
pub struct Profile {
    /// Backend base URL (e.g. "https://acme.safeops.io").
    pub backend: String,

    /// API key (plaintext — prefer keyring or env var).
    pub api_key: Option<String>,

    /// Environment variable name containing the API key.
    pub api_key_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Accept self-signed certificates (local stacks only).
    pub insecure: Option<bool>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,

    /// Disable the realtime change feed for this profile.
    pub realtime: Option<bool>,

    /// RPN weight table. Required — resolution fails without it.
    pub rpn: Option<RpnConfig>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "safeops", "safeops").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("safeops");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit path (tests, `--config` overrides).
pub fn load_config_from(path: &std::path::Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("SAFEOPS_").split("_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve an API key from the credential chain.
///
/// Order: profile's `api_key_env` env var → `SAFEOPS_API_KEY` →
/// system keyring → plaintext in the config file.
pub fn resolve_api_key(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    if let Some(ref env_name) = profile.api_key_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    if let Ok(val) = std::env::var("SAFEOPS_API_KEY") {
        return Ok(SecretString::from(val));
    }

    if let Ok(entry) = keyring::Entry::new("safeops", &format!("{profile_name}/api-key")) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    if let Some(ref key) = profile.api_key {
        return Ok(SecretString::from(key.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store an API key in the system keyring for a profile.
pub fn store_api_key(profile_name: &str, key: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new("safeops", &format!("{profile_name}/api-key")).map_err(|e| {
        ConfigError::Validation {
            field: "keyring".into(),
            reason: e.to_string(),
        }
    })?;
    entry.set_password(key).map_err(|e| ConfigError::Validation {
        field: "keyring".into(),
        reason: e.to_string(),
    })
}

// ── Profile → ClientConfig ──────────────────────────────────────────

/// Build a `ClientConfig` from a profile.
///
/// Fails when the profile lacks credentials or a complete RPN table —
/// the weight scale is never guessed.
pub fn profile_to_client_config(
    profile: &Profile,
    profile_name: &str,
) -> Result<ClientConfig, ConfigError> {
    let url: url::Url = profile
        .backend
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "backend".into(),
            reason: format!("invalid URL: {}", profile.backend),
        })?;

    let api_key = resolve_api_key(profile, profile_name)?;

    let rpn = profile
        .rpn
        .as_ref()
        .ok_or_else(|| ConfigError::NoRpnTable {
            profile: profile_name.into(),
        })?
        .to_table();

    let tls = if profile.insecure.unwrap_or(false) {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    };

    let mut config = ClientConfig::new(url, api_key, rpn);
    config.tls = tls;
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(30));
    config.realtime_enabled = profile.realtime.unwrap_or(true);
    Ok(config)
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn profile_with_rpn() -> Profile {
        Profile {
            backend: "https://acme.safeops.io".into(),
            api_key: Some("sk-test".into()),
            api_key_env: None,
            ca_cert: None,
            insecure: None,
            timeout: Some(10),
            realtime: Some(false),
            rpn: Some(RpnConfig {
                severity: RpnWeights {
                    low: 1,
                    medium: 3,
                    high: 7,
                    critical: 10,
                },
                likelihood: RpnWeights {
                    low: 1,
                    medium: 2,
                    high: 4,
                    critical: 8,
                },
            }),
        }
    }

    #[test]
    fn profile_resolves_to_client_config() {
        let profile = profile_with_rpn();
        let config = profile_to_client_config(&profile, "test").unwrap();

        assert_eq!(config.url.as_str(), "https://acme.safeops.io/");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(!config.realtime_enabled);
    }

    #[test]
    fn profile_without_rpn_table_is_rejected() {
        let mut profile = profile_with_rpn();
        profile.rpn = None;

        let err = profile_to_client_config(&profile, "test").unwrap_err();
        assert!(matches!(err, ConfigError::NoRpnTable { .. }));
    }

    #[test]
    fn rpn_toml_accepts_very_high_alias() {
        let parsed: RpnConfig = toml::from_str(
            r#"
            [severity]
            low = 1
            medium = 3
            high = 7
            critical = 10

            [likelihood]
            low = 1
            medium = 2
            high = 4
            very_high = 8
            "#,
        )
        .unwrap();

        let table = parsed.to_table();
        assert_eq!(
            safeops_core::rpn(
                safeops_core::Severity::Critical,
                safeops_core::Likelihood::VeryHigh,
                &table
            ),
            80
        );
    }

    #[test]
    fn config_file_round_trips_through_toml() {
        let mut config = Config::default();
        config.profiles.insert("prod".into(), profile_with_rpn());

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.profiles["prod"].backend, "https://acme.safeops.io");
        assert!(parsed.profiles["prod"].rpn.is_some());
    }
}
