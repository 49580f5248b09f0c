//! Layered configuration for hexdash.
//!
//! Precedence, lowest to highest: built-in defaults, `config.toml` in the
//! platform config directory, `HEXDASH_*` environment variables, then CLI
//! flag overrides. The result is validated into an immutable
//! [`DashboardConfig`] that lives for the whole run.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use hexdash_api::TransportConfig;

pub const DEFAULT_API_BASE: &str = "http://localhost:8888";
pub const DEFAULT_REFRESH_SECS: u64 = 5;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

const ENV_PREFIX: &str = "HEXDASH_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Settings ────────────────────────────────────────────────────────

/// Raw, unvalidated settings as merged from every layer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    /// Server base URL.
    pub api_base: String,

    /// Seconds between polls in interactive mode.
    pub refresh: u64,

    /// Per-request timeout in seconds.
    pub timeout: u64,

    /// Accept self-signed certificates.
    pub insecure: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.into(),
            refresh: DEFAULT_REFRESH_SECS,
            timeout: DEFAULT_TIMEOUT_SECS,
            insecure: false,
        }
    }
}

/// Values supplied on the command line. `None` leaves the lower layers alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insecure: Option<bool>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "hexstrike", "hexdash").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("hexdash");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Loading ─────────────────────────────────────────────────────────

/// Build the layered figment. A missing file contributes nothing.
pub fn figment(path: &Path, overrides: &Overrides) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Settings::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).only(&["api_base", "refresh", "timeout", "insecure"]))
        .merge(Serialized::defaults(overrides))
}

/// Load settings from `path` (or the platform default) plus env and flags.
///
/// The platform default may be absent; an explicitly named file may not.
pub fn load_settings(path: Option<&Path>, overrides: &Overrides) -> Result<Settings, ConfigError> {
    let path = match path {
        Some(explicit) if !explicit.is_file() => {
            return Err(ConfigError::Validation {
                field: "config".into(),
                reason: format!("no such file: {}", explicit.display()),
            });
        }
        Some(explicit) => explicit.to_path_buf(),
        None => config_path(),
    };
    let settings: Settings = figment(&path, overrides).extract()?;
    Ok(settings)
}

// ── Resolved config ─────────────────────────────────────────────────

/// Validated runtime configuration, fixed at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub api_base: Url,
    pub refresh_interval: Duration,
    pub timeout: Duration,
    pub insecure: bool,
}

impl DashboardConfig {
    /// Transport settings for the API client.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            timeout: self.timeout,
            accept_invalid_certs: self.insecure,
        }
    }

    /// The base URL as the user typed it, without a trailing slash.
    pub fn api_base_display(&self) -> &str {
        self.api_base.as_str().trim_end_matches('/')
    }
}

impl Settings {
    /// Validate into a [`DashboardConfig`].
    pub fn resolve(&self) -> Result<DashboardConfig, ConfigError> {
        let api_base: Url = self.api_base.parse().map_err(|_| ConfigError::Validation {
            field: "api_base".into(),
            reason: format!("invalid URL: {}", self.api_base),
        })?;

        if !matches!(api_base.scheme(), "http" | "https") {
            return Err(ConfigError::Validation {
                field: "api_base".into(),
                reason: format!("expected an http:// or https:// URL, got {}", self.api_base),
            });
        }

        if self.refresh == 0 {
            return Err(ConfigError::Validation {
                field: "refresh".into(),
                reason: "refresh interval must be at least 1 second".into(),
            });
        }

        if self.timeout == 0 {
            return Err(ConfigError::Validation {
                field: "timeout".into(),
                reason: "timeout must be at least 1 second".into(),
            });
        }

        Ok(DashboardConfig {
            api_base,
            refresh_interval: Duration::from_secs(self.refresh),
            timeout: Duration::from_secs(self.timeout),
            insecure: self.insecure,
        })
    }
}
