//! Configuration management for clausewise.
//!
//! Loads configuration from ${CLAUSEWISE_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::probe::ProbePolicy;

/// Environment variable that overrides `api_base_url`.
pub const API_URL_ENV: &str = "CLAUSEWISE_API_URL";

/// Returns the default config template with comments.
///
/// Embedded from default_config.toml at compile time.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for clausewise configuration and session data.
    //!
    //! CLAUSEWISE_HOME resolution order:
    //! 1. CLAUSEWISE_HOME environment variable (if set)
    //! 2. ~/.config/clausewise (default)

    use std::path::PathBuf;

    /// Returns the clausewise home directory.
    pub fn clausewise_home() -> PathBuf {
        if let Ok(home) = std::env::var("CLAUSEWISE_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".clausewise"),
            |h| h.join(".config").join("clausewise"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        clausewise_home().join("config.toml")
    }

    /// Returns the path to the persisted session record.
    pub fn session_path() -> PathBuf {
        clausewise_home().join("session.json")
    }
}

/// Probe policy selector as written in config.toml.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProbePolicyKind {
    /// Wait out the grace period and declare the service ready.
    #[default]
    AssumeReady,
    /// Re-probe with exponential backoff and fall back to `Error`.
    Reprobe,
}

/// Remote auth endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Path prefix for `/signup` and `/login`.
    pub path: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            path: "/api/auth".to_string(),
        }
    }
}

/// Health probe and launch configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub health_path: String,
    /// Path of the sibling application opened once the service is ready.
    pub launch_path: String,
    pub policy: ProbePolicyKind,
    /// Grace period for the `assume_ready` policy.
    pub grace_period_ms: u64,
    /// Number of re-probes for the `reprobe` policy.
    pub attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            health_path: "/api/health_check".to_string(),
            launch_path: "/contract-analysis".to_string(),
            policy: ProbePolicyKind::AssumeReady,
            grace_period_ms: 2000,
            attempts: 5,
            initial_backoff_ms: 500,
            max_backoff_ms: 8000,
        }
    }
}

/// Scripted assistant configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    pub reply_delay_ms: u64,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            reply_delay_ms: 2000,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL for the auth and health endpoints and the launch redirect.
    pub api_base_url: String,

    /// Timeout for every HTTP request, in seconds.
    pub request_timeout_secs: u64,

    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_level: String,

    pub auth: AuthConfig,

    pub probe: ProbeConfig,

    pub assistant: AssistantConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3000".to_string(),
            request_timeout_secs: 10,
            log_level: "warn".to_string(),
            auth: AuthConfig::default(),
            probe: ProbeConfig::default(),
            assistant: AssistantConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from the default path and applies env overrides.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&paths::config_path())?;
        if let Ok(url) = std::env::var(API_URL_ENV)
            && !url.trim().is_empty()
        {
            config.api_base_url = url.trim().to_string();
        }
        Ok(config)
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Writes the commented default template to `path`.
    ///
    /// # Errors
    /// Fails if a config already exists at `path` or it cannot be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        fs::write(path, default_config_template())
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Base URL of the auth endpoints (`.../signup`, `.../login` hang off it).
    pub fn auth_url(&self) -> String {
        join_url(&self.api_base_url, &self.auth.path)
    }

    pub fn health_url(&self) -> String {
        join_url(&self.api_base_url, &self.probe.health_path)
    }

    pub fn launch_url(&self) -> String {
        join_url(&self.api_base_url, &self.probe.launch_path)
    }

    pub fn reply_delay(&self) -> Duration {
        Duration::from_millis(self.assistant.reply_delay_ms)
    }

    /// Resolves the configured probe policy.
    pub fn probe_policy(&self) -> ProbePolicy {
        match self.probe.policy {
            ProbePolicyKind::AssumeReady => ProbePolicy::AssumeReady {
                grace: Duration::from_millis(self.probe.grace_period_ms),
            },
            ProbePolicyKind::Reprobe => ProbePolicy::Reprobe {
                attempts: self.probe.attempts,
                initial_backoff: Duration::from_millis(self.probe.initial_backoff_ms),
                max_backoff: Duration::from_millis(self.probe.max_backoff_ms),
            },
        }
    }
}

fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path.is_empty() {
        return base.to_string();
    }
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}
