//! Configuration loading and management.
//!
//! Configuration is loaded with the following precedence:
//! 1. Environment variables (`DETOX_*`)
//! 2. Config file (`~/.detox/config.toml`)
//! 3. Defaults

use crate::error::{Error, Result};
use crate::i18n::Locale;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Default period of the elapsed-time tick.
const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;

/// Main configuration struct.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,

    /// Session lifecycle configuration.
    pub session: SessionConfig,

    /// Display configuration.
    pub display: DisplayConfig,
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the session record.
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_detox_home(),
        }
    }
}

/// Session lifecycle configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Period of the elapsed-time refresh, in milliseconds.
    pub tick_interval_ms: u64,

    /// What `start` does while a session is already open.
    pub open_session: OpenSessionPolicy,
}

impl SessionConfig {
    /// Tick period, never zero.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        let ms = if self.tick_interval_ms == 0 {
            DEFAULT_TICK_INTERVAL_MS
        } else {
            self.tick_interval_ms
        };
        Duration::from_millis(ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            open_session: OpenSessionPolicy::default(),
        }
    }
}

/// Behavior of `start` while another session is open.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OpenSessionPolicy {
    /// Refuse to start; the open session is kept (default).
    #[default]
    Reject,

    /// Discard the open session without archiving it.
    Replace,
}

/// Display configuration.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct DisplayConfig {
    /// Output language; detected from the environment when unset.
    pub locale: Option<Locale>,
}

impl DisplayConfig {
    /// Configured locale, or the one the environment asks for.
    #[must_use]
    pub fn resolved_locale(&self) -> Locale {
        self.locale.unwrap_or_else(Locale::from_env)
    }
}

/// Get the default detox home directory.
fn default_detox_home() -> PathBuf {
    dirs::home_dir().map_or_else(|| PathBuf::from(".detox"), |h| h.join(".detox"))
}

/// Load configuration with precedence: env vars → file → defaults.
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed.
pub fn load_config() -> Result<Config> {
    let mut config = Config::default();

    let config_path = get_config_path();
    if config_path.exists() {
        let contents = fs::read_to_string(&config_path).map_err(Error::Storage)?;
        config = toml::from_str(&contents).map_err(|e| Error::Config(e.to_string()))?;
    }

    apply_env_overrides(&mut config);

    Ok(config)
}

/// Get the path to the config file.
fn get_config_path() -> PathBuf {
    if let Ok(path) = env::var("DETOX_CONFIG") {
        return PathBuf::from(path);
    }

    if let Ok(home) = env::var("DETOX_HOME") {
        return PathBuf::from(home).join("config.toml");
    }

    default_detox_home().join("config.toml")
}

/// Apply environment variable overrides to config.
fn apply_env_overrides(config: &mut Config) {
    if let Ok(path) = env::var("DETOX_STORAGE_PATH") {
        config.storage.path = PathBuf::from(path);
    } else if let Ok(home) = env::var("DETOX_HOME") {
        config.storage.path = PathBuf::from(home);
    }

    if let Ok(val) = env::var("DETOX_TICK_MS") {
        if let Ok(ms) = val.parse() {
            config.session.tick_interval_ms = ms;
        }
    }

    if let Ok(policy) = env::var("DETOX_OPEN_SESSION") {
        config.session.open_session = match policy.to_lowercase().as_str() {
            "replace" => OpenSessionPolicy::Replace,
            _ => OpenSessionPolicy::Reject,
        };
    }

    if let Ok(tag) = env::var("DETOX_LOCALE") {
        config.display.locale = Some(Locale::from_tag(&tag));
    }
}
