//! Configuration file support for Sous.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/sous/config.toml`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub timer: TimerConfig,

    #[serde(default)]
    pub sessions: SessionsConfig,

    #[serde(default)]
    pub journal: JournalConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Countdown defaults
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Used when a timer is armed on a step with no duration in its text
    #[serde(default = "default_timer_seconds")]
    pub default_seconds: u64,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            default_seconds: default_timer_seconds(),
        }
    }
}

/// Session housekeeping
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionsConfig {
    #[serde(default = "default_idle_timeout_minutes")]
    pub idle_timeout_minutes: u64,
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            idle_timeout_minutes: default_idle_timeout_minutes(),
        }
    }
}

/// Cooking journal
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JournalConfig {
    #[serde(default = "default_journal_enabled")]
    pub enabled: bool,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            enabled: default_journal_enabled(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(std::env::temp_dir);
    base.join("sous")
}

fn default_timer_seconds() -> u64 {
    30
}

fn default_idle_timeout_minutes() -> u64 {
    30
}

fn default_journal_enabled() -> bool {
    true
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.timer.default_seconds == 0 {
            return Err(Error::Config("timer.default_seconds must be positive".into()));
        }
        if self.timer.default_seconds > crate::countdown::MAX_DURATION_SECONDS as u64 {
            return Err(Error::Config(format!(
                "timer.default_seconds must not exceed {}",
                crate::countdown::MAX_DURATION_SECONDS
            )));
        }
        if self.sessions.idle_timeout_minutes == 0 {
            return Err(Error::Config(
                "sessions.idle_timeout_minutes must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(std::env::temp_dir);
        base.join("sous").join("config.toml")
    }

    /// Journal file inside the data directory
    pub fn journal_path(&self) -> PathBuf {
        self.data.data_dir.join("journal").join("cooking.jsonl")
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
