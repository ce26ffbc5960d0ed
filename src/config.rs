use crate::clock::DEFAULT_TICK_INTERVAL_MS;
use crate::errors::{EarnError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "config.yml";

/// Environment variable that overrides the earnclock home directory
pub const HOME_ENV: &str = "EARNCLOCK_HOME";

const MAX_DECIMALS: u8 = 8;

/// User preferences persisted between sessions
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub hourly_rate: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_decimals")]
    pub decimals: u8,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Ticks between session autosaves while watching (0 disables)
    #[serde(default = "default_autosave_every")]
    pub autosave_every: u32,
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_decimals() -> u8 {
    2
}

fn default_tick_interval_ms() -> u64 {
    DEFAULT_TICK_INTERVAL_MS
}

fn default_autosave_every() -> u32 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hourly_rate: 0.0,
            currency: default_currency(),
            decimals: default_decimals(),
            tick_interval_ms: default_tick_interval_ms(),
            autosave_every: default_autosave_every(),
        }
    }
}

impl Config {
    /// Load config from `config.yml` in the given directory
    pub fn load(dir: &Path) -> Result<Self> {
        let config_path = dir.join(CONFIG_FILE);

        if !config_path.exists() {
            // No config file, return defaults
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&config_path)?;
        if content.trim().is_empty() {
            return Ok(Config::default());
        }

        let config: Config = serde_yml::from_str(&content)
            .map_err(|e| EarnError::ConfigError(format!("Failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Load config, falling back to defaults if it can't be read
    pub fn load_or_default(dir: &Path) -> Self {
        match Self::load(dir) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("using default settings: {}", e);
                Config::default()
            }
        }
    }

    /// Write config to `config.yml`, creating the directory if needed
    pub fn save(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)?;
        let content = serde_yml::to_string(self)
            .map_err(|e| EarnError::ConfigError(format!("Failed to serialize config: {}", e)))?;
        fs::write(dir.join(CONFIG_FILE), content)?;
        Ok(())
    }

    /// Check values that parse fine but make no sense
    pub fn validate(&self) -> Result<()> {
        if !self.hourly_rate.is_finite() || self.hourly_rate < 0.0 {
            return Err(EarnError::ConfigError(format!(
                "hourly_rate must be a non-negative number (got {})",
                self.hourly_rate
            )));
        }

        if self.tick_interval_ms == 0 {
            return Err(EarnError::ConfigError(
                "tick_interval_ms must be greater than zero".to_string(),
            ));
        }

        if self.decimals > MAX_DECIMALS {
            return Err(EarnError::ConfigError(format!(
                "decimals must be at most {} (got {})",
                MAX_DECIMALS, self.decimals
            )));
        }

        Ok(())
    }

    /// Directory holding config and session files.
    ///
    /// `$EARNCLOCK_HOME` wins, otherwise the platform config directory.
    pub fn home_dir() -> Result<PathBuf> {
        if let Some(home) = std::env::var_os(HOME_ENV) {
            if !home.is_empty() {
                return Ok(PathBuf::from(home));
            }
        }

        dirs::config_dir()
            .map(|dir| dir.join("earnclock"))
            .ok_or_else(|| {
                EarnError::ConfigError("Could not determine config directory".to_string())
            })
    }
}
