//! TOML-based session configuration.
//!
//! Holds the session seed, tap and passive-income amounts, tick intervals,
//! countdown targets, and an optional override of the tier table.
//!
//! Configuration is stored at `~/.config/tapcoin/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::countdown::CountdownTarget;
use crate::error::{ConfigError, CoreError, Result};
use crate::ledger::{LevelLedger, LevelTier};

/// Seed values and per-event amounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressConfig {
    #[serde(default = "default_seed_points")]
    pub seed_points: u64,
    #[serde(default)]
    pub seed_level_index: usize,
    #[serde(default = "default_tap_amount")]
    pub tap_amount: u64,
    #[serde(default = "default_profit_per_hour")]
    pub profit_per_hour: u64,
}

/// Recurring task periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    #[serde(default = "default_accrual_interval_ms")]
    pub accrual_interval_ms: u64,
    #[serde(default = "default_countdown_interval_ms")]
    pub countdown_interval_ms: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/tapcoin/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub progress: ProgressConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default = "CountdownTarget::default_targets")]
    pub countdowns: Vec<CountdownTarget>,
    /// Tier table override; the built-in table is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiers: Option<Vec<LevelTier>>,
}

fn default_seed_points() -> u64 {
    420
}
fn default_tap_amount() -> u64 {
    420
}
fn default_profit_per_hour() -> u64 {
    42069
}
fn default_accrual_interval_ms() -> u64 {
    1000
}
fn default_countdown_interval_ms() -> u64 {
    60_000
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            seed_points: default_seed_points(),
            seed_level_index: 0,
            tap_amount: default_tap_amount(),
            profit_per_hour: default_profit_per_hour(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            accrual_interval_ms: default_accrual_interval_ms(),
            countdown_interval_ms: default_countdown_interval_ms(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            progress: ProgressConfig::default(),
            timing: TimingConfig::default(),
            countdowns: CountdownTarget::default_targets(),
            tiers: None,
        }
    }
}

/// Returns `~/.config/tapcoin[-dev]/` based on TAPCOIN_ENV.
///
/// Set TAPCOIN_ENV=dev to use the development directory.
pub fn config_dir() -> PathBuf {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("TAPCOIN_ENV").unwrap_or_else(|_| "production".to_string());

    if env == "dev" {
        base_dir.join("tapcoin-dev")
    } else {
        base_dir.join("tapcoin")
    }
}

impl Config {
    pub fn path() -> PathBuf {
        config_dir().join("config.toml")
    }

    /// Load from the default location, or return defaults if the file is absent.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path())
    }

    /// Load from `path`, or return defaults if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, parsed, or
    /// fails validation.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
                .into())
            }
        };
        let cfg: Config =
            toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Check cross-field constraints serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.timing.accrual_interval_ms == 0 {
            return Err(invalid("timing.accrual_interval_ms", "must be greater than zero"));
        }
        if self.timing.countdown_interval_ms == 0 {
            return Err(invalid("timing.countdown_interval_ms", "must be greater than zero"));
        }
        self.ledger()?;
        Ok(())
    }

    /// Tier table from the override, or the built-in table.
    pub fn ledger(&self) -> Result<LevelLedger> {
        match &self.tiers {
            Some(tiers) => Ok(LevelLedger::new(tiers.clone())?),
            None => Ok(LevelLedger::default()),
        }
    }

    pub fn accrual_interval(&self) -> Duration {
        Duration::from_millis(self.timing.accrual_interval_ms)
    }

    pub fn countdown_interval(&self) -> Duration {
        Duration::from_millis(self.timing.countdown_interval_ms)
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let mut current = &json;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        match current {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a numeric value by dot-separated key, e.g. `progress.tap_amount`.
    ///
    /// The result is validated before it replaces `self`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        let mut parts = key.split('.').peekable();
        let mut current = &mut json;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current
                    .get_mut(part)
                    .ok_or_else(|| invalid(key, "unknown config key"))?;
                continue;
            }
            let obj = current
                .as_object_mut()
                .ok_or_else(|| invalid(key, "unknown config key"))?;
            if !obj.contains_key(part) {
                return Err(invalid(key, "unknown config key"));
            }
            let parsed: u64 = value
                .parse()
                .map_err(|_| invalid(key, &format!("cannot parse '{value}' as a whole number")))?;
            obj.insert(part.to_string(), parsed.into());
            break;
        }
        let updated: Config = serde_json::from_value(json)?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }
}

fn invalid(key: &str, message: &str) -> CoreError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: message.to_string(),
    }
    .into()
}
