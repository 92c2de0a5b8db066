use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::core::process_monitor::SortMode;

pub const DEFAULT_INTERVAL_SECS: u64 = 2;
const MIN_INTERVAL_SECS: u64 = 1;

/// Color scheme for the terminal front end
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn toggle(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeMode::Light => write!(f, "light"),
            ThemeMode::Dark => write!(f, "dark"),
        }
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            other => Err(format!("unknown theme '{}' (expected light or dark)", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seconds between sampling ticks
    pub interval_secs: u64,
    pub sort_mode: SortMode,
    pub theme: ThemeMode,
    /// Keep only this many history points; `None` keeps the whole session
    pub history_capacity: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_INTERVAL_SECS,
            sort_mode: SortMode::ByCpu,
            theme: ThemeMode::Light,
            history_capacity: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    /// Load from `path`; a missing, empty or unreadable file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let data = fs::read(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if data.is_empty() {
            return Ok(Config::default());
        }

        // Files from an older format fall back to defaults
        Ok(serde_json::from_slice(&data).unwrap_or_else(|e| {
            log::warn!("ignoring unreadable config {:?}: {}", path, e);
            Config::default()
        }))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let data = serde_json::to_vec_pretty(self).context("Failed to serialize config")?;

        fs::write(path, data)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        Ok(())
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().with_context(|| "Could not determine config directory")?;

        Ok(config_dir.join("lpm").join("config.json"))
    }

    /// Sampling interval in whole seconds, never below one
    pub fn interval_secs(&self) -> u64 {
        self.interval_secs.max(MIN_INTERVAL_SECS)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs())
    }

    /// Update one setting from its textual form
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "interval" => {
                let secs: u64 = value
                    .parse()
                    .with_context(|| format!("Invalid interval: {}", value))?;
                if secs < MIN_INTERVAL_SECS {
                    bail!("Interval must be at least {} second", MIN_INTERVAL_SECS);
                }
                self.interval_secs = secs;
            }
            "sort" => self.sort_mode = value.parse().map_err(anyhow::Error::msg)?,
            "theme" => self.theme = value.parse().map_err(anyhow::Error::msg)?,
            "history" => {
                self.history_capacity = match value {
                    "unbounded" | "none" => None,
                    n => {
                        let capacity: usize = n
                            .parse()
                            .with_context(|| format!("Invalid history size: {}", n))?;
                        if capacity == 0 {
                            bail!("History size must be positive (or 'unbounded')");
                        }
                        Some(capacity)
                    }
                };
            }
            other => bail!(
                "Unknown setting '{}' (expected interval, sort, theme or history)",
                other
            ),
        }
        Ok(())
    }
}
