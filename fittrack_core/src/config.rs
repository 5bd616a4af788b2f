//! Configuration file support for FitTrack.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/fittrack/config.toml`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub progress: ProgressConfig,

    #[serde(default)]
    pub targets: TargetConfig,

    #[serde(default)]
    pub estimates: EstimateConfig,
}

/// Data source configuration
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

/// How much of the history the dashboard shows
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,

    #[serde(default = "default_goal_limit")]
    pub goal_limit: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            recent_limit: default_recent_limit(),
            goal_limit: default_goal_limit(),
        }
    }
}

/// Top-N cut-offs for the progress page
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProgressConfig {
    #[serde(default = "default_strength_top")]
    pub strength_top: usize,

    #[serde(default = "default_exercise_top")]
    pub exercise_top: usize,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            strength_top: default_strength_top(),
            exercise_top: default_exercise_top(),
        }
    }
}

/// Workout targets used when the user has no matching goal
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TargetConfig {
    #[serde(default = "default_weekly_target")]
    pub default_weekly_target: u32,

    #[serde(default = "default_min_monthly_target")]
    pub min_monthly_target: u32,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            default_weekly_target: default_weekly_target(),
            min_monthly_target: default_min_monthly_target(),
        }
    }
}

/// Rough estimates for values the datastore does not record
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EstimateConfig {
    #[serde(default = "default_calories_per_minute")]
    pub calories_per_minute: f64,
}

impl Default for EstimateConfig {
    fn default() -> Self {
        Self {
            calories_per_minute: default_calories_per_minute(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("fittrack")
}

fn default_recent_limit() -> usize {
    5
}

fn default_goal_limit() -> usize {
    3
}

fn default_strength_top() -> usize {
    4
}

fn default_exercise_top() -> usize {
    5
}

fn default_weekly_target() -> u32 {
    3
}

fn default_min_monthly_target() -> u32 {
    4
}

fn default_calories_per_minute() -> f64 {
    8.0
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

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("fittrack").join("config.toml")
    }

    /// Reject values that would make the summaries meaningless
    pub fn validate(&self) -> Result<()> {
        if self.dashboard.recent_limit == 0 || self.dashboard.goal_limit == 0 {
            return Err(Error::Config("dashboard limits must be at least 1".into()));
        }
        if self.progress.strength_top == 0 || self.progress.exercise_top == 0 {
            return Err(Error::Config("progress cut-offs must be at least 1".into()));
        }
        if self.targets.default_weekly_target == 0 || self.targets.min_monthly_target == 0 {
            return Err(Error::Config("workout targets must be at least 1".into()));
        }
        let rate = self.estimates.calories_per_minute;
        if !rate.is_finite() || rate <= 0.0 {
            return Err(Error::Config(format!(
                "calories_per_minute must be positive, got {}",
                rate
            )));
        }
        Ok(())
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
