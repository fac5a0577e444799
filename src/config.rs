use std::path::PathBuf;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub analytics: AnalyticsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// JSON file holding the journal.
    pub data_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnalyticsConfig {
    pub prediction_window_days: usize,
    pub recent_activity_days: usize,
    pub instability_lookback_days: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            prediction_window_days: 7,
            recent_activity_days: 14,
            instability_lookback_days: 30,
        }
    }
}

fn default_data_file() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mood-journal")
        .join("mood-data.json")
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        // Load .env file (silently ignore if not present)
        let _ = dotenvy::dotenv();

        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mood-journal");

        let builder = Config::builder()
            // 1. Load default values
            // Storage
            .set_default(
                "storage.data_file",
                default_data_file().to_string_lossy().into_owned(),
            )?
            // Analytics
            .set_default("analytics.prediction_window_days", 7)?
            .set_default("analytics.recent_activity_days", 14)?
            .set_default("analytics.instability_lookback_days", 30)?

            // 2. Load from local config file (optional, lowest priority)
            .add_source(File::from(PathBuf::from("config.toml")).required(false))

            // 3. Load from user config directory (optional, overrides local)
            .add_source(File::from(config_dir.join("config.toml")).required(false))

            // 4. Load from Environment variables (MOOD__STORAGE__DATA_FILE=...)
            .add_source(Environment::with_prefix("MOOD").separator("__"));

        let s = builder.build().context("Failed to read configuration")?;
        s.try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
