//! User settings for Paycycle
//!
//! Display preferences, the default planning horizon and the optimizer policy.
//! Every field has a serde default so older config files keep loading.

use serde::{Deserialize, Serialize};

use super::paths::PaycyclePaths;
use crate::engine::OptimizerPolicy;
use crate::error::PaycycleError;

/// User settings for Paycycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Default currency symbol
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Days ahead of today that commands cover when no range is given
    #[serde(default = "default_planning_horizon")]
    pub planning_horizon_days: u32,

    #[serde(default)]
    pub optimizer: OptimizerPolicy,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_planning_horizon() -> u32 {
    90
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            planning_horizon_days: default_planning_horizon(),
            optimizer: OptimizerPolicy::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or default settings if the file doesn't exist
    pub fn load_or_create(paths: &PaycyclePaths) -> Result<Self, PaycycleError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| PaycycleError::Io(format!("Failed to read settings file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| PaycycleError::Config(format!("Failed to parse settings file: {}", e)))
    }

    /// Save settings to disk
    pub fn save(&self, paths: &PaycyclePaths) -> Result<(), PaycycleError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| PaycycleError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| PaycycleError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.planning_horizon_days, 90);
        assert_eq!(settings.optimizer.balance_threshold, Money::from_dollars(50));
        assert_eq!(settings.optimizer.max_iterations, 100);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PaycyclePaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.planning_horizon_days = 30;
        settings.optimizer.max_iterations = 5;
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.planning_horizon_days, 30);
        assert_eq!(loaded.optimizer.max_iterations, 5);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PaycyclePaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();
        std::fs::write(
            paths.settings_file(),
            r#"{"currency_symbol": "€", "optimizer": {"balance_threshold": 2500}}"#,
        )
        .unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.currency_symbol, "€");
        assert_eq!(loaded.optimizer.balance_threshold, Money::from_cents(2500));
        assert_eq!(loaded.optimizer.max_iterations, 100);
        assert_eq!(loaded.date_format, "%Y-%m-%d");
    }

    #[test]
    fn test_corrupt_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PaycyclePaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();
        std::fs::write(paths.settings_file(), "{not json").unwrap();

        assert!(matches!(
            Settings::load_or_create(&paths),
            Err(PaycycleError::Config(_))
        ));
    }
}
