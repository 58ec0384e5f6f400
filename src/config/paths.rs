//! Path management for Paycycle
//!
//! ## Path Resolution Order
//!
//! 1. `PAYCYCLE_DATA_DIR` environment variable (if set)
//! 2. The platform config directory from `directories`, e.g.
//!    `~/.config/paycycle` on Linux or `%APPDATA%\paycycle\config` on Windows

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::PaycycleError;

/// Environment variable that overrides the data directory
pub const DATA_DIR_ENV: &str = "PAYCYCLE_DATA_DIR";

/// Manages all paths used by Paycycle
#[derive(Debug, Clone)]
pub struct PaycyclePaths {
    base_dir: PathBuf,
}

impl PaycyclePaths {
    /// Resolve the base directory from the environment or the platform default
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, PaycycleError> {
        let base_dir = match std::env::var_os(DATA_DIR_ENV) {
            Some(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => ProjectDirs::from("", "", "paycycle")
                .map(|dirs| dirs.config_dir().to_path_buf())
                .ok_or_else(|| {
                    PaycycleError::Config("Could not determine a home directory".into())
                })?,
        };

        Ok(Self { base_dir })
    }

    /// Create paths rooted at a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Directory holding the JSON data files
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    pub fn income_sources_file(&self) -> PathBuf {
        self.data_dir().join("income_sources.json")
    }

    pub fn periods_file(&self) -> PathBuf {
        self.data_dir().join("periods.json")
    }

    pub fn bills_file(&self) -> PathBuf {
        self.data_dir().join("bills.json")
    }

    pub fn assignments_file(&self) -> PathBuf {
        self.data_dir().join("assignments.json")
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), PaycycleError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| PaycycleError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| PaycycleError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if Paycycle has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}
