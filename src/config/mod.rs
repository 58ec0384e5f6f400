//! Configuration module for Paycycle
//!
//! Path resolution for the data directory and persisted user settings,
//! including the optimizer policy.

pub mod paths;
pub mod settings;

pub use paths::PaycyclePaths;
pub use settings::Settings;
