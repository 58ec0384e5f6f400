//! Paycycle - map paychecks against bills
//!
//! Generates pay dates from each income source's schedule, assigns every bill
//! occurrence to the paycheck that should cover it, suggests moves that raise
//! the lowest period balance, and reports months with an extra paycheck.
//!
//! # Architecture
//!
//! - `engine`: pure scheduling logic (date generation, matching, optimization,
//!   surplus detection) over in-memory snapshots
//! - `models`: core data types
//! - `storage`: JSON file storage layer
//! - `services`: business logic over storage, feeding the engine
//! - `audit`: append-only change log
//! - `config`: paths and user settings
//! - `cli`, `display`, `export`: the command-line surface
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use paycycle::engine;
//! use serde_json::json;
//!
//! let from = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
//! let to = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
//! let fridays = engine::generate("weekly", &json!({"weekday": 4}), from, to).unwrap();
//! assert_eq!(fridays.len(), 5);
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod engine;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{PaycycleError, PaycycleResult};
