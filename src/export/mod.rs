//! Export module for Paycycle
//!
//! - CSV: the bill plan, one row per assignment (spreadsheet-compatible)
//! - JSON: machine-readable snapshot of every stored entity
//! - YAML: the same snapshot in a human-readable form

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::export_plan_csv;
pub use json::{export_full_json, import_from_json, FullExport, EXPORT_SCHEMA_VERSION};
pub use yaml::{export_full_yaml, import_from_yaml};
