//! YAML export of the complete data set

use std::io::Write;

use crate::error::{PaycycleError, PaycycleResult};
use crate::export::json::FullExport;
use crate::storage::Storage;

fn export_error(e: impl std::fmt::Display) -> PaycycleError {
    PaycycleError::Export(e.to_string())
}

/// Export the full data set as YAML, preceded by a comment header
pub fn export_full_yaml<W: Write>(storage: &Storage, mut writer: W) -> PaycycleResult<()> {
    let export = FullExport::from_storage(storage)?;

    writeln!(writer, "# Paycycle Full Export").map_err(export_error)?;
    writeln!(writer, "# Generated: {}", export.exported_at).map_err(export_error)?;
    writeln!(writer, "# App Version: {}", export.app_version).map_err(export_error)?;
    writeln!(writer).map_err(export_error)?;

    serde_yaml::to_writer(writer, &export).map_err(export_error)
}

/// Read back a YAML export; comment lines are ignored by the parser
pub fn import_from_yaml(yaml_str: &str) -> PaycycleResult<FullExport> {
    let export: FullExport = serde_yaml::from_str(yaml_str)
        .map_err(|e| PaycycleError::Validation(format!("Invalid YAML export: {}", e)))?;
    export.validate().map_err(PaycycleError::Validation)?;
    Ok(export)
}
