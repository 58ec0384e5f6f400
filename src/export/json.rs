//! JSON export of the complete data set with schema versioning

use std::collections::HashSet;
use std::io::Write;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{PaycycleError, PaycycleResult};
use crate::models::{Bill, BillAssignment, IncomeSource, PayPeriod};
use crate::storage::Storage;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Snapshot of every stored entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub income_sources: Vec<IncomeSource>,
    pub periods: Vec<PayPeriod>,
    pub bills: Vec<Bill>,
    pub assignments: Vec<BillAssignment>,

    pub metadata: ExportMetadata,
}

/// Counts and date span, for a reader skimming the file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub income_source_count: usize,
    pub period_count: usize,
    pub bill_count: usize,
    pub assignment_count: usize,
    pub earliest_period: Option<NaiveDate>,
    pub latest_period: Option<NaiveDate>,
}

impl FullExport {
    pub fn from_storage(storage: &Storage) -> PaycycleResult<Self> {
        let income_sources = storage.income_sources.get_all()?;
        let periods = storage.periods.get_all()?;
        let bills = storage.bills.get_all()?;
        let assignments = storage.assignments.get_all()?;

        let metadata = ExportMetadata {
            income_source_count: income_sources.len(),
            period_count: periods.len(),
            bill_count: bills.len(),
            assignment_count: assignments.len(),
            earliest_period: periods.iter().map(|p| p.date).min(),
            latest_period: periods.iter().map(|p| p.date).max(),
        };

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            income_sources,
            periods,
            bills,
            assignments,
            metadata,
        })
    }

    /// Check the schema version and that every reference resolves
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        let source_ids: HashSet<_> = self.income_sources.iter().map(|s| s.id).collect();
        let period_ids: HashSet<_> = self.periods.iter().map(|p| p.id).collect();
        let bill_ids: HashSet<_> = self.bills.iter().map(|b| b.id).collect();

        for period in &self.periods {
            if !source_ids.contains(&period.income_source_id) {
                return Err(format!(
                    "Pay period {} references unknown income source {}",
                    period.id, period.income_source_id
                ));
            }
        }

        let mut pairs = HashSet::new();
        for assignment in &self.assignments {
            if !bill_ids.contains(&assignment.bill_id) {
                return Err(format!(
                    "Assignment {} references unknown bill {}",
                    assignment.id, assignment.bill_id
                ));
            }
            if !period_ids.contains(&assignment.period_id) {
                return Err(format!(
                    "Assignment {} references unknown pay period {}",
                    assignment.id, assignment.period_id
                ));
            }
            if !pairs.insert((assignment.bill_id, assignment.period_id)) {
                return Err(format!(
                    "Bill {} is assigned to pay period {} more than once",
                    assignment.bill_id, assignment.period_id
                ));
            }
        }

        Ok(())
    }
}

/// Export the full data set to JSON
pub fn export_full_json<W: Write>(storage: &Storage, writer: W, pretty: bool) -> PaycycleResult<()> {
    let export = FullExport::from_storage(storage)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| PaycycleError::Export(e.to_string()))
}

/// Read back a JSON export, rejecting one that does not validate
pub fn import_from_json(json_str: &str) -> PaycycleResult<FullExport> {
    let export: FullExport = serde_json::from_str(json_str)?;
    export.validate().map_err(PaycycleError::Validation)?;
    Ok(export)
}
