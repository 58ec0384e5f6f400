//! CSV export of the bill plan

use std::collections::HashMap;
use std::io::Write;

use serde::Serialize;

use crate::error::{PaycycleError, PaycycleResult};
use crate::models::{BillId, IncomeSourceId, PayPeriod, PayPeriodId};
use crate::storage::Storage;

/// One exported row: a bill placed on a paycheck
#[derive(Debug, Serialize)]
struct PlanRow<'a> {
    #[serde(rename = "Period Date")]
    period_date: String,
    #[serde(rename = "Income Source")]
    source: &'a str,
    #[serde(rename = "Bill")]
    bill: &'a str,
    #[serde(rename = "Amount")]
    amount: String,
    #[serde(rename = "Status")]
    status: String,
    #[serde(rename = "Manually Moved")]
    manually_moved: bool,
    #[serde(rename = "Assignment ID")]
    assignment_id: String,
}

fn export_error(e: impl std::fmt::Display) -> PaycycleError {
    PaycycleError::Export(e.to_string())
}

/// Export every assignment as CSV, ordered by period date then bill name
///
/// Assignments whose period no longer exists are skipped.
pub fn export_plan_csv<W: Write>(storage: &Storage, writer: W) -> PaycycleResult<usize> {
    let periods: HashMap<PayPeriodId, PayPeriod> = storage
        .periods
        .get_all()?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();
    let bills: HashMap<BillId, String> = storage
        .bills
        .get_all()?
        .into_iter()
        .map(|b| (b.id, b.name))
        .collect();
    let sources: HashMap<IncomeSourceId, String> = storage
        .income_sources
        .get_all()?
        .into_iter()
        .map(|s| (s.id, s.name))
        .collect();

    let mut rows: Vec<_> = storage
        .assignments
        .get_all()?
        .into_iter()
        .filter_map(|a| {
            let period = periods.get(&a.period_id)?;
            let bill = bills.get(&a.bill_id).map(String::as_str).unwrap_or("Unknown");
            let source = sources
                .get(&period.income_source_id)
                .map(String::as_str)
                .unwrap_or("Unknown");
            Some((period.date, bill, source, a))
        })
        .collect();
    rows.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));

    let mut csv_writer = ::csv::Writer::from_writer(writer);
    for &(date, bill, source, ref assignment) in &rows {
        csv_writer
            .serialize(PlanRow {
                period_date: date.to_string(),
                source,
                bill,
                amount: format!("{:.2}", assignment.planned_amount.as_decimal()),
                status: assignment.status.to_string(),
                manually_moved: assignment.manually_moved,
                assignment_id: assignment.id.to_string(),
            })
            .map_err(export_error)?;
    }
    csv_writer.flush().map_err(export_error)?;

    Ok(rows.len())
}
