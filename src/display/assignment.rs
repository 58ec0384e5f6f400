//! Period balance and assignment display formatting

use tabled::Tabled;

use super::render_table;
use crate::services::{AssignmentDetail, AutoAssignReport, PeriodBalance};

#[derive(Tabled)]
struct BalanceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Income")]
    income: String,
    #[tabled(rename = "Bills")]
    bills: usize,
    #[tabled(rename = "Assigned")]
    assigned: String,
    #[tabled(rename = "Left")]
    left: String,
}

/// Format period balances, flagging periods that are overdrawn
pub fn format_period_balances(balances: &[PeriodBalance], symbol: &str) -> String {
    let rows = balances
        .iter()
        .map(|b| BalanceRow {
            id: b.period.id.to_string(),
            date: b.period.date.to_string(),
            source: b.source_name.clone(),
            income: b.income.format_with_symbol(symbol),
            bills: b.bill_count,
            assigned: b.assigned.format_with_symbol(symbol),
            left: if b.balance.is_negative() {
                format!("{} !", b.balance.format_with_symbol(symbol))
            } else {
                b.balance.format_with_symbol(symbol)
            },
        })
        .collect();
    render_table(rows, "No pay periods in range.")
}

#[derive(Tabled)]
struct AssignmentRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Paid From")]
    date: String,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Bill")]
    bill: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Moved")]
    moved: &'static str,
}

/// Format assignments with their period date and bill name
pub fn format_assignment_list(details: &[AssignmentDetail], symbol: &str) -> String {
    let rows = details
        .iter()
        .map(|d| AssignmentRow {
            id: d.assignment.id.to_string(),
            date: d.period_date.to_string(),
            source: d.source_name.clone(),
            bill: d.bill_name.clone(),
            amount: d.assignment.planned_amount.format_with_symbol(symbol),
            status: d.assignment.status.to_string(),
            moved: if d.assignment.manually_moved { "yes" } else { "" },
        })
        .collect();
    render_table(rows, "No assignments in range.")
}

/// Summarize an auto-assign run
pub fn format_auto_assign_report(report: &AutoAssignReport) -> String {
    let mut output = format!("Created {} assignment(s)", report.created.len());
    if !report.superseded.is_empty() {
        output.push_str(&format!(
            ", replaced {} manually placed assignment(s)",
            report.superseded.len()
        ));
    }
    output.push('.');

    for failure in &report.failures {
        output.push_str(&format!(
            "\n  Skipped '{}': {}",
            failure.bill_name, failure.reason
        ));
    }
    output
}
