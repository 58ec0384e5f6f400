//! Display formatting for terminal output
//!
//! Table rendering for sources, bills, periods, assignments and planning
//! results. Amounts are shown with the configured currency symbol.

pub mod assignment;
pub mod income;
pub mod plan;

use tabled::settings::Style;
use tabled::{Table, Tabled};

pub use assignment::{format_assignment_list, format_auto_assign_report, format_period_balances};
pub use income::{format_bill_list, format_income_list, format_pay_dates};
pub use plan::{format_optimization, format_surplus_report};

/// Render rows as a table, or `empty` when there are none
pub(crate) fn render_table<T: Tabled>(rows: Vec<T>, empty: &str) -> String {
    if rows.is_empty() {
        return empty.to_string();
    }
    Table::new(rows).with(Style::psql()).to_string()
}
