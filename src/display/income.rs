//! Income source and bill display formatting

use chrono::NaiveDate;
use tabled::Tabled;

use super::render_table;
use crate::models::{Bill, IncomeSource};

#[derive(Tabled)]
struct IncomeRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Schedule")]
    schedule: String,
    #[tabled(rename = "Paycheck")]
    paycheck: String,
    #[tabled(rename = "Status")]
    status: &'static str,
}

/// Format income sources as a table
pub fn format_income_list(sources: &[IncomeSource], symbol: &str) -> String {
    let rows = sources
        .iter()
        .map(|source| IncomeRow {
            id: source.id.to_string(),
            name: source.name.clone(),
            schedule: match source.schedule() {
                Ok(schedule) => schedule.to_string(),
                Err(e) => format!("invalid: {}", e),
            },
            paycheck: source
                .default_amount
                .map(|m| m.format_with_symbol(symbol))
                .unwrap_or_else(|| "-".to_string()),
            status: if source.active { "active" } else { "inactive" },
        })
        .collect();
    render_table(rows, "No income sources found.")
}

#[derive(Tabled)]
struct BillRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Recurs")]
    recurs: String,
    #[tabled(rename = "Status")]
    status: &'static str,
}

/// Format bills as a table
pub fn format_bill_list(bills: &[Bill], symbol: &str) -> String {
    let rows = bills
        .iter()
        .map(|bill| {
            let anchor = bill.recurrence().ok().and_then(|r| r.anchor());
            BillRow {
                id: bill.id.to_string(),
                name: bill.name.clone(),
                amount: bill.amount().format_with_symbol(symbol),
                due: match bill.due_day_or_anytime() {
                    0 => "any time".to_string(),
                    day => format!("day {}", day),
                },
                recurs: match anchor {
                    Some(anchor) => format!("{} from {}", bill.recurrence_kind, anchor),
                    None => bill.recurrence_kind.clone(),
                },
                status: if bill.active { "active" } else { "inactive" },
            }
        })
        .collect();
    render_table(rows, "No bills found.")
}

/// One payday per line with its weekday
pub fn format_pay_dates(dates: &[NaiveDate]) -> String {
    if dates.is_empty() {
        return "No paydays in range.".to_string();
    }
    dates
        .iter()
        .map(|d| d.format("%Y-%m-%d (%a)").to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use serde_json::json;

    #[test]
    fn test_empty_lists() {
        assert_eq!(format_income_list(&[], "$"), "No income sources found.");
        assert_eq!(format_bill_list(&[], "$"), "No bills found.");
    }

    #[test]
    fn test_income_list_shows_schedule() {
        let source = IncomeSource::from_raw(
            "Payroll",
            "semimonthly",
            json!({"days": [1, 15]}),
            Some(Money::from_dollars(2000)),
        );
        let output = format_income_list(&[source], "€");
        assert!(output.contains("Payroll"));
        assert!(output.contains("Days 1 and 15"));
        assert!(output.contains("€2000.00"));
    }

    #[test]
    fn test_bill_list_any_time() {
        let bill = Bill::monthly("Streaming", Money::from_cents(1599), 0);
        let output = format_bill_list(&[bill], "$");
        assert!(output.contains("any time"));
        assert!(output.contains("$15.99"));
    }

    #[test]
    fn test_pay_dates() {
        let dates = [NaiveDate::from_ymd_opt(2025, 1, 3).unwrap()];
        assert_eq!(format_pay_dates(&dates), "2025-01-03 (Fri)");
    }
}
