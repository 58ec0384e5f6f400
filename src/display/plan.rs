//! Optimizer and surplus display formatting

use tabled::Tabled;

use super::render_table;
use crate::engine::{OptimizationResult, SurplusReport};

#[derive(Tabled)]
struct SuggestionRow {
    #[tabled(rename = "#")]
    step: usize,
    #[tabled(rename = "Bill")]
    bill: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "From")]
    from: String,
    #[tabled(rename = "To")]
    to: String,
}

/// Format suggested moves followed by the before/after lowest balance
pub fn format_optimization(result: &OptimizationResult, symbol: &str) -> String {
    let rows = result
        .suggestions
        .iter()
        .enumerate()
        .map(|(i, s)| SuggestionRow {
            step: i + 1,
            bill: s.bill_name.clone(),
            amount: s.amount.format_with_symbol(symbol),
            from: s.from_date.to_string(),
            to: s.to_date.to_string(),
        })
        .collect();

    let mut output = render_table(rows, "No moves would improve the plan.");
    output.push_str(&format!(
        "\n\nLowest period balance: {} now, {} after moves (+{})",
        result.current_min_balance.format_with_symbol(symbol),
        result.optimized_min_balance.format_with_symbol(symbol),
        result.improvement.format_with_symbol(symbol)
    ));
    output
}

#[derive(Tabled)]
struct SurplusRow {
    #[tabled(rename = "Month")]
    month: String,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Paychecks")]
    paychecks: String,
    #[tabled(rename = "Surplus")]
    surplus: String,
}

/// Format months where a source pays more often than usual
pub fn format_surplus_report(report: &SurplusReport, symbol: &str) -> String {
    let rows = report
        .months
        .iter()
        .map(|m| SurplusRow {
            month: format!("{}-{:02}", m.year, m.month),
            source: m.source_name.clone(),
            paychecks: format!("{} (usually {})", m.paychecks, m.expected),
            surplus: m.surplus_amount.format_with_symbol(symbol),
        })
        .collect();

    let mut output = render_table(rows, "No surplus paychecks in range.");
    if !report.months.is_empty() {
        output.push_str(&format!(
            "\n\nTotal surplus: {}",
            report.annual_surplus.format_with_symbol(symbol)
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SurplusMonth;
    use crate::models::{IncomeSourceId, Money};

    #[test]
    fn test_no_suggestions() {
        let result = OptimizationResult {
            suggestions: Vec::new(),
            current_min_balance: Money::from_dollars(800),
            optimized_min_balance: Money::from_dollars(800),
            improvement: Money::zero(),
        };
        let output = format_optimization(&result, "$");
        assert!(output.starts_with("No moves would improve the plan."));
        assert!(output.contains("$800.00 now, $800.00 after moves (+$0.00)"));
    }

    #[test]
    fn test_surplus_report() {
        let report = SurplusReport {
            months: vec![SurplusMonth {
                income_source_id: IncomeSourceId::new(),
                source_name: "Warehouse".into(),
                year: 2025,
                month: 1,
                paychecks: 5,
                expected: 4,
                extra_checks: 1,
                surplus_amount: Money::from_dollars(500),
            }],
            annual_surplus: Money::from_dollars(500),
        };
        let output = format_surplus_report(&report, "$");
        assert!(output.contains("2025-01"));
        assert!(output.contains("5 (usually 4)"));
        assert!(output.contains("Total surplus: $500.00"));
    }
}
