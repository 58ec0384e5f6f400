//! Surplus detector
//!
//! Finds months in which an income source pays more often than usual, e.g. the
//! fifth Friday of a weekly paycheck or the third biweekly paycheck.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::calendar::month_key;
use super::generate::occurrences;
use crate::models::{IncomeSource, IncomeSourceId, Money};

/// One month with more paychecks than the schedule usually yields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurplusMonth {
    pub income_source_id: IncomeSourceId,
    pub source_name: String,
    pub year: i32,
    pub month: u32,
    pub paychecks: u32,
    pub expected: u32,
    pub extra_checks: u32,
    pub surplus_amount: Money,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurplusReport {
    pub months: Vec<SurplusMonth>,
    pub annual_surplus: Money,
}

/// Report surplus months for every source in `[from, to]`
///
/// Sources whose schedule does not parse are left out of the report.
#[instrument(skip_all, fields(sources = sources.len(), from = %from, to = %to))]
pub fn detect_surplus(sources: &[IncomeSource], from: NaiveDate, to: NaiveDate) -> SurplusReport {
    let mut report = SurplusReport::default();

    for source in sources {
        let schedule = match source.schedule() {
            Ok(schedule) => schedule,
            Err(e) => {
                debug!("Skipping income source '{}': {}", source.name, e);
                continue;
            }
        };

        let mut per_month: BTreeMap<(i32, u32), u32> = BTreeMap::new();
        for date in occurrences(&schedule, from, to) {
            *per_month.entry(month_key(date)).or_insert(0) += 1;
        }

        let expected = schedule.expected_per_month();
        for ((year, month), paychecks) in per_month {
            if paychecks <= expected {
                continue;
            }
            let extra_checks = paychecks - expected;
            let surplus_amount = source.paycheck() * extra_checks;
            report.annual_surplus += surplus_amount;
            report.months.push(SurplusMonth {
                income_source_id: source.id,
                source_name: source.name.clone(),
                year,
                month,
                paychecks,
                expected,
                extra_checks,
                surplus_amount,
            });
        }
    }

    debug!(
        "Found {} surplus months totalling {}",
        report.months.len(),
        report.annual_surplus
    );
    report
}
