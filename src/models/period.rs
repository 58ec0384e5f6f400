//! Pay period model
//!
//! One dated paycheck from one income source. Periods are created by schedule
//! generation and are unique per (income source, date).

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{IncomeSourceId, PayPeriodId};
use super::money::Money;

/// A single paycheck occurrence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayPeriod {
    pub id: PayPeriodId,
    pub income_source_id: IncomeSourceId,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_amount: Option<Money>,
    pub created_at: DateTime<Utc>,
}

impl PayPeriod {
    pub fn new(
        income_source_id: IncomeSourceId,
        date: NaiveDate,
        expected_amount: Option<Money>,
    ) -> Self {
        Self {
            id: PayPeriodId::new(),
            income_source_id,
            date,
            expected_amount,
            created_at: Utc::now(),
        }
    }

    /// Expected income, zero when unknown
    pub fn income(&self) -> Money {
        self.expected_amount.unwrap_or_default()
    }

    /// Day of the month the paycheck lands on
    pub fn pay_day_of_month(&self) -> u32 {
        self.date.day()
    }

    /// Calendar month key used for per-month coverage
    pub fn month(&self) -> (i32, u32) {
        (self.date.year(), self.date.month())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_accessors() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let period = PayPeriod::new(IncomeSourceId::new(), date, Some(Money::from_dollars(2000)));
        assert_eq!(period.pay_day_of_month(), 15);
        assert_eq!(period.month(), (2025, 1));
        assert_eq!(period.income(), Money::from_dollars(2000));
    }

    #[test]
    fn test_unknown_income_is_zero() {
        let date = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        let period = PayPeriod::new(IncomeSourceId::new(), date, None);
        assert_eq!(period.income(), Money::zero());
    }
}
