//! Bill model
//!
//! A recurring obligation with an optional due day. Like income sources, the
//! recurrence is stored raw and parsed on demand.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ids::BillId;
use super::money::Money;
use super::schedule::{bill_detail, BillRecurrence, MONTHLY};
use crate::error::PaycycleResult;

/// Validation errors for bills
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BillValidationError {
    EmptyName,
    NegativeAmount,
    InvalidDueDay(u32),
}

impl std::fmt::Display for BillValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Bill name cannot be empty"),
            Self::NegativeAmount => write!(f, "Bill amount cannot be negative"),
            Self::InvalidDueDay(day) => write!(f, "Due day {} is outside 0-31", day),
        }
    }
}

impl std::error::Error for BillValidationError {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bill {
    pub id: BillId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_amount: Option<Money>,
    /// Day of month the bill is due; 0 means it can be paid any time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_day: Option<u32>,
    #[serde(default = "default_recurrence")]
    pub recurrence_kind: String,
    #[serde(default)]
    pub recurrence_detail: Value,
    #[serde(default = "default_active")]
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_recurrence() -> String {
    MONTHLY.to_string()
}

fn default_active() -> bool {
    true
}

impl Bill {
    /// Create an active monthly bill
    pub fn monthly(name: impl Into<String>, amount: Money, due_day: u32) -> Self {
        Self::from_raw(name, Some(amount), Some(due_day), MONTHLY, Value::Null)
    }

    /// Create an active bill on a cyclic recurrence kind phased by `anchor`
    pub fn cyclic(
        name: impl Into<String>,
        amount: Money,
        due_day: u32,
        kind: &str,
        anchor: Option<NaiveDate>,
    ) -> Self {
        Self::from_raw(name, Some(amount), Some(due_day), kind, bill_detail(anchor))
    }

    pub fn from_raw(
        name: impl Into<String>,
        default_amount: Option<Money>,
        due_day: Option<u32>,
        recurrence_kind: impl Into<String>,
        recurrence_detail: Value,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: BillId::new(),
            name: name.into(),
            default_amount,
            due_day,
            recurrence_kind: recurrence_kind.into(),
            recurrence_detail,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn recurrence(&self) -> PaycycleResult<BillRecurrence> {
        BillRecurrence::parse(&self.recurrence_kind, &self.recurrence_detail)
    }

    /// Amount planned per occurrence, zero when unset
    pub fn amount(&self) -> Money {
        self.default_amount.unwrap_or_default()
    }

    /// Due day where 0 (or unset) means "anytime"
    pub fn due_day_or_anytime(&self) -> u32 {
        self.due_day.unwrap_or(0)
    }

    /// Whether a paycheck landing on `pay_day` of a month can cover this bill
    pub fn payable_from(&self, pay_day: u32) -> bool {
        let due = self.due_day_or_anytime();
        due == 0 || pay_day <= due
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
        self.updated_at = Utc::now();
    }

    pub fn validate(&self) -> Result<(), BillValidationError> {
        if self.name.trim().is_empty() {
            return Err(BillValidationError::EmptyName);
        }
        if self.default_amount.is_some_and(|a| a.is_negative()) {
            return Err(BillValidationError::NegativeAmount);
        }
        if let Some(day) = self.due_day {
            if day > 31 {
                return Err(BillValidationError::InvalidDueDay(day));
            }
        }
        Ok(())
    }
}
