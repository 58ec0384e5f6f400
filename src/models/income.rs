//! Income source model
//!
//! An income source is a recurring (or one-off) paycheck. Its schedule is kept
//! as the raw kind and detail payload so that a record with a bad payload can
//! still be loaded, listed and fixed; `schedule()` is the validating accessor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ids::IncomeSourceId;
use super::money::Money;
use super::schedule::PaySchedule;
use crate::error::PaycycleResult;

/// Validation errors for income sources
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncomeValidationError {
    EmptyName,
    NegativeAmount,
}

impl std::fmt::Display for IncomeValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Income source name cannot be empty"),
            Self::NegativeAmount => write!(f, "Default paycheck amount cannot be negative"),
        }
    }
}

impl std::error::Error for IncomeValidationError {}

/// A source of paychecks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeSource {
    pub id: IncomeSourceId,
    pub name: String,
    pub schedule_kind: String,
    #[serde(default)]
    pub schedule_detail: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_amount: Option<Money>,
    #[serde(default = "default_active")]
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl IncomeSource {
    /// Create an active income source from a typed schedule
    pub fn new(name: impl Into<String>, schedule: PaySchedule, default_amount: Option<Money>) -> Self {
        Self::from_raw(name, schedule.kind(), schedule.to_detail(), default_amount)
    }

    /// Create an income source from a stored kind and payload without validating them
    pub fn from_raw(
        name: impl Into<String>,
        schedule_kind: impl Into<String>,
        schedule_detail: Value,
        default_amount: Option<Money>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: IncomeSourceId::new(),
            name: name.into(),
            schedule_kind: schedule_kind.into(),
            schedule_detail,
            default_amount,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Parse the stored schedule
    pub fn schedule(&self) -> PaycycleResult<PaySchedule> {
        PaySchedule::parse(&self.schedule_kind, &self.schedule_detail)
    }

    /// Default paycheck amount, zero when unset
    pub fn paycheck(&self) -> Money {
        self.default_amount.unwrap_or_default()
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
        self.updated_at = Utc::now();
    }

    pub fn validate(&self) -> Result<(), IncomeValidationError> {
        if self.name.trim().is_empty() {
            return Err(IncomeValidationError::EmptyName);
        }
        if self.default_amount.is_some_and(|a| a.is_negative()) {
            return Err(IncomeValidationError::NegativeAmount);
        }
        Ok(())
    }
}
