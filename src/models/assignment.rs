//! Bill assignment model
//!
//! Links one bill occurrence to the pay period that will cover it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{AssignmentId, BillId, PayPeriodId};
use super::money::Money;

/// Payment state of an assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStatus {
    #[default]
    Pending,
    Paid,
    Deferred,
    Uncertain,
    Skipped,
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Deferred => "deferred",
            Self::Uncertain => "uncertain",
            Self::Skipped => "skipped",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for AssignmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "deferred" => Ok(Self::Deferred),
            "uncertain" => Ok(Self::Uncertain),
            "skipped" => Ok(Self::Skipped),
            other => Err(format!("Unknown assignment status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillAssignment {
    pub id: AssignmentId,
    pub bill_id: BillId,
    pub period_id: PayPeriodId,
    pub planned_amount: Money,
    #[serde(default)]
    pub status: AssignmentStatus,
    /// Placed by an explicit user action; automatic matching leaves it alone
    #[serde(default)]
    pub manually_moved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BillAssignment {
    /// A pending, automatically placed assignment
    pub fn new(bill_id: BillId, period_id: PayPeriodId, planned_amount: Money) -> Self {
        let now = Utc::now();
        Self {
            id: AssignmentId::new(),
            bill_id,
            period_id,
            planned_amount,
            status: AssignmentStatus::Pending,
            manually_moved: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// The replacement record for moving this assignment to another period
    ///
    /// Moves are delete-and-recreate, so the copy gets a fresh ID. Amount and
    /// status carry over and the copy is marked as manually moved.
    pub fn relocated(&self, period_id: PayPeriodId) -> Self {
        let mut moved = Self::new(self.bill_id, period_id, self.planned_amount);
        moved.status = self.status;
        moved.manually_moved = true;
        moved
    }

    pub fn set_status(&mut self, status: AssignmentStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }
}
