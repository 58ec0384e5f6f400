//! Core data models for Paycycle
//!
//! Income sources and the pay periods generated from them, bills, and the
//! assignments that tie a bill occurrence to the paycheck covering it.

pub mod assignment;
pub mod bill;
pub mod ids;
pub mod income;
pub mod money;
pub mod period;
pub mod schedule;

pub use assignment::{AssignmentStatus, BillAssignment};
pub use bill::{Bill, BillValidationError};
pub use ids::{AssignmentId, BillId, IncomeSourceId, PayPeriodId};
pub use income::{IncomeSource, IncomeValidationError};
pub use money::{Money, MoneyParseError};
pub use period::PayPeriod;
pub use schedule::{BillRecurrence, PaySchedule};
