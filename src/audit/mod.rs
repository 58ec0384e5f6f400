//! Audit logging for Paycycle
//!
//! Every persisted change (income sources, bills, generated pay periods,
//! matched or moved assignments) is appended to `audit.log` as one JSON line
//! with before/after snapshots.
//!
//! # Example
//!
//! ```rust,ignore
//! use paycycle::audit::{AuditEntry, AuditLogger, EntityType};
//!
//! let logger = AuditLogger::new(audit_log_path);
//! let entry = AuditEntry::create(
//!     EntityType::Bill,
//!     bill.id.to_string(),
//!     Some(bill.name.clone()),
//!     &bill,
//! );
//! logger.log(&entry)?;
//! ```

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
