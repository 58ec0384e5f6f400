//! Service layer for Paycycle
//!
//! Business logic on top of the storage layer: validation, running the engine
//! over stored snapshots, persisting its results and writing the audit trail.

pub mod assignment;
pub mod bill;
pub mod income;
pub mod period;
pub mod plan;

pub use assignment::{AssignmentDetail, AssignmentService, AutoAssignReport};
pub use bill::BillService;
pub use income::IncomeSourceService;
pub use period::{GenerationReport, PeriodBalance, PeriodService, SourceFailure};
pub use plan::PlanService;
