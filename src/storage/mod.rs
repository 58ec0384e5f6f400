//! Storage layer for Paycycle
//!
//! JSON file repositories with atomic writes, coordinated by [`Storage`],
//! which also owns the audit logger.

pub mod assignments;
pub mod bills;
pub mod file_io;
pub mod income_sources;
pub mod init;
pub mod periods;

pub use assignments::AssignmentRepository;
pub use bills::BillRepository;
pub use file_io::{read_json, write_json_atomic};
pub use income_sources::IncomeSourceRepository;
pub use init::initialize_storage;
pub use periods::PayPeriodRepository;

use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::PaycyclePaths;
use crate::error::PaycycleError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: PaycyclePaths,
    audit: AuditLogger,
    pub income_sources: IncomeSourceRepository,
    pub periods: PayPeriodRepository,
    pub bills: BillRepository,
    pub assignments: AssignmentRepository,
}

impl Storage {
    /// Create a new Storage instance; nothing is loaded yet
    pub fn new(paths: PaycyclePaths) -> Result<Self, PaycycleError> {
        paths.ensure_directories()?;

        Ok(Self {
            audit: AuditLogger::new(paths.audit_log()),
            income_sources: IncomeSourceRepository::new(paths.income_sources_file()),
            periods: PayPeriodRepository::new(paths.periods_file()),
            bills: BillRepository::new(paths.bills_file()),
            assignments: AssignmentRepository::new(paths.assignments_file()),
            paths,
        })
    }

    pub fn paths(&self) -> &PaycyclePaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load all data from disk
    pub fn load_all(&self) -> Result<(), PaycycleError> {
        self.income_sources.load()?;
        self.periods.load()?;
        self.bills.load()?;
        self.assignments.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), PaycycleError> {
        self.income_sources.save()?;
        self.periods.save()?;
        self.bills.save()?;
        self.assignments.save()?;
        Ok(())
    }

    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), PaycycleError> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> Result<(), PaycycleError> {
        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
        ))
    }

    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), PaycycleError> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }

    /// Append a group of entries with one flush
    pub fn log_batch(&self, entries: &[AuditEntry]) -> Result<(), PaycycleError> {
        self.audit.log_batch(entries)
    }

    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }
}
