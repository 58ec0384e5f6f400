//! Bill assignment service
//!
//! Runs the matcher against stored bills and periods, persists what it
//! proposes, and handles the user-facing edits: status changes and moves.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, instrument};

use crate::audit::{AuditEntry, EntityType};
use crate::engine::matcher::{auto_assign, BillFailure, ExistingAssignment, MatchRequest};
use crate::error::{PaycycleError, PaycycleResult};
use crate::models::{
    AssignmentStatus, BillAssignment, BillId, IncomeSourceId, PayPeriod, PayPeriodId,
};
use crate::storage::Storage;

/// What an auto-assign run changed
#[derive(Debug, Clone, Default, Serialize)]
pub struct AutoAssignReport {
    pub created: Vec<BillAssignment>,
    /// Manually moved assignments removed by a forced run
    pub superseded: Vec<BillAssignment>,
    pub failures: Vec<BillFailure>,
}

/// One assignment joined with its bill, period and income source
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentDetail {
    pub assignment: BillAssignment,
    pub bill_name: String,
    pub period_date: NaiveDate,
    pub source_name: String,
}

/// Service for bill assignments
pub struct AssignmentService<'a> {
    storage: &'a Storage,
}

impl<'a> AssignmentService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Match every active bill's due dates in `[from, to]` to pay periods
    ///
    /// Only periods of active income sources are candidates. Existing coverage
    /// is respected; with `force`, months covered only by manually moved
    /// assignments are matched again and those assignments are removed.
    #[instrument(skip(self))]
    pub fn auto_assign(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        force: bool,
    ) -> PaycycleResult<AutoAssignReport> {
        let bills = self.storage.bills.get_active()?;
        let active_sources: HashSet<IncomeSourceId> = self
            .storage
            .income_sources
            .get_active()?
            .into_iter()
            .map(|s| s.id)
            .collect();

        let periods_in_range = self.storage.periods.get_in_range(from, to)?;
        let candidates: Vec<PayPeriod> = periods_in_range
            .iter()
            .filter(|p| active_sources.contains(&p.income_source_id))
            .cloned()
            .collect();

        let period_by_id: HashMap<PayPeriodId, &PayPeriod> =
            periods_in_range.iter().map(|p| (p.id, p)).collect();
        let existing: Vec<ExistingAssignment> = self
            .storage
            .assignments
            .get_all()?
            .iter()
            .filter_map(|a| {
                period_by_id
                    .get(&a.period_id)
                    .map(|p| ExistingAssignment::new(a, p))
            })
            .collect();

        let plan = auto_assign(&MatchRequest {
            bills: &bills,
            periods: &candidates,
            existing: &existing,
            from,
            to,
            force,
        });

        let mut report = AutoAssignReport {
            failures: plan.failures,
            ..AutoAssignReport::default()
        };
        let mut entries = Vec::new();

        for id in plan.superseded {
            if let Some(removed) = self.storage.assignments.delete(id)? {
                entries.push(AuditEntry::delete(
                    EntityType::BillAssignment,
                    removed.id.to_string(),
                    None,
                    &removed,
                ));
                report.superseded.push(removed);
            }
        }
        for assignment in plan.created {
            if self.storage.assignments.insert_if_absent(assignment.clone())? {
                entries.push(AuditEntry::create(
                    EntityType::BillAssignment,
                    assignment.id.to_string(),
                    None,
                    &assignment,
                ));
                report.created.push(assignment);
            }
        }

        if !entries.is_empty() {
            self.storage.assignments.save()?;
            self.storage.log_batch(&entries)?;
        }

        info!(
            "Auto-assign created {}, superseded {}, {} bills failed",
            report.created.len(),
            report.superseded.len(),
            report.failures.len()
        );
        Ok(report)
    }

    /// Find an assignment by short display ID or full UUID
    pub fn find(&self, identifier: &str) -> PaycycleResult<BillAssignment> {
        self.storage
            .assignments
            .find(identifier)?
            .ok_or_else(|| PaycycleError::assignment_not_found(identifier))
    }

    pub fn set_status(
        &self,
        identifier: &str,
        status: AssignmentStatus,
    ) -> PaycycleResult<BillAssignment> {
        let mut assignment = self.find(identifier)?;
        if assignment.status == status {
            return Ok(assignment);
        }

        let before = assignment.clone();
        assignment.set_status(status);

        self.storage.assignments.update(assignment.clone())?;
        self.storage.assignments.save()?;

        self.storage.log_update(
            EntityType::BillAssignment,
            assignment.id.to_string(),
            None,
            &before,
            &assignment,
        )?;

        Ok(assignment)
    }

    /// Move an assignment to another pay period by user request
    pub fn move_assignment(
        &self,
        identifier: &str,
        target_period: &str,
    ) -> PaycycleResult<BillAssignment> {
        let assignment = self.find(identifier)?;
        let target = self
            .storage
            .periods
            .get_all()?
            .into_iter()
            .find(|p| p.id.matches(target_period))
            .ok_or_else(|| PaycycleError::period_not_found(target_period))?;

        self.relocate(&assignment, target.id)
    }

    /// Delete `assignment` and recreate it in `target`, marked as manually moved
    ///
    /// The change is saved before returning, so each relocation stands on its own.
    pub fn relocate(
        &self,
        assignment: &BillAssignment,
        target: PayPeriodId,
    ) -> PaycycleResult<BillAssignment> {
        if assignment.period_id == target {
            return Err(PaycycleError::Validation(format!(
                "Assignment {} is already in period {}",
                assignment.id, target
            )));
        }
        if self.storage.periods.get(target)?.is_none() {
            return Err(PaycycleError::period_not_found(target.to_string()));
        }
        if self
            .storage
            .assignments
            .pair_exists(assignment.bill_id, target)?
        {
            return Err(PaycycleError::Duplicate {
                entity_type: "Assignment",
                identifier: format!("bill {} in period {}", assignment.bill_id, target),
            });
        }

        let moved = assignment.relocated(target);
        self.storage
            .assignments
            .delete(assignment.id)?
            .ok_or_else(|| PaycycleError::assignment_not_found(assignment.id.to_string()))?;
        self.storage.assignments.insert_if_absent(moved.clone())?;
        self.storage.assignments.save()?;

        self.storage.log_batch(&[
            AuditEntry::delete(
                EntityType::BillAssignment,
                assignment.id.to_string(),
                None,
                assignment,
            ),
            AuditEntry::create(EntityType::BillAssignment, moved.id.to_string(), None, &moved),
        ])?;

        info!("Moved assignment {} to period {} as {}", assignment.id, target, moved.id);
        Ok(moved)
    }

    /// Assignments whose period falls in `[from, to]`, by period date then bill name
    pub fn list_detailed(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> PaycycleResult<Vec<AssignmentDetail>> {
        let periods: HashMap<PayPeriodId, PayPeriod> = self
            .storage
            .periods
            .get_in_range(from, to)?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();
        let bills: HashMap<BillId, String> = self
            .storage
            .bills
            .get_all()?
            .into_iter()
            .map(|b| (b.id, b.name))
            .collect();
        let sources: HashMap<IncomeSourceId, String> = self
            .storage
            .income_sources
            .get_all()?
            .into_iter()
            .map(|s| (s.id, s.name))
            .collect();

        let mut details: Vec<AssignmentDetail> = self
            .storage
            .assignments
            .get_all()?
            .into_iter()
            .filter_map(|assignment| {
                let period = periods.get(&assignment.period_id)?;
                Some(AssignmentDetail {
                    bill_name: bills
                        .get(&assignment.bill_id)
                        .cloned()
                        .unwrap_or_else(|| assignment.bill_id.to_string()),
                    period_date: period.date,
                    source_name: sources
                        .get(&period.income_source_id)
                        .cloned()
                        .unwrap_or_default(),
                    assignment,
                })
            })
            .collect();
        details.sort_by(|a, b| {
            a.period_date
                .cmp(&b.period_date)
                .then_with(|| a.bill_name.cmp(&b.bill_name))
        });
        Ok(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::config::paths::PaycyclePaths;
    use crate::models::Money;
    use crate::services::{BillService, IncomeSourceService, PeriodService};
    use serde_json::json;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Semimonthly 1st/15th payroll over Q1 2025 with rent and phone bills
    fn setup() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = PaycyclePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();

        IncomeSourceService::new(&storage)
            .create(
                "Payroll",
                "semimonthly",
                &json!({"days": [1, 15]}),
                Some(Money::from_dollars(2000)),
            )
            .unwrap();
        let bills = BillService::new(&storage);
        bills
            .create("Rent", Some(Money::from_dollars(1200)), Some(5), "monthly", None)
            .unwrap();
        bills
            .create("Phone", Some(Money::from_dollars(60)), Some(22), "monthly", None)
            .unwrap();
        PeriodService::new(&storage)
            .generate_periods(date(2025, 1, 1), date(2025, 3, 31))
            .unwrap();

        (temp_dir, storage)
    }

    fn q1(service: &AssignmentService<'_>, force: bool) -> AutoAssignReport {
        service
            .auto_assign(date(2025, 1, 1), date(2025, 3, 31), force)
            .unwrap()
    }

    #[test]
    fn test_auto_assign_persists_and_is_idempotent() {
        let (_temp_dir, storage) = setup();
        let service = AssignmentService::new(&storage);

        let first = q1(&service, false);
        assert_eq!(first.created.len(), 6);
        assert_eq!(storage.assignments.count().unwrap(), 6);

        let second = q1(&service, false);
        assert!(second.created.is_empty());
        assert_eq!(storage.assignments.count().unwrap(), 6);

        let details = service
            .list_detailed(date(2025, 1, 1), date(2025, 1, 31))
            .unwrap();
        let rows: Vec<(NaiveDate, &str)> = details
            .iter()
            .map(|d| (d.period_date, d.bill_name.as_str()))
            .collect();
        assert_eq!(
            rows,
            vec![(date(2025, 1, 1), "Rent"), (date(2025, 1, 15), "Phone")]
        );
    }

    #[test]
    fn test_moved_assignment_survives_rerun_until_forced() {
        let (_temp_dir, storage) = setup();
        let service = AssignmentService::new(&storage);
        q1(&service, false);

        let jan = service
            .list_detailed(date(2025, 1, 1), date(2025, 1, 31))
            .unwrap();
        let phone = jan.iter().find(|d| d.bill_name == "Phone").unwrap();
        let rent = jan.iter().find(|d| d.bill_name == "Rent").unwrap();

        let moved = service
            .move_assignment(
                &phone.assignment.id.to_string(),
                &rent.assignment.period_id.to_string(),
            )
            .unwrap();
        assert!(moved.manually_moved);
        assert_eq!(moved.period_id, rent.assignment.period_id);

        let rerun = q1(&service, false);
        assert!(rerun.created.is_empty());
        assert!(storage.assignments.get(moved.id).unwrap().is_some());

        let forced = q1(&service, true);
        assert_eq!(forced.created.len(), 1);
        assert_eq!(forced.created[0].period_id, phone.assignment.period_id);
        assert_eq!(forced.superseded.len(), 1);
        assert_eq!(forced.superseded[0].id, moved.id);
        assert!(storage.assignments.get(moved.id).unwrap().is_none());
        assert_eq!(storage.assignments.count().unwrap(), 6);
    }

    #[test]
    fn test_inactive_source_periods_are_not_candidates() {
        let (_temp_dir, storage) = setup();
        IncomeSourceService::new(&storage)
            .set_active("Payroll", false)
            .unwrap();

        let report = q1(&AssignmentService::new(&storage), false);
        assert!(report.created.is_empty());
    }

    #[test]
    fn test_set_status_is_audited() {
        let (_temp_dir, storage) = setup();
        let service = AssignmentService::new(&storage);
        let report = q1(&service, false);
        let id = report.created[0].id;

        let paid = service
            .set_status(&id.to_string(), AssignmentStatus::Paid)
            .unwrap();
        assert_eq!(paid.status, AssignmentStatus::Paid);
        assert_eq!(
            storage.assignments.get(id).unwrap().unwrap().status,
            AssignmentStatus::Paid
        );

        let last = storage.audit().read_recent(1).unwrap();
        assert_eq!(last[0].operation, Operation::Update);
        assert!(last[0]
            .diff_summary
            .as_deref()
            .unwrap()
            .contains("status: \"pending\" -> \"paid\""));
    }

    #[test]
    fn test_move_rejections() {
        let (_temp_dir, storage) = setup();
        let service = AssignmentService::new(&storage);
        q1(&service, false);
        let all = service
            .list_detailed(date(2025, 1, 1), date(2025, 3, 31))
            .unwrap();
        let rent_jan = &all[0].assignment;

        let same = service.relocate(rent_jan, rent_jan.period_id);
        assert!(matches!(same, Err(PaycycleError::Validation(_))));

        let nowhere = service.move_assignment(&rent_jan.id.to_string(), "per-00000000");
        assert!(nowhere.unwrap_err().is_not_found());

        // Rent is already assigned to the February 1st period
        let rent_feb = all
            .iter()
            .find(|d| d.bill_name == "Rent" && d.period_date == date(2025, 2, 1))
            .unwrap();
        let clash = service.relocate(rent_jan, rent_feb.assignment.period_id);
        assert!(matches!(clash, Err(PaycycleError::Duplicate { .. })));
        assert!(storage.assignments.get(rent_jan.id).unwrap().is_some());
    }
}
