//! Pay period service
//!
//! Materializes pay periods from income source schedules and reports the
//! balance left in each period after its assigned bills.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::audit::{AuditEntry, EntityType};
use crate::engine;
use crate::error::PaycycleResult;
use crate::models::{IncomeSourceId, Money, PayPeriod};
use crate::storage::Storage;

/// An income source whose schedule could not be generated
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFailure {
    pub income_source_id: IncomeSourceId,
    pub source_name: String,
    pub reason: String,
}

/// Outcome of one generation run
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationReport {
    pub created: Vec<PayPeriod>,
    /// Dates that already had a period for their source
    pub already_present: usize,
    pub failures: Vec<SourceFailure>,
}

/// A period with its income, assigned total and what is left
#[derive(Debug, Clone, Serialize)]
pub struct PeriodBalance {
    pub period: PayPeriod,
    pub source_name: String,
    pub income: Money,
    pub assigned: Money,
    pub balance: Money,
    pub bill_count: usize,
}

/// Service for pay period management
pub struct PeriodService<'a> {
    storage: &'a Storage,
}

impl<'a> PeriodService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create pay periods for every active income source in `[from, to]`
    ///
    /// Running it twice over the same range creates nothing the second time.
    /// A source whose schedule fails to parse is reported and skipped.
    #[instrument(skip(self))]
    pub fn generate_periods(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> PaycycleResult<GenerationReport> {
        let mut report = GenerationReport::default();

        for source in self.storage.income_sources.get_active()? {
            let dates =
                match engine::generate(&source.schedule_kind, &source.schedule_detail, from, to) {
                    Ok(dates) => dates,
                    Err(e) => {
                        warn!("Skipping income source '{}': {}", source.name, e);
                        report.failures.push(SourceFailure {
                            income_source_id: source.id,
                            source_name: source.name.clone(),
                            reason: e.to_string(),
                        });
                        continue;
                    }
                };

            for date in dates {
                let period = PayPeriod::new(source.id, date, source.default_amount);
                if self.storage.periods.insert_if_absent(period.clone())? {
                    report.created.push(period);
                } else {
                    report.already_present += 1;
                }
            }
            debug!("Generated periods for '{}'", source.name);
        }

        if !report.created.is_empty() {
            self.storage.periods.save()?;
            let entries: Vec<AuditEntry> = report
                .created
                .iter()
                .map(|p| {
                    AuditEntry::create(
                        EntityType::PayPeriod,
                        p.id.to_string(),
                        Some(p.date.to_string()),
                        p,
                    )
                })
                .collect();
            self.storage.log_batch(&entries)?;
        }

        info!(
            "Created {} pay periods ({} already present)",
            report.created.len(),
            report.already_present
        );
        Ok(report)
    }

    /// Periods dated in `[from, to]` with their balances, ordered by date
    pub fn list_balances(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> PaycycleResult<Vec<PeriodBalance>> {
        let names: HashMap<IncomeSourceId, String> = self
            .storage
            .income_sources
            .get_all()?
            .into_iter()
            .map(|s| (s.id, s.name))
            .collect();

        let mut balances = Vec::new();
        for period in self.storage.periods.get_in_range(from, to)? {
            let assignments = self.storage.assignments.get_by_period(period.id)?;
            let assigned: Money = assignments.iter().map(|a| a.planned_amount).sum();
            let income = period.income();
            balances.push(PeriodBalance {
                source_name: names
                    .get(&period.income_source_id)
                    .cloned()
                    .unwrap_or_else(|| period.income_source_id.to_string()),
                income,
                assigned,
                balance: income - assigned,
                bill_count: assignments.len(),
                period,
            });
        }
        Ok(balances)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::PaycyclePaths;
    use crate::models::{BillAssignment, BillId, IncomeSource};
    use crate::services::IncomeSourceService;
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = PaycyclePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_generation_is_idempotent() {
        let (_temp_dir, storage) = create_test_storage();
        IncomeSourceService::new(&storage)
            .create(
                "Payroll",
                "semimonthly",
                &json!({"days": [1, 16]}),
                Some(Money::from_dollars(2000)),
            )
            .unwrap();
        let service = PeriodService::new(&storage);

        let first = service
            .generate_periods(date(2025, 1, 1), date(2025, 3, 31))
            .unwrap();
        assert_eq!(first.created.len(), 6);
        assert!(first
            .created
            .iter()
            .all(|p| p.expected_amount == Some(Money::from_dollars(2000))));

        let second = service
            .generate_periods(date(2025, 1, 1), date(2025, 3, 31))
            .unwrap();
        assert!(second.created.is_empty());
        assert_eq!(second.already_present, 6);
        assert_eq!(storage.periods.count().unwrap(), 6);
    }

    #[test]
    fn test_bad_source_does_not_block_others() {
        let (_temp_dir, storage) = create_test_storage();
        let broken = IncomeSource::from_raw("Broken", "semimonthly", json!({"days": [1]}), None);
        storage.income_sources.upsert(broken.clone()).unwrap();
        IncomeSourceService::new(&storage)
            .create("Weekly", "weekly", &json!({"weekday": 4}), None)
            .unwrap();

        let report = PeriodService::new(&storage)
            .generate_periods(date(2025, 1, 1), date(2025, 1, 31))
            .unwrap();
        assert_eq!(report.created.len(), 5);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].income_source_id, broken.id);
    }

    #[test]
    fn test_inactive_sources_are_skipped() {
        let (_temp_dir, storage) = create_test_storage();
        let income = IncomeSourceService::new(&storage);
        income
            .create("Old job", "weekly", &json!({"weekday": 4}), None)
            .unwrap();
        income.set_active("Old job", false).unwrap();

        let report = PeriodService::new(&storage)
            .generate_periods(date(2025, 1, 1), date(2025, 1, 31))
            .unwrap();
        assert!(report.created.is_empty());
        assert!(report.failures.is_empty());
    }

    #[test]
    fn test_list_balances() {
        let (_temp_dir, storage) = create_test_storage();
        IncomeSourceService::new(&storage)
            .create(
                "Payroll",
                "semimonthly",
                &json!({"days": [1, 15]}),
                Some(Money::from_dollars(2000)),
            )
            .unwrap();
        let service = PeriodService::new(&storage);
        let report = service
            .generate_periods(date(2025, 1, 1), date(2025, 1, 31))
            .unwrap();
        let first = &report.created[0];
        storage
            .assignments
            .insert_if_absent(BillAssignment::new(
                BillId::new(),
                first.id,
                Money::from_dollars(1200),
            ))
            .unwrap();

        let balances = service
            .list_balances(date(2025, 1, 1), date(2025, 1, 31))
            .unwrap();
        assert_eq!(balances.len(), 2);
        assert_eq!(balances[0].source_name, "Payroll");
        assert_eq!(balances[0].assigned, Money::from_dollars(1200));
        assert_eq!(balances[0].balance, Money::from_dollars(800));
        assert_eq!(balances[0].bill_count, 1);
        assert_eq!(balances[1].balance, Money::from_dollars(2000));
    }
}
