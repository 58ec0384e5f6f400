//! Income source service
//!
//! Creating, finding and toggling income sources, and previewing the paydays a
//! source would generate.

use chrono::NaiveDate;
use serde_json::Value;
use tracing::info;

use crate::audit::EntityType;
use crate::engine;
use crate::error::{PaycycleError, PaycycleResult};
use crate::models::{IncomeSource, IncomeSourceId, Money, PaySchedule};
use crate::storage::Storage;

/// Service for income source management
pub struct IncomeSourceService<'a> {
    storage: &'a Storage,
}

impl<'a> IncomeSourceService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create an income source
    ///
    /// The schedule must parse for its kind; the stored detail is the
    /// normalized form of what was given.
    pub fn create(
        &self,
        name: &str,
        schedule_kind: &str,
        schedule_detail: &Value,
        default_amount: Option<Money>,
    ) -> PaycycleResult<IncomeSource> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PaycycleError::Validation(
                "Income source name cannot be empty".into(),
            ));
        }

        if self.storage.income_sources.get_by_name(name)?.is_some() {
            return Err(PaycycleError::Duplicate {
                entity_type: "Income source",
                identifier: name.to_string(),
            });
        }

        let schedule = PaySchedule::parse(schedule_kind, schedule_detail)?;
        let source = IncomeSource::new(name, schedule, default_amount);
        source
            .validate()
            .map_err(|e| PaycycleError::Validation(e.to_string()))?;

        self.storage.income_sources.upsert(source.clone())?;
        self.storage.income_sources.save()?;

        self.storage.log_create(
            EntityType::IncomeSource,
            source.id.to_string(),
            Some(source.name.clone()),
            &source,
        )?;

        info!("Created income source '{}' ({})", source.name, schedule);
        Ok(source)
    }

    pub fn get(&self, id: IncomeSourceId) -> PaycycleResult<Option<IncomeSource>> {
        self.storage.income_sources.get(id)
    }

    /// Find an income source by name or ID string
    pub fn find(&self, identifier: &str) -> PaycycleResult<Option<IncomeSource>> {
        if let Some(source) = self.storage.income_sources.get_by_name(identifier)? {
            return Ok(Some(source));
        }

        if let Ok(id) = identifier.parse::<IncomeSourceId>() {
            return self.storage.income_sources.get(id);
        }

        Ok(self
            .storage
            .income_sources
            .get_all()?
            .into_iter()
            .find(|s| s.id.matches(identifier)))
    }

    fn require(&self, identifier: &str) -> PaycycleResult<IncomeSource> {
        self.find(identifier)?
            .ok_or_else(|| PaycycleError::income_source_not_found(identifier))
    }

    pub fn list(&self, include_inactive: bool) -> PaycycleResult<Vec<IncomeSource>> {
        if include_inactive {
            self.storage.income_sources.get_all()
        } else {
            self.storage.income_sources.get_active()
        }
    }

    /// Activate or deactivate a source; inactive sources get no new periods
    pub fn set_active(&self, identifier: &str, active: bool) -> PaycycleResult<IncomeSource> {
        let mut source = self.require(identifier)?;
        if source.active == active {
            return Ok(source);
        }

        let before = source.clone();
        source.set_active(active);

        self.storage.income_sources.upsert(source.clone())?;
        self.storage.income_sources.save()?;

        self.storage.log_update(
            EntityType::IncomeSource,
            source.id.to_string(),
            Some(source.name.clone()),
            &before,
            &source,
        )?;

        Ok(source)
    }

    /// Paydays the source would produce in `[from, to]`, without storing them
    pub fn preview_dates(
        &self,
        identifier: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> PaycycleResult<Vec<NaiveDate>> {
        let source = self.require(identifier)?;
        engine::generate(&source.schedule_kind, &source.schedule_detail, from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::config::paths::PaycyclePaths;
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
    fn test_create_and_preview() {
        let (_temp_dir, storage) = create_test_storage();
        let service = IncomeSourceService::new(&storage);

        let source = service
            .create(
                "Warehouse",
                "weekly",
                &json!({"weekday": 4}),
                Some(Money::from_dollars(800)),
            )
            .unwrap();
        assert_eq!(source.schedule_detail, json!({"weekday": 4}));

        let dates = service
            .preview_dates("warehouse", date(2025, 1, 1), date(2025, 1, 31))
            .unwrap();
        assert_eq!(dates.len(), 5);

        let audit = storage.audit().read_all().unwrap();
        assert_eq!(audit.len(), 1);
        assert_eq!(audit[0].entity_type, EntityType::IncomeSource);
    }

    #[test]
    fn test_create_rejects_bad_schedules() {
        let (_temp_dir, storage) = create_test_storage();
        let service = IncomeSourceService::new(&storage);

        let err = service
            .create("Payroll", "semimonthly", &json!({"days": [1, 15, 28]}), None)
            .unwrap_err();
        assert!(matches!(err, PaycycleError::InvalidDayCount(3)));

        let err = service.create("Payroll", "hourly", &json!({}), None).unwrap_err();
        assert!(err.is_schedule_error());

        let err = service
            .create("Bonus", "one_time", &json!({"date": "2025-02-30"}), None)
            .unwrap_err();
        assert!(matches!(err, PaycycleError::InvalidAnchorDate(_)));

        assert_eq!(storage.income_sources.count().unwrap(), 0);
    }

    #[test]
    fn test_duplicate_and_empty_names() {
        let (_temp_dir, storage) = create_test_storage();
        let service = IncomeSourceService::new(&storage);
        let detail = json!({"weekday": 4});

        service.create("Salary", "weekly", &detail, None).unwrap();
        assert!(matches!(
            service.create("salary", "weekly", &detail, None),
            Err(PaycycleError::Duplicate { .. })
        ));
        assert!(matches!(
            service.create("   ", "weekly", &detail, None),
            Err(PaycycleError::Validation(_))
        ));
    }

    #[test]
    fn test_deactivate_is_audited() {
        let (_temp_dir, storage) = create_test_storage();
        let service = IncomeSourceService::new(&storage);
        let source = service
            .create("Salary", "weekly", &json!({"weekday": 4}), None)
            .unwrap();

        let updated = service.set_active(&source.id.to_string(), false).unwrap();
        assert!(!updated.active);
        assert!(service.list(false).unwrap().is_empty());
        assert_eq!(service.list(true).unwrap().len(), 1);

        let audit = storage.audit().read_all().unwrap();
        assert_eq!(audit.last().unwrap().operation, Operation::Update);
        assert_eq!(
            audit.last().unwrap().diff_summary.as_deref(),
            Some("active: true -> false")
        );

        assert!(service.set_active("nobody", true).unwrap_err().is_not_found());
    }
}
