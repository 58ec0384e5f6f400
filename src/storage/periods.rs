//! Pay period repository
//!
//! Manages loading and saving pay periods to periods.json. A secondary index
//! keeps (income source, date) unique.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use chrono::NaiveDate;

use crate::error::PaycycleError;
use crate::models::{IncomeSourceId, PayPeriod, PayPeriodId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct PeriodData {
    #[serde(default)]
    periods: Vec<PayPeriod>,
}

/// Repository for pay period persistence
pub struct PayPeriodRepository {
    path: PathBuf,
    data: RwLock<HashMap<PayPeriodId, PayPeriod>>,
    /// Index: (income source, date) -> period
    by_source_date: RwLock<HashMap<(IncomeSourceId, NaiveDate), PayPeriodId>>,
}

impl PayPeriodRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_source_date: RwLock::new(HashMap::new()),
        }
    }

    /// Load periods from disk
    ///
    /// A file holding two periods for the same source and date keeps the first.
    pub fn load(&self) -> Result<(), PaycycleError> {
        let file_data: PeriodData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(|e| {
            PaycycleError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        let mut index = self.by_source_date.write().map_err(|e| {
            PaycycleError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.clear();
        index.clear();
        for period in file_data.periods {
            let key = (period.income_source_id, period.date);
            if index.contains_key(&key) {
                continue;
            }
            index.insert(key, period.id);
            data.insert(period.id, period);
        }

        Ok(())
    }

    /// Save periods to disk
    pub fn save(&self) -> Result<(), PaycycleError> {
        let periods = self.get_all()?;
        write_json_atomic(&self.path, &PeriodData { periods })
    }

    pub fn get(&self, id: PayPeriodId) -> Result<Option<PayPeriod>, PaycycleError> {
        let data = self.data.read().map_err(|e| {
            PaycycleError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.get(&id).cloned())
    }

    /// All periods ordered by date, then source
    pub fn get_all(&self) -> Result<Vec<PayPeriod>, PaycycleError> {
        let data = self.data.read().map_err(|e| {
            PaycycleError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut periods: Vec<_> = data.values().cloned().collect();
        periods.sort_by(|a, b| {
            (a.date, a.income_source_id, a.id).cmp(&(b.date, b.income_source_id, b.id))
        });
        Ok(periods)
    }

    /// Periods dated within `[from, to]`
    pub fn get_in_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PayPeriod>, PaycycleError> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|p| from <= p.date && p.date <= to)
            .collect())
    }

    pub fn get_for_source_date(
        &self,
        source: IncomeSourceId,
        date: NaiveDate,
    ) -> Result<Option<PayPeriod>, PaycycleError> {
        let index = self.by_source_date.read().map_err(|e| {
            PaycycleError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        let Some(id) = index.get(&(source, date)).copied() else {
            return Ok(None);
        };
        drop(index);
        self.get(id)
    }

    /// Insert a period unless its source already has one on that date
    ///
    /// Returns `false` (and changes nothing) for an existing (source, date).
    pub fn insert_if_absent(&self, period: PayPeriod) -> Result<bool, PaycycleError> {
        let mut data = self.data.write().map_err(|e| {
            PaycycleError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        let mut index = self.by_source_date.write().map_err(|e| {
            PaycycleError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let key = (period.income_source_id, period.date);
        if index.contains_key(&key) {
            return Ok(false);
        }
        index.insert(key, period.id);
        data.insert(period.id, period);
        Ok(true)
    }

    pub fn count(&self) -> Result<usize, PaycycleError> {
        let data = self.data.read().map_err(|e| {
            PaycycleError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.len())
    }
}
