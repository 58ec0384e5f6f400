//! Income source repository
//!
//! Manages loading and saving income sources to income_sources.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::PaycycleError;
use crate::models::{IncomeSource, IncomeSourceId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct IncomeSourceData {
    #[serde(default)]
    income_sources: Vec<IncomeSource>,
}

/// Repository for income source persistence
pub struct IncomeSourceRepository {
    path: PathBuf,
    data: RwLock<HashMap<IncomeSourceId, IncomeSource>>,
}

impl IncomeSourceRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load income sources from disk
    pub fn load(&self) -> Result<(), PaycycleError> {
        let file_data: IncomeSourceData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(|e| {
            PaycycleError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.clear();
        for source in file_data.income_sources {
            data.insert(source.id, source);
        }

        Ok(())
    }

    /// Save income sources to disk
    pub fn save(&self) -> Result<(), PaycycleError> {
        let income_sources = self.get_all()?;
        write_json_atomic(&self.path, &IncomeSourceData { income_sources })
    }

    pub fn get(&self, id: IncomeSourceId) -> Result<Option<IncomeSource>, PaycycleError> {
        let data = self.data.read().map_err(|e| {
            PaycycleError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.get(&id).cloned())
    }

    /// All income sources, ordered by name
    pub fn get_all(&self) -> Result<Vec<IncomeSource>, PaycycleError> {
        let data = self.data.read().map_err(|e| {
            PaycycleError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut sources: Vec<_> = data.values().cloned().collect();
        sources.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then(a.id.cmp(&b.id))
        });
        Ok(sources)
    }

    pub fn get_active(&self) -> Result<Vec<IncomeSource>, PaycycleError> {
        Ok(self.get_all()?.into_iter().filter(|s| s.active).collect())
    }

    /// Get an income source by name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> Result<Option<IncomeSource>, PaycycleError> {
        let data = self.data.read().map_err(|e| {
            PaycycleError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let name_lower = name.to_lowercase();
        Ok(data
            .values()
            .find(|s| s.name.to_lowercase() == name_lower)
            .cloned())
    }

    pub fn upsert(&self, source: IncomeSource) -> Result<(), PaycycleError> {
        let mut data = self.data.write().map_err(|e| {
            PaycycleError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.insert(source.id, source);
        Ok(())
    }

    pub fn count(&self) -> Result<usize, PaycycleError> {
        let data = self.data.read().map_err(|e| {
            PaycycleError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.len())
    }
}
