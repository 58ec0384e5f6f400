//! Bill repository
//!
//! Manages loading and saving bills to bills.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::PaycycleError;
use crate::models::{Bill, BillId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct BillData {
    #[serde(default)]
    bills: Vec<Bill>,
}

/// Repository for bill persistence
pub struct BillRepository {
    path: PathBuf,
    data: RwLock<HashMap<BillId, Bill>>,
}

impl BillRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load bills from disk
    pub fn load(&self) -> Result<(), PaycycleError> {
        let file_data: BillData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(|e| {
            PaycycleError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.clear();
        for bill in file_data.bills {
            data.insert(bill.id, bill);
        }

        Ok(())
    }

    /// Save bills to disk
    pub fn save(&self) -> Result<(), PaycycleError> {
        let bills = self.get_all()?;
        write_json_atomic(&self.path, &BillData { bills })
    }

    pub fn get(&self, id: BillId) -> Result<Option<Bill>, PaycycleError> {
        let data = self.data.read().map_err(|e| {
            PaycycleError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.get(&id).cloned())
    }

    /// All bills, ordered by due day then name
    pub fn get_all(&self) -> Result<Vec<Bill>, PaycycleError> {
        let data = self.data.read().map_err(|e| {
            PaycycleError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut bills: Vec<_> = data.values().cloned().collect();
        bills.sort_by(|a, b| {
            a.due_day
                .cmp(&b.due_day)
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
                .then(a.id.cmp(&b.id))
        });
        Ok(bills)
    }

    pub fn get_active(&self) -> Result<Vec<Bill>, PaycycleError> {
        Ok(self.get_all()?.into_iter().filter(|b| b.active).collect())
    }

    /// Get a bill by name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> Result<Option<Bill>, PaycycleError> {
        let data = self.data.read().map_err(|e| {
            PaycycleError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let name_lower = name.to_lowercase();
        Ok(data
            .values()
            .find(|b| b.name.to_lowercase() == name_lower)
            .cloned())
    }

    pub fn upsert(&self, bill: Bill) -> Result<(), PaycycleError> {
        let mut data = self.data.write().map_err(|e| {
            PaycycleError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.insert(bill.id, bill);
        Ok(())
    }

    pub fn count(&self) -> Result<usize, PaycycleError> {
        let data = self.data.read().map_err(|e| {
            PaycycleError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_reload_sorted_by_due_day() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bills.json");

        let repo = BillRepository::new(path.clone());
        repo.load().unwrap();
        repo.upsert(Bill::monthly("Phone", Money::from_dollars(60), 22))
            .unwrap();
        repo.upsert(Bill::monthly("Rent", Money::from_dollars(1200), 5))
            .unwrap();
        repo.save().unwrap();

        let reloaded = BillRepository::new(path);
        reloaded.load().unwrap();
        let names: Vec<String> = reloaded
            .get_all()
            .unwrap()
            .into_iter()
            .map(|b| b.name)
            .collect();
        assert_eq!(names, vec!["Rent", "Phone"]);
    }

    #[test]
    fn test_active_filter() {
        let temp_dir = TempDir::new().unwrap();
        let repo = BillRepository::new(temp_dir.path().join("bills.json"));

        let mut gym = Bill::monthly("Gym", Money::from_dollars(40), 1);
        gym.set_active(false);
        repo.upsert(gym).unwrap();
        repo.upsert(Bill::monthly("Rent", Money::from_dollars(1200), 5))
            .unwrap();

        assert_eq!(repo.get_active().unwrap().len(), 1);
        assert!(repo.get_by_name("gym").unwrap().is_some());
    }
}
