//! Bill assignment repository
//!
//! Manages loading and saving assignments to assignments.json. A secondary
//! index keeps (bill, period) unique.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::PaycycleError;
use crate::models::{AssignmentId, BillAssignment, BillId, PayPeriodId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct AssignmentData {
    #[serde(default)]
    assignments: Vec<BillAssignment>,
}

/// Repository for bill assignment persistence
pub struct AssignmentRepository {
    path: PathBuf,
    data: RwLock<HashMap<AssignmentId, BillAssignment>>,
    /// Index: (bill, period) -> assignment
    by_pair: RwLock<HashMap<(BillId, PayPeriodId), AssignmentId>>,
}

impl AssignmentRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_pair: RwLock::new(HashMap::new()),
        }
    }

    /// Load assignments from disk, keeping the first of any duplicate pair
    pub fn load(&self) -> Result<(), PaycycleError> {
        let file_data: AssignmentData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(|e| {
            PaycycleError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        let mut by_pair = self.by_pair.write().map_err(|e| {
            PaycycleError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.clear();
        by_pair.clear();
        for assignment in file_data.assignments {
            let key = (assignment.bill_id, assignment.period_id);
            if by_pair.contains_key(&key) {
                continue;
            }
            by_pair.insert(key, assignment.id);
            data.insert(assignment.id, assignment);
        }

        Ok(())
    }

    /// Save assignments to disk
    pub fn save(&self) -> Result<(), PaycycleError> {
        let assignments = self.get_all()?;
        write_json_atomic(&self.path, &AssignmentData { assignments })
    }

    pub fn get(&self, id: AssignmentId) -> Result<Option<BillAssignment>, PaycycleError> {
        let data = self.data.read().map_err(|e| {
            PaycycleError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.get(&id).cloned())
    }

    /// All assignments in creation order
    pub fn get_all(&self) -> Result<Vec<BillAssignment>, PaycycleError> {
        let data = self.data.read().map_err(|e| {
            PaycycleError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut assignments: Vec<_> = data.values().cloned().collect();
        assignments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(assignments)
    }

    pub fn get_by_period(&self, period_id: PayPeriodId) -> Result<Vec<BillAssignment>, PaycycleError> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|a| a.period_id == period_id)
            .collect())
    }

    /// Find an assignment by its short display ID or full UUID
    pub fn find(&self, identifier: &str) -> Result<Option<BillAssignment>, PaycycleError> {
        let data = self.data.read().map_err(|e| {
            PaycycleError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.values().find(|a| a.id.matches(identifier)).cloned())
    }

    pub fn pair_exists(&self, bill_id: BillId, period_id: PayPeriodId) -> Result<bool, PaycycleError> {
        let by_pair = self.by_pair.read().map_err(|e| {
            PaycycleError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(by_pair.contains_key(&(bill_id, period_id)))
    }

    /// Insert an assignment unless the bill is already assigned to that period
    ///
    /// Returns `false` (and changes nothing) for an existing (bill, period).
    pub fn insert_if_absent(&self, assignment: BillAssignment) -> Result<bool, PaycycleError> {
        let mut data = self.data.write().map_err(|e| {
            PaycycleError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        let mut by_pair = self.by_pair.write().map_err(|e| {
            PaycycleError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let key = (assignment.bill_id, assignment.period_id);
        if by_pair.contains_key(&key) {
            return Ok(false);
        }
        by_pair.insert(key, assignment.id);
        data.insert(assignment.id, assignment);
        Ok(true)
    }

    /// Replace an existing assignment in place (status changes)
    ///
    /// The bill and period must not change; moves go through delete and insert.
    pub fn update(&self, assignment: BillAssignment) -> Result<(), PaycycleError> {
        let mut data = self.data.write().map_err(|e| {
            PaycycleError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        match data.get(&assignment.id) {
            Some(existing)
                if existing.bill_id == assignment.bill_id
                    && existing.period_id == assignment.period_id =>
            {
                data.insert(assignment.id, assignment);
                Ok(())
            }
            Some(_) => Err(PaycycleError::Storage(format!(
                "Assignment {} cannot change bill or period in place",
                assignment.id
            ))),
            None => Err(PaycycleError::assignment_not_found(assignment.id.to_string())),
        }
    }

    /// Remove an assignment, returning it if it existed
    pub fn delete(&self, id: AssignmentId) -> Result<Option<BillAssignment>, PaycycleError> {
        let mut data = self.data.write().map_err(|e| {
            PaycycleError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        let mut by_pair = self.by_pair.write().map_err(|e| {
            PaycycleError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let removed = data.remove(&id);
        if let Some(assignment) = &removed {
            by_pair.remove(&(assignment.bill_id, assignment.period_id));
        }
        Ok(removed)
    }

    pub fn count(&self) -> Result<usize, PaycycleError> {
        let data = self.data.read().map_err(|e| {
            PaycycleError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.len())
    }
}
