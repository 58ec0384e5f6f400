//! Bill service

use chrono::NaiveDate;
use tracing::info;

use crate::audit::EntityType;
use crate::error::{PaycycleError, PaycycleResult};
use crate::models::schedule::bill_detail;
use crate::models::{Bill, BillId, Money};
use crate::storage::Storage;

/// Service for bill management
pub struct BillService<'a> {
    storage: &'a Storage,
}

impl<'a> BillService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a bill
    ///
    /// `recurrence_kind` is one of monthly, biweekly, quarterly or annual; the
    /// anchor only matters for the cyclic kinds.
    pub fn create(
        &self,
        name: &str,
        default_amount: Option<Money>,
        due_day: Option<u32>,
        recurrence_kind: &str,
        anchor: Option<NaiveDate>,
    ) -> PaycycleResult<Bill> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PaycycleError::Validation("Bill name cannot be empty".into()));
        }

        if self.storage.bills.get_by_name(name)?.is_some() {
            return Err(PaycycleError::Duplicate {
                entity_type: "Bill",
                identifier: name.to_string(),
            });
        }

        let bill = Bill::from_raw(
            name,
            default_amount,
            due_day,
            recurrence_kind,
            bill_detail(anchor),
        );
        bill.validate()
            .map_err(|e| PaycycleError::Validation(e.to_string()))?;
        let recurrence = bill.recurrence()?;

        self.storage.bills.upsert(bill.clone())?;
        self.storage.bills.save()?;

        self.storage.log_create(
            EntityType::Bill,
            bill.id.to_string(),
            Some(bill.name.clone()),
            &bill,
        )?;

        info!("Created bill '{}' ({:?})", bill.name, recurrence);
        Ok(bill)
    }

    pub fn get(&self, id: BillId) -> PaycycleResult<Option<Bill>> {
        self.storage.bills.get(id)
    }

    /// Find a bill by name or ID string
    pub fn find(&self, identifier: &str) -> PaycycleResult<Option<Bill>> {
        if let Some(bill) = self.storage.bills.get_by_name(identifier)? {
            return Ok(Some(bill));
        }

        if let Ok(id) = identifier.parse::<BillId>() {
            return self.storage.bills.get(id);
        }

        Ok(self
            .storage
            .bills
            .get_all()?
            .into_iter()
            .find(|b| b.id.matches(identifier)))
    }

    pub fn list(&self, include_inactive: bool) -> PaycycleResult<Vec<Bill>> {
        if include_inactive {
            self.storage.bills.get_all()
        } else {
            self.storage.bills.get_active()
        }
    }

    /// Activate or deactivate a bill; inactive bills are not auto-assigned
    pub fn set_active(&self, identifier: &str, active: bool) -> PaycycleResult<Bill> {
        let mut bill = self
            .find(identifier)?
            .ok_or_else(|| PaycycleError::bill_not_found(identifier))?;
        if bill.active == active {
            return Ok(bill);
        }

        let before = bill.clone();
        bill.set_active(active);

        self.storage.bills.upsert(bill.clone())?;
        self.storage.bills.save()?;

        self.storage.log_update(
            EntityType::Bill,
            bill.id.to_string(),
            Some(bill.name.clone()),
            &before,
            &bill,
        )?;

        Ok(bill)
    }
}
