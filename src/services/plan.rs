//! Planning service
//!
//! Rebalancing suggestions, applying them, and surplus paycheck reports over
//! stored data.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use tracing::{info, warn};

use super::assignment::AssignmentService;
use crate::engine::optimizer::{optimize_with_policy, MoveSuggestion, OptimizationResult, OptimizerPolicy};
use crate::engine::surplus::{detect_surplus, SurplusReport};
use crate::error::{PaycycleError, PaycycleResult};
use crate::models::{AssignmentId, BillAssignment, IncomeSourceId, PayPeriod, PayPeriodId};
use crate::storage::Storage;

/// Service for optimization and surplus planning
pub struct PlanService<'a> {
    storage: &'a Storage,
}

impl<'a> PlanService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Suggest moves that raise the lowest period balance in `[from, to]`
    ///
    /// Only periods of active income sources take part. Nothing is changed.
    pub fn optimize(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        policy: &OptimizerPolicy,
    ) -> PaycycleResult<OptimizationResult> {
        let active_sources: HashSet<IncomeSourceId> = self
            .storage
            .income_sources
            .get_active()?
            .into_iter()
            .map(|s| s.id)
            .collect();
        let periods: Vec<PayPeriod> = self
            .storage
            .periods
            .get_in_range(from, to)?
            .into_iter()
            .filter(|p| active_sources.contains(&p.income_source_id))
            .collect();
        let period_ids: HashSet<PayPeriodId> = periods.iter().map(|p| p.id).collect();
        let assignments: Vec<BillAssignment> = self
            .storage
            .assignments
            .get_all()?
            .into_iter()
            .filter(|a| period_ids.contains(&a.period_id))
            .collect();
        let bills = self.storage.bills.get_all()?;

        Ok(optimize_with_policy(&bills, &periods, &assignments, policy))
    }

    /// Apply suggestions in order, saving each move as it is made
    ///
    /// A relocated assignment gets a new id, so later suggestions that move the
    /// same assignment again are followed through to it. The first move that
    /// cannot be applied stops the run with its error. Moves already applied
    /// stay applied.
    pub fn apply_suggestions(
        &self,
        suggestions: &[MoveSuggestion],
    ) -> PaycycleResult<Vec<BillAssignment>> {
        let assignments = AssignmentService::new(self.storage);
        let mut applied = Vec::with_capacity(suggestions.len());
        let mut relocated: HashMap<AssignmentId, AssignmentId> = HashMap::new();

        for (index, suggestion) in suggestions.iter().enumerate() {
            let current_id = relocated
                .get(&suggestion.assignment_id)
                .copied()
                .unwrap_or(suggestion.assignment_id);
            let result = self
                .storage
                .assignments
                .get(current_id)?
                .ok_or_else(|| PaycycleError::assignment_not_found(current_id.to_string()))
                .and_then(|current| {
                    if current.period_id != suggestion.from_period_id {
                        return Err(PaycycleError::Validation(format!(
                            "Assignment {} is no longer in period {}",
                            current.id, suggestion.from_period_id
                        )));
                    }
                    assignments.relocate(&current, suggestion.to_period_id)
                });

            match result {
                Ok(moved) => {
                    relocated.insert(suggestion.assignment_id, moved.id);
                    applied.push(moved);
                }
                Err(e) => {
                    warn!(
                        "Stopping after {} of {} moves: {}",
                        index,
                        suggestions.len(),
                        e
                    );
                    return Err(e);
                }
            }
        }

        info!("Applied {} suggested moves", applied.len());
        Ok(applied)
    }

    /// Surplus paycheck months for active income sources in `[from, to]`
    pub fn detect_surplus(&self, from: NaiveDate, to: NaiveDate) -> PaycycleResult<SurplusReport> {
        let sources = self.storage.income_sources.get_active()?;
        Ok(detect_surplus(&sources, from, to))
    }
}
