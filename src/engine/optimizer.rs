//! Allocation optimizer
//!
//! Greedy hill-climbing over bill placements. Each step takes the period with
//! the lowest balance and moves its largest movable bill to the period with the
//! highest balance, until the spread is under the threshold or nothing can move.
//! Results are suggestions only; the caller's assignments are never touched.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

use crate::models::{AssignmentId, Bill, BillAssignment, BillId, Money, PayPeriod, PayPeriodId};

/// Balance spread below which the optimizer stops
pub const DEFAULT_BALANCE_THRESHOLD: Money = Money::from_cents(5_000);

/// Upper bound on moves considered in one run
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

pub const MOVE_RATIONALE: &str =
    "Moved from the tightest pay period to the one with the most room";

/// Tunables for one optimizer run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizerPolicy {
    #[serde(default = "default_threshold")]
    pub balance_threshold: Money,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
}

fn default_threshold() -> Money {
    DEFAULT_BALANCE_THRESHOLD
}

fn default_max_iterations() -> u32 {
    DEFAULT_MAX_ITERATIONS
}

impl Default for OptimizerPolicy {
    fn default() -> Self {
        Self {
            balance_threshold: DEFAULT_BALANCE_THRESHOLD,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// A proposed move of one assignment between periods
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveSuggestion {
    pub assignment_id: AssignmentId,
    pub bill_id: BillId,
    pub bill_name: String,
    pub amount: Money,
    pub from_period_id: PayPeriodId,
    pub from_date: NaiveDate,
    pub to_period_id: PayPeriodId,
    pub to_date: NaiveDate,
    pub rationale: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub suggestions: Vec<MoveSuggestion>,
    pub current_min_balance: Money,
    pub optimized_min_balance: Money,
    /// Never negative
    pub improvement: Money,
}

/// Optimize with the default policy
pub fn optimize(
    bills: &[Bill],
    periods: &[PayPeriod],
    assignments: &[BillAssignment],
) -> OptimizationResult {
    optimize_with_policy(bills, periods, assignments, &OptimizerPolicy::default())
}

/// Working placement of one assignment
struct Placement<'a> {
    assignment: &'a BillAssignment,
    bill: Option<&'a Bill>,
    period: usize,
}

#[instrument(skip_all, fields(bills = bills.len(), periods = periods.len(), assignments = assignments.len()))]
pub fn optimize_with_policy(
    bills: &[Bill],
    periods: &[PayPeriod],
    assignments: &[BillAssignment],
    policy: &OptimizerPolicy,
) -> OptimizationResult {
    if periods.is_empty() {
        return OptimizationResult::default();
    }

    let period_index: HashMap<PayPeriodId, usize> =
        periods.iter().enumerate().map(|(i, p)| (p.id, i)).collect();
    let bills_by_id: HashMap<BillId, &Bill> = bills.iter().map(|b| (b.id, b)).collect();

    let mut placements: Vec<Placement<'_>> = assignments
        .iter()
        .filter_map(|assignment| {
            let period = *period_index.get(&assignment.period_id)?;
            Some(Placement {
                assignment,
                bill: bills_by_id.get(&assignment.bill_id).copied(),
                period,
            })
        })
        .collect();

    let mut balances: Vec<Money> = periods.iter().map(PayPeriod::income).collect();
    for placement in &placements {
        balances[placement.period] -= placement.assignment.planned_amount;
    }

    let current_min_balance = min_balance(&balances);
    let mut suggestions = Vec::new();

    for iteration in 0..policy.max_iterations {
        let (tight, surplus) = extremes(&balances);
        let spread = balances[surplus] - balances[tight];
        if tight == surplus || spread.is_zero() || spread < policy.balance_threshold {
            trace!("Stopping at iteration {}: spread {}", iteration, spread);
            break;
        }

        let pay_day = periods[surplus].pay_day_of_month();
        let mut best: Option<usize> = None;
        for (i, placement) in placements.iter().enumerate() {
            let Some(bill) = placement.bill else { continue };
            let amount = placement.assignment.planned_amount;
            if placement.period != tight
                || !bill.payable_from(pay_day)
                || amount > spread
                || placements
                    .iter()
                    .any(|p| p.period == surplus && p.assignment.bill_id == bill.id)
            {
                continue;
            }
            if best.map_or(true, |b| amount > placements[b].assignment.planned_amount) {
                best = Some(i);
            }
        }

        let Some(chosen) = best else {
            trace!("No movable bill in the tightest period");
            break;
        };

        let placement = &mut placements[chosen];
        let amount = placement.assignment.planned_amount;
        placement.period = surplus;
        balances[tight] += amount;
        balances[surplus] -= amount;

        let bill_name = placement.bill.map(|b| b.name.clone()).unwrap_or_default();
        debug!(
            "Suggest moving '{}' ({}) from {} to {}",
            bill_name, amount, periods[tight].date, periods[surplus].date
        );
        suggestions.push(MoveSuggestion {
            assignment_id: placement.assignment.id,
            bill_id: placement.assignment.bill_id,
            bill_name,
            amount,
            from_period_id: periods[tight].id,
            from_date: periods[tight].date,
            to_period_id: periods[surplus].id,
            to_date: periods[surplus].date,
            rationale: MOVE_RATIONALE.to_string(),
        });

        // An exact swap gains nothing and would be undone by the next step
        if amount == spread {
            break;
        }
    }

    let optimized_min_balance = min_balance(&balances);
    OptimizationResult {
        suggestions,
        current_min_balance,
        optimized_min_balance,
        improvement: optimized_min_balance - current_min_balance,
    }
}

/// Indices of the lowest and highest balance, first occurrence on ties
fn extremes(balances: &[Money]) -> (usize, usize) {
    let mut tight = 0;
    let mut surplus = 0;
    for (i, balance) in balances.iter().enumerate() {
        if *balance < balances[tight] {
            tight = i;
        }
        if *balance > balances[surplus] {
            surplus = i;
        }
    }
    (tight, surplus)
}

fn min_balance(balances: &[Money]) -> Money {
    balances.iter().copied().min().unwrap_or_default()
}
