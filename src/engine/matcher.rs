//! Bill auto-assignment matcher
//!
//! Computes every bill due date in a range and places each one on the pay
//! period that should cover it. Existing coverage is never disturbed: the
//! matcher only proposes new assignments, plus (when forced) the list of
//! manually moved assignments that the new ones replace.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

use super::calendar::{clamp_to_month, month_key, months_in_range, MonthKey};
use super::lattice::CyclicLattice;
use crate::models::{
    AssignmentId, Bill, BillAssignment, BillId, BillRecurrence, PayPeriod, PayPeriodId,
};

/// An assignment already on record, joined with its period's date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingAssignment {
    pub assignment_id: AssignmentId,
    pub bill_id: BillId,
    pub period_id: PayPeriodId,
    pub period_date: NaiveDate,
    pub manually_moved: bool,
}

impl ExistingAssignment {
    pub fn new(assignment: &BillAssignment, period: &PayPeriod) -> Self {
        Self {
            assignment_id: assignment.id,
            bill_id: assignment.bill_id,
            period_id: assignment.period_id,
            period_date: period.date,
            manually_moved: assignment.manually_moved,
        }
    }
}

/// Everything one matching pass looks at
#[derive(Debug, Clone, Copy)]
pub struct MatchRequest<'a> {
    pub bills: &'a [Bill],
    /// Candidate periods, already restricted to active income sources
    pub periods: &'a [PayPeriod],
    pub existing: &'a [ExistingAssignment],
    pub from: NaiveDate,
    pub to: NaiveDate,
    /// Re-match months whose only coverage was moved by hand
    pub force: bool,
}

/// A bill the matcher could not schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillFailure {
    pub bill_id: BillId,
    pub bill_name: String,
    pub reason: String,
}

/// Result of a matching pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentPlan {
    /// New assignments to persist
    pub created: Vec<BillAssignment>,
    /// Manually moved assignments displaced by a forced pass
    pub superseded: Vec<AssignmentId>,
    pub failures: Vec<BillFailure>,
}

impl AssignmentPlan {
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.superseded.is_empty()
    }
}

/// Due dates of `bill` in `[from, to]` under its parsed recurrence
///
/// Monthly bills fall on the due day clamped to each month. Cyclic bills
/// follow their anchor's lattice and keep the anchor's day of month.
pub fn due_dates(
    bill: &Bill,
    recurrence: BillRecurrence,
    from: NaiveDate,
    to: NaiveDate,
) -> Vec<NaiveDate> {
    let lattice = match recurrence {
        BillRecurrence::Monthly => {
            let due_day = bill.due_day_or_anytime();
            return months_in_range(from, to)
                .into_iter()
                .filter_map(|(year, month)| clamp_to_month(year, month, due_day))
                .filter(|date| from <= *date && *date <= to)
                .collect();
        }
        BillRecurrence::BiWeekly { anchor } => CyclicLattice::days(anchor, 14),
        BillRecurrence::Quarterly { anchor } => CyclicLattice::months(anchor, 3),
        BillRecurrence::Annual { anchor } => CyclicLattice::months(anchor, 12),
    };
    lattice.occurrences(from, to)
}

/// The latest period on or before `due`, else the earliest period in or after
/// the month of `due`. `periods` must be sorted by date.
pub fn best_period(periods: &[PayPeriod], due: NaiveDate) -> Option<&PayPeriod> {
    periods.iter().rev().find(|p| p.date <= due).or_else(|| {
        let due_month = month_key(due);
        periods.iter().find(|p| p.month() >= due_month)
    })
}

/// Run one matching pass
#[instrument(skip_all, fields(bills = request.bills.len(), periods = request.periods.len(), from = %request.from, to = %request.to, force = request.force))]
pub fn auto_assign(request: &MatchRequest<'_>) -> AssignmentPlan {
    let mut plan = AssignmentPlan::default();

    let mut candidates: Vec<PayPeriod> = request
        .periods
        .iter()
        .filter(|p| request.from <= p.date && p.date <= request.to)
        .cloned()
        .collect();
    // Stable order so equal-date periods resolve the same way on every run
    candidates.sort_by(|a, b| {
        (a.date, a.income_source_id, a.id).cmp(&(b.date, b.income_source_id, b.id))
    });

    let existing_pairs: HashSet<(BillId, PayPeriodId)> = request
        .existing
        .iter()
        .map(|e| (e.bill_id, e.period_id))
        .collect();

    let mut coverage: HashMap<(BillId, MonthKey), Vec<&ExistingAssignment>> = HashMap::new();
    for existing in request.existing {
        coverage
            .entry((existing.bill_id, month_key(existing.period_date)))
            .or_default()
            .push(existing);
    }

    let mut pending: HashMap<(BillId, PayPeriodId), usize> = HashMap::new();
    let mut superseded: HashSet<AssignmentId> = HashSet::new();

    for bill in request.bills.iter().filter(|b| b.active) {
        if bill.due_day.is_none() {
            trace!("Bill '{}' has no due day, skipping", bill.name);
            continue;
        }
        let recurrence = match bill.recurrence() {
            Ok(recurrence) => recurrence,
            Err(e) => {
                debug!("Cannot schedule bill '{}': {}", bill.name, e);
                plan.failures.push(BillFailure {
                    bill_id: bill.id,
                    bill_name: bill.name.clone(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        for due in due_dates(bill, recurrence, request.from, request.to) {
            let Some(target) = best_period(&candidates, due) else {
                trace!("No pay period can cover '{}' due {}", bill.name, due);
                continue;
            };

            if recurrence.is_monthly_family() {
                if let Some(covering) = coverage.get(&(bill.id, month_key(due))) {
                    if !request.force || covering.iter().any(|e| !e.manually_moved) {
                        trace!("'{}' already covered for {}", bill.name, due);
                        continue;
                    }
                    for moved in covering.iter().filter(|e| e.period_id != target.id) {
                        if superseded.insert(moved.assignment_id) {
                            plan.superseded.push(moved.assignment_id);
                        }
                    }
                }
            }

            let key = (bill.id, target.id);
            if existing_pairs.contains(&key) {
                continue;
            }
            match pending.get(&key) {
                // Anchored cyclic occurrences on one period pay together
                Some(&index) if recurrence != BillRecurrence::Monthly => {
                    plan.created[index].planned_amount += bill.amount()
                }
                Some(_) => trace!("'{}' already planned for {}", bill.name, target.date),
                None => {
                    pending.insert(key, plan.created.len());
                    plan.created
                        .push(BillAssignment::new(bill.id, target.id, bill.amount()));
                }
            }
        }
    }

    debug!(
        "Matched {} new assignments, {} superseded, {} bills failed",
        plan.created.len(),
        plan.superseded.len(),
        plan.failures.len()
    );
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IncomeSourceId, Money};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn periods_on(dates: &[NaiveDate]) -> Vec<PayPeriod> {
        let source = IncomeSourceId::new();
        dates
            .iter()
            .map(|d| PayPeriod::new(source, *d, Some(Money::from_dollars(2000))))
            .collect()
    }

    fn semimonthly_q1() -> Vec<PayPeriod> {
        periods_on(&[
            date(2025, 1, 1),
            date(2025, 1, 15),
            date(2025, 2, 1),
            date(2025, 2, 15),
            date(2025, 3, 1),
            date(2025, 3, 15),
        ])
    }

    /// Treat a plan's new assignments as persisted
    fn persist(
        periods: &[PayPeriod],
        existing: &mut Vec<ExistingAssignment>,
        plan: &AssignmentPlan,
    ) {
        existing.retain(|e| !plan.superseded.contains(&e.assignment_id));
        for created in &plan.created {
            let period = periods.iter().find(|p| p.id == created.period_id).unwrap();
            existing.push(ExistingAssignment::new(created, period));
        }
    }

    fn request<'a>(
        bills: &'a [Bill],
        periods: &'a [PayPeriod],
        existing: &'a [ExistingAssignment],
        force: bool,
    ) -> MatchRequest<'a> {
        MatchRequest {
            bills,
            periods,
            existing,
            from: date(2025, 1, 1),
            to: date(2025, 3, 31),
            force,
        }
    }

    #[test]
    fn test_best_period_prefers_latest_on_or_before() {
        let periods = semimonthly_q1();
        assert_eq!(best_period(&periods, date(2025, 1, 20)).unwrap().date, date(2025, 1, 15));
        assert_eq!(best_period(&periods, date(2025, 2, 1)).unwrap().date, date(2025, 2, 1));
        assert_eq!(best_period(&periods, date(2025, 3, 31)).unwrap().date, date(2025, 3, 15));
    }

    #[test]
    fn test_best_period_falls_forward_when_due_precedes_all_periods() {
        let periods = periods_on(&[date(2025, 1, 10), date(2025, 2, 10)]);
        assert_eq!(best_period(&periods, date(2025, 1, 3)).unwrap().date, date(2025, 1, 10));
        assert_eq!(best_period(&periods, date(2024, 11, 3)).unwrap().date, date(2025, 1, 10));
        assert!(best_period(&[], date(2025, 1, 3)).is_none());
    }

    #[test]
    fn test_monthly_bill_one_assignment_per_month() {
        let periods = semimonthly_q1();
        let rent = Bill::monthly("Rent", Money::from_dollars(1200), 5);
        let bills = [rent.clone()];
        let plan = auto_assign(&request(&bills, &periods, &[], false));

        let dates: Vec<NaiveDate> = plan
            .created
            .iter()
            .map(|a| periods.iter().find(|p| p.id == a.period_id).unwrap().date)
            .collect();
        assert_eq!(dates, vec![date(2025, 1, 1), date(2025, 2, 1), date(2025, 3, 1)]);
        assert!(plan
            .created
            .iter()
            .all(|a| a.bill_id == rent.id && a.planned_amount == Money::from_dollars(1200)));
        assert!(plan.superseded.is_empty());
        assert!(plan.failures.is_empty());
    }

    #[test]
    fn test_due_day_clamps_to_short_month() {
        let periods = semimonthly_q1();
        let bills = [Bill::monthly("Card", Money::from_dollars(80), 31)];
        let plan = auto_assign(&request(&bills, &periods, &[], false));
        // Feb 31 clamps to Feb 28, still covered by the Feb 15 paycheck
        let feb = periods.iter().find(|p| p.date == date(2025, 2, 15)).unwrap();
        assert!(plan.created.iter().any(|a| a.period_id == feb.id));
        assert_eq!(plan.created.len(), 3);
    }

    #[test]
    fn test_second_pass_is_idempotent() {
        let periods = semimonthly_q1();
        let anchor = date(2025, 1, 10);
        let bills = [
            Bill::monthly("Rent", Money::from_dollars(1200), 5),
            Bill::monthly("Phone", Money::from_dollars(60), 22),
            Bill::cyclic("Daycare", Money::from_dollars(300), 10, "biweekly", Some(anchor)),
            Bill::cyclic("Insurance", Money::from_dollars(450), 20, "quarterly", Some(date(2024, 12, 20))),
        ];
        let mut existing = Vec::new();

        let first = auto_assign(&request(&bills, &periods, &existing, false));
        assert!(!first.created.is_empty());
        persist(&periods, &mut existing, &first);

        let second = auto_assign(&request(&bills, &periods, &existing, false));
        assert!(second.created.is_empty());
        assert!(second.superseded.is_empty());

        let forced = auto_assign(&request(&bills, &periods, &existing, true));
        assert!(forced.created.is_empty());
    }

    #[test]
    fn test_monthly_due_dates_sharing_a_period_are_not_summed() {
        // Jan 3 falls before every paycheck and Feb 3 before the Feb 15 one,
        // so both land on Jan 15
        let periods = periods_on(&[date(2025, 1, 15), date(2025, 2, 15), date(2025, 3, 15)]);
        let bills = [Bill::monthly("Rent", Money::from_dollars(1000), 3)];
        let plan = auto_assign(&request(&bills, &periods, &[], false));

        let placed: Vec<(NaiveDate, Money)> = plan
            .created
            .iter()
            .map(|a| {
                let period = periods.iter().find(|p| p.id == a.period_id).unwrap();
                (period.date, a.planned_amount)
            })
            .collect();
        assert_eq!(
            placed,
            vec![
                (date(2025, 1, 15), Money::from_dollars(1000)),
                (date(2025, 2, 15), Money::from_dollars(1000)),
            ]
        );
    }

    #[test]
    fn test_biweekly_occurrences_sharing_a_period_are_summed() {
        // One paycheck a month, biweekly bill due twice in January
        let periods = periods_on(&[date(2025, 1, 1), date(2025, 2, 1), date(2025, 3, 1)]);
        let bills = [Bill::cyclic(
            "Daycare",
            Money::from_dollars(300),
            3,
            "biweekly",
            Some(date(2025, 1, 3)),
        )];
        let plan = auto_assign(&request(&bills, &periods, &[], false));

        // Jan 3, 17, 31 -> Jan 1; Feb 14, 28 -> Feb 1; Mar 14, 28 -> Mar 1
        assert_eq!(plan.created.len(), 3);
        let amounts: Vec<Money> = plan.created.iter().map(|a| a.planned_amount).collect();
        assert_eq!(
            amounts,
            vec![
                Money::from_dollars(900),
                Money::from_dollars(600),
                Money::from_dollars(600)
            ]
        );
    }

    #[test]
    fn test_quarterly_and_annual_bills_follow_anchor() {
        let periods = semimonthly_q1();
        let bills = [
            Bill::cyclic("Water", Money::from_dollars(90), 20, "quarterly", Some(date(2024, 11, 20))),
            Bill::cyclic("Domain", Money::from_dollars(15), 3, "annual", Some(date(2023, 3, 3))),
        ];
        let plan = auto_assign(&request(&bills, &periods, &[], false));

        let placed: Vec<(BillId, NaiveDate)> = plan
            .created
            .iter()
            .map(|a| {
                let p = periods.iter().find(|p| p.id == a.period_id).unwrap();
                (a.bill_id, p.date)
            })
            .collect();
        assert_eq!(
            placed,
            vec![
                (bills[0].id, date(2025, 2, 15)),
                (bills[1].id, date(2025, 3, 1)),
            ]
        );
    }

    #[test]
    fn test_cyclic_bill_without_anchor_falls_back_to_monthly() {
        let periods = semimonthly_q1();
        let bills = [Bill::cyclic("Water", Money::from_dollars(90), 20, "quarterly", None)];
        let plan = auto_assign(&request(&bills, &periods, &[], false));
        assert_eq!(plan.created.len(), 3);
    }

    #[test]
    fn test_manually_moved_month_is_not_filled_back_in() {
        let periods = semimonthly_q1();
        let phone = Bill::monthly("Phone", Money::from_dollars(60), 22);
        let bills = [phone.clone()];

        // The user moved January's phone bill to the Jan 1 paycheck
        let jan1 = &periods[0];
        let mut moved = BillAssignment::new(phone.id, jan1.id, Money::from_dollars(60));
        moved.manually_moved = true;
        let existing = vec![ExistingAssignment::new(&moved, jan1)];

        let plan = auto_assign(&request(&bills, &periods, &existing, false));
        let jan15 = &periods[1];
        assert!(plan.created.iter().all(|a| a.period_id != jan15.id));
        assert_eq!(plan.created.len(), 2);
        assert!(plan.superseded.is_empty());
    }

    #[test]
    fn test_force_replaces_manually_moved_coverage() {
        let periods = semimonthly_q1();
        let phone = Bill::monthly("Phone", Money::from_dollars(60), 22);
        let bills = [phone.clone()];

        let jan1 = &periods[0];
        let mut moved = BillAssignment::new(phone.id, jan1.id, Money::from_dollars(60));
        moved.manually_moved = true;
        let existing = vec![ExistingAssignment::new(&moved, jan1)];

        let plan = auto_assign(&request(&bills, &periods, &existing, true));
        let jan15 = &periods[1];
        assert!(plan.created.iter().any(|a| a.period_id == jan15.id));
        assert_eq!(plan.superseded, vec![moved.id]);
    }

    #[test]
    fn test_force_keeps_automatic_coverage() {
        let periods = semimonthly_q1();
        let phone = Bill::monthly("Phone", Money::from_dollars(60), 22);
        let bills = [phone.clone()];

        // An automatic assignment on a non-default period still counts as coverage
        let jan1 = &periods[0];
        let auto = BillAssignment::new(phone.id, jan1.id, Money::from_dollars(60));
        let existing = vec![ExistingAssignment::new(&auto, jan1)];

        let plan = auto_assign(&request(&bills, &periods, &existing, true));
        assert_eq!(plan.created.len(), 2);
        assert!(plan.superseded.is_empty());
    }

    #[test]
    fn test_bad_recurrence_does_not_abort_batch() {
        let periods = semimonthly_q1();
        let broken = Bill::from_raw(
            "Broken",
            Some(Money::from_dollars(10)),
            Some(1),
            "annual",
            serde_json::json!({"anchor_date": "not-a-date"}),
        );
        let unknown = Bill::from_raw("Odd", Some(Money::from_dollars(10)), Some(1), "weekly", serde_json::Value::Null);
        let rent = Bill::monthly("Rent", Money::from_dollars(1200), 5);
        let bills = [broken.clone(), unknown.clone(), rent];

        let plan = auto_assign(&request(&bills, &periods, &[], false));
        assert_eq!(plan.created.len(), 3);
        let failed: Vec<BillId> = plan.failures.iter().map(|f| f.bill_id).collect();
        assert_eq!(failed, vec![broken.id, unknown.id]);
    }

    #[test]
    fn test_inactive_and_undated_bills_are_ignored() {
        let periods = semimonthly_q1();
        let mut inactive = Bill::monthly("Old gym", Money::from_dollars(30), 1);
        inactive.set_active(false);
        let mut undated = Bill::monthly("Whenever", Money::from_dollars(30), 1);
        undated.due_day = None;
        let bills = [inactive, undated];

        let plan = auto_assign(&request(&bills, &periods, &[], false));
        assert!(plan.created.is_empty());
        assert!(plan.failures.is_empty());
    }

    #[test]
    fn test_no_periods_creates_nothing() {
        let bills = [Bill::monthly("Rent", Money::from_dollars(1200), 5)];
        let plan = auto_assign(&request(&bills, &[], &[], false));
        assert!(plan.created.is_empty());
        assert!(plan.is_empty());
    }
}
