//! Cyclic date lattice
//!
//! A lattice is every date `anchor + k * step` for integer `k`, negative
//! included. Biweekly paychecks and biweekly/quarterly/annual bills are all
//! lattices; this is the one place that locates the first point of a range.

use chrono::{Datelike, Days, Months, NaiveDate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Days(u32),
    Months(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CyclicLattice {
    anchor: NaiveDate,
    step: Step,
}

impl CyclicLattice {
    pub fn days(anchor: NaiveDate, days: u32) -> Self {
        Self {
            anchor,
            step: Step::Days(days.max(1)),
        }
    }

    pub fn months(anchor: NaiveDate, months: u32) -> Self {
        Self {
            anchor,
            step: Step::Months(months.max(1)),
        }
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    /// The `index`-th point; month steps clamp the anchor's day to short months
    pub fn point(&self, index: i64) -> Option<NaiveDate> {
        let stride = match self.step {
            Step::Days(n) | Step::Months(n) => i64::from(n),
        };
        let magnitude = index.checked_mul(stride)?.unsigned_abs();

        match (self.step, index >= 0) {
            (Step::Days(_), true) => self.anchor.checked_add_days(Days::new(magnitude)),
            (Step::Days(_), false) => self.anchor.checked_sub_days(Days::new(magnitude)),
            (Step::Months(_), true) => self
                .anchor
                .checked_add_months(Months::new(u32::try_from(magnitude).ok()?)),
            (Step::Months(_), false) => self
                .anchor
                .checked_sub_months(Months::new(u32::try_from(magnitude).ok()?)),
        }
    }

    /// Index of the lattice point at or immediately before `date`
    ///
    /// Uses floor division so dates before the anchor land on the earlier point.
    pub fn floor_index(&self, date: NaiveDate) -> i64 {
        let mut index = match self.step {
            Step::Days(n) => (date - self.anchor).num_days().div_euclid(i64::from(n)),
            Step::Months(n) => {
                let elapsed = i64::from(date.year() - self.anchor.year()) * 12
                    + i64::from(date.month0())
                    - i64::from(self.anchor.month0());
                elapsed.div_euclid(i64::from(n))
            }
        };
        // A month step can overshoot within the month when the anchor's day is later
        while self.point(index).is_some_and(|p| p > date) {
            index -= 1;
        }
        index
    }

    /// All lattice points in `[from, to]`, ascending
    pub fn occurrences(&self, from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
        let mut dates = Vec::new();
        if from > to {
            return dates;
        }

        let mut index = self.floor_index(from);
        while let Some(point) = self.point(index) {
            if point > to {
                break;
            }
            if point >= from {
                dates.push(point);
            }
            index += 1;
        }
        dates
    }
}
