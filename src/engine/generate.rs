//! Recurrence date generator
//!
//! Turns a pay schedule and an inclusive date range into the ordered list of
//! paydays inside it.

use chrono::{Datelike, Days, NaiveDate};
use serde_json::Value;
use tracing::{instrument, trace};

use super::calendar::{back_to_friday, clamp_to_month, months_in_range};
use super::lattice::CyclicLattice;
use crate::error::PaycycleResult;
use crate::models::PaySchedule;

/// Parse `kind` and `detail`, then generate paydays in `[from, to]`
///
/// Unknown kinds and bad payloads are errors even for an empty range; an
/// inverted range itself is never an error.
pub fn generate(
    kind: &str,
    detail: &Value,
    from: NaiveDate,
    to: NaiveDate,
) -> PaycycleResult<Vec<NaiveDate>> {
    let schedule = PaySchedule::parse(kind, detail)?;
    Ok(occurrences(&schedule, from, to))
}

/// Paydays of an already-parsed schedule in `[from, to]`, strictly increasing
#[instrument(level = "trace", skip_all, fields(kind = schedule.kind(), from = %from, to = %to))]
pub fn occurrences(schedule: &PaySchedule, from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
    if from > to {
        return Vec::new();
    }

    let dates = match *schedule {
        PaySchedule::Weekly { weekday } => {
            let offset = (7 + weekday.num_days_from_monday()
                - from.weekday().num_days_from_monday())
                % 7;
            match from.checked_add_days(Days::new(u64::from(offset))) {
                Some(first) => CyclicLattice::days(first, 7).occurrences(from, to),
                None => Vec::new(),
            }
        }
        PaySchedule::BiWeekly { anchor, .. } => {
            CyclicLattice::days(anchor, 14).occurrences(from, to)
        }
        PaySchedule::SemiMonthly {
            days,
            adjust_for_weekends,
        } => semimonthly(days, adjust_for_weekends, from, to),
        PaySchedule::OneTime { date } => {
            if from <= date && date <= to {
                vec![date]
            } else {
                Vec::new()
            }
        }
    };

    trace!("Generated {} {} paydays", dates.len(), schedule.kind());
    dates
}

fn semimonthly(
    days: [u32; 2],
    adjust_for_weekends: bool,
    from: NaiveDate,
    to: NaiveDate,
) -> Vec<NaiveDate> {
    let mut dates: Vec<NaiveDate> = months_in_range(from, to)
        .into_iter()
        .flat_map(|(year, month)| {
            days.into_iter()
                .filter_map(move |day| clamp_to_month(year, month, day))
        })
        .map(|date| {
            if adjust_for_weekends {
                back_to_friday(date)
            } else {
                date
            }
        })
        .filter(|date| from <= *date && *date <= to)
        .collect();

    dates.sort();
    dates.dedup();
    dates
}
