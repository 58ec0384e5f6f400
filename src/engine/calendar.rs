//! Calendar month helpers shared by the generator and the matcher

use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// A (year, month) pair, ordered chronologically
pub type MonthKey = (i32, u32);

pub fn month_key(date: NaiveDate) -> MonthKey {
    (date.year(), date.month())
}

pub fn is_leap_year(year: i32) -> bool {
    NaiveDate::from_ymd_opt(year, 2, 29).is_some()
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 31,
    }
}

/// `day` of the given month, clamped into 1..=last day of that month
pub fn clamp_to_month(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let day = day.clamp(1, days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Every calendar month intersecting `[from, to]`, oldest first
pub fn months_in_range(from: NaiveDate, to: NaiveDate) -> Vec<MonthKey> {
    let mut months = Vec::new();
    if from > to {
        return months;
    }

    let end = month_key(to);
    let (mut year, mut month) = month_key(from);
    while (year, month) <= end {
        months.push((year, month));
        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }
    months
}

/// Move a Saturday back to Friday and a Sunday back two days to Friday
pub fn back_to_friday(date: NaiveDate) -> NaiveDate {
    let shift = match date.weekday() {
        Weekday::Sat => 1,
        Weekday::Sun => 2,
        _ => 0,
    };
    date.checked_sub_signed(Duration::days(shift)).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2025, 1), 31);
        assert_eq!(days_in_month(2025, 4), 30);
        assert_eq!(days_in_month(2025, 2), 28);
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
    }

    #[test]
    fn test_clamp_to_month() {
        assert_eq!(clamp_to_month(2025, 4, 31), Some(date(2025, 4, 30)));
        assert_eq!(clamp_to_month(2025, 2, 29), Some(date(2025, 2, 28)));
        assert_eq!(clamp_to_month(2024, 2, 29), Some(date(2024, 2, 29)));
        assert_eq!(clamp_to_month(2025, 3, 0), Some(date(2025, 3, 1)));
    }

    #[test]
    fn test_months_in_range_crosses_year() {
        let months = months_in_range(date(2024, 11, 20), date(2025, 2, 3));
        assert_eq!(months, vec![(2024, 11), (2024, 12), (2025, 1), (2025, 2)]);
    }

    #[test]
    fn test_months_in_range_inverted_is_empty() {
        assert!(months_in_range(date(2025, 3, 1), date(2025, 2, 1)).is_empty());
    }

    #[test]
    fn test_back_to_friday() {
        // 2025-03-01 is a Saturday, 2025-03-02 a Sunday
        assert_eq!(back_to_friday(date(2025, 3, 1)), date(2025, 2, 28));
        assert_eq!(back_to_friday(date(2025, 3, 2)), date(2025, 2, 28));
        assert_eq!(back_to_friday(date(2025, 3, 3)), date(2025, 3, 3));
    }
}
