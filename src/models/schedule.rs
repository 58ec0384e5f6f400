//! Typed schedule descriptors
//!
//! Income sources and bills persist their recurrence as a kind string plus a
//! JSON detail payload. This module parses those pairs into typed values and
//! turns typed values back into payloads. Parsing never falls back to a default
//! for an unknown kind or a malformed payload.

use chrono::{NaiveDate, Weekday};
use serde::Deserialize;
use serde_json::{json, Value};
use std::fmt;

use crate::error::{PaycycleError, PaycycleResult};

/// Income schedule kind names as stored
pub const WEEKLY: &str = "weekly";
pub const BIWEEKLY: &str = "biweekly";
pub const SEMIMONTHLY: &str = "semimonthly";
pub const ONE_TIME: &str = "one_time";

/// Bill recurrence kind names as stored (biweekly is shared with income)
pub const MONTHLY: &str = "monthly";
pub const QUARTERLY: &str = "quarterly";
pub const ANNUAL: &str = "annual";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// When an income source pays out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaySchedule {
    /// Every week on the given weekday
    Weekly { weekday: Weekday },
    /// Every 14 days, phased by a known payday
    BiWeekly { weekday: Weekday, anchor: NaiveDate },
    /// Two fixed days each month
    SemiMonthly {
        days: [u32; 2],
        adjust_for_weekends: bool,
    },
    /// A single payment
    OneTime { date: NaiveDate },
}

#[derive(Deserialize)]
struct WeeklyDetail {
    weekday: u8,
}

#[derive(Deserialize)]
struct BiWeeklyDetail {
    weekday: u8,
    anchor_date: String,
}

#[derive(Deserialize)]
struct SemiMonthlyDetail {
    days: Vec<u32>,
    #[serde(default)]
    adjust_for_weekends: bool,
}

#[derive(Deserialize)]
struct OneTimeDetail {
    date: String,
}

impl PaySchedule {
    /// Parse a stored kind and detail payload
    pub fn parse(kind: &str, detail: &Value) -> PaycycleResult<Self> {
        match kind {
            WEEKLY => {
                let d: WeeklyDetail = from_detail(kind, detail)?;
                Ok(Self::Weekly {
                    weekday: weekday_from_index(kind, d.weekday)?,
                })
            }
            BIWEEKLY => {
                let d: BiWeeklyDetail = from_detail(kind, detail)?;
                Ok(Self::BiWeekly {
                    weekday: weekday_from_index(kind, d.weekday)?,
                    anchor: parse_date(&d.anchor_date)?,
                })
            }
            SEMIMONTHLY => {
                let d: SemiMonthlyDetail = from_detail(kind, detail)?;
                if d.days.len() != 2 {
                    return Err(PaycycleError::InvalidDayCount(d.days.len()));
                }
                if let Some(bad) = d.days.iter().find(|day| !(1..=31).contains(*day)) {
                    return Err(PaycycleError::malformed(
                        kind,
                        format!("day {} is outside 1-31", bad),
                    ));
                }
                Ok(Self::SemiMonthly {
                    days: [d.days[0], d.days[1]],
                    adjust_for_weekends: d.adjust_for_weekends,
                })
            }
            ONE_TIME => {
                let d: OneTimeDetail = from_detail(kind, detail)?;
                Ok(Self::OneTime {
                    date: parse_date(&d.date)?,
                })
            }
            other => Err(PaycycleError::UnknownScheduleKind(other.to_string())),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Weekly { .. } => WEEKLY,
            Self::BiWeekly { .. } => BIWEEKLY,
            Self::SemiMonthly { .. } => SEMIMONTHLY,
            Self::OneTime { .. } => ONE_TIME,
        }
    }

    /// The detail payload that parses back into this schedule
    pub fn to_detail(&self) -> Value {
        match self {
            Self::Weekly { weekday } => json!({ "weekday": weekday.num_days_from_monday() }),
            Self::BiWeekly { weekday, anchor } => json!({
                "weekday": weekday.num_days_from_monday(),
                "anchor_date": anchor.format(DATE_FORMAT).to_string(),
            }),
            Self::SemiMonthly {
                days,
                adjust_for_weekends,
            } => json!({ "days": days, "adjust_for_weekends": adjust_for_weekends }),
            Self::OneTime { date } => json!({ "date": date.format(DATE_FORMAT).to_string() }),
        }
    }

    /// Paychecks a typical month holds under this schedule
    pub fn expected_per_month(&self) -> u32 {
        match self {
            Self::Weekly { .. } => 4,
            Self::BiWeekly { .. } | Self::SemiMonthly { .. } => 2,
            Self::OneTime { .. } => 1,
        }
    }
}

impl fmt::Display for PaySchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weekly { weekday } => write!(f, "Weekly on {}", weekday),
            Self::BiWeekly { weekday, anchor } => {
                write!(f, "Every other {} from {}", weekday, anchor)
            }
            Self::SemiMonthly {
                days,
                adjust_for_weekends,
            } => {
                write!(f, "Days {} and {}", days[0], days[1])?;
                if *adjust_for_weekends {
                    write!(f, " (weekends to Friday)")?;
                }
                Ok(())
            }
            Self::OneTime { date } => write!(f, "Once on {}", date),
        }
    }
}

/// How often a bill comes due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillRecurrence {
    /// Once a month on the bill's due day
    Monthly,
    BiWeekly { anchor: NaiveDate },
    Quarterly { anchor: NaiveDate },
    Annual { anchor: NaiveDate },
}

impl BillRecurrence {
    /// Parse a stored bill recurrence
    ///
    /// Cyclic kinds without an anchor (missing, null or empty) become `Monthly`.
    pub fn parse(kind: &str, detail: &Value) -> PaycycleResult<Self> {
        if kind == MONTHLY {
            return Ok(Self::Monthly);
        }
        if !matches!(kind, BIWEEKLY | QUARTERLY | ANNUAL) {
            return Err(PaycycleError::UnknownScheduleKind(kind.to_string()));
        }

        let anchor = match detail {
            Value::Null => None,
            Value::Object(map) => match map.get("anchor_date") {
                None | Some(Value::Null) => None,
                Some(Value::String(s)) if s.trim().is_empty() => None,
                Some(Value::String(s)) => Some(parse_date(s)?),
                Some(other) => {
                    return Err(PaycycleError::malformed(
                        kind,
                        format!("anchor_date must be a date string, got {}", other),
                    ))
                }
            },
            other => {
                return Err(PaycycleError::malformed(
                    kind,
                    format!("expected an object, got {}", other),
                ))
            }
        };

        Ok(match (kind, anchor) {
            (_, None) => Self::Monthly,
            (BIWEEKLY, Some(anchor)) => Self::BiWeekly { anchor },
            (QUARTERLY, Some(anchor)) => Self::Quarterly { anchor },
            (_, Some(anchor)) => Self::Annual { anchor },
        })
    }

    /// At most one occurrence per calendar month
    pub fn is_monthly_family(&self) -> bool {
        !matches!(self, Self::BiWeekly { .. })
    }

    pub fn anchor(&self) -> Option<NaiveDate> {
        match self {
            Self::Monthly => None,
            Self::BiWeekly { anchor } | Self::Quarterly { anchor } | Self::Annual { anchor } => {
                Some(*anchor)
            }
        }
    }
}

/// Detail payload for a cyclic bill anchored at `anchor`
pub fn bill_detail(anchor: Option<NaiveDate>) -> Value {
    match anchor {
        Some(anchor) => json!({ "anchor_date": anchor.format(DATE_FORMAT).to_string() }),
        None => json!({}),
    }
}

fn from_detail<T: for<'de> Deserialize<'de>>(kind: &str, detail: &Value) -> PaycycleResult<T> {
    T::deserialize(detail).map_err(|e| PaycycleError::malformed(kind, e.to_string()))
}

fn parse_date(s: &str) -> PaycycleResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| PaycycleError::InvalidAnchorDate(s.to_string()))
}

fn weekday_from_index(kind: &str, index: u8) -> PaycycleResult<Weekday> {
    match index {
        0 => Ok(Weekday::Mon),
        1 => Ok(Weekday::Tue),
        2 => Ok(Weekday::Wed),
        3 => Ok(Weekday::Thu),
        4 => Ok(Weekday::Fri),
        5 => Ok(Weekday::Sat),
        6 => Ok(Weekday::Sun),
        _ => Err(PaycycleError::malformed(
            kind,
            format!("weekday {} is outside 0 (Monday) to 6 (Sunday)", index),
        )),
    }
}
