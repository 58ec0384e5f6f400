//! CLI command handlers
//!
//! Bridges clap argument parsing with the service layer. Handlers print their
//! results and return errors to `main`.

pub mod assign;
pub mod bill;
pub mod export;
pub mod income;
pub mod period;
pub mod plan;

pub use assign::{handle_assign_command, AssignCommands};
pub use bill::{handle_bill_command, BillCommands};
pub use export::{handle_export_command, ExportCommands};
pub use income::{handle_income_command, IncomeCommands};
pub use period::{handle_period_command, PeriodCommands};
pub use plan::{handle_audit_command, handle_optimize_command, handle_surplus_command};

use chrono::{Days, Local, NaiveDate};
use clap::Args;

use crate::config::settings::Settings;
use crate::error::{PaycycleError, PaycycleResult};
use crate::models::Money;

/// Date range shared by commands that plan over a window
#[derive(Args, Debug, Clone, Default)]
pub struct RangeArgs {
    /// First day of the range (defaults to today)
    #[arg(long)]
    pub from: Option<String>,

    /// Last day of the range (defaults to the planning horizon past --from)
    #[arg(long)]
    pub to: Option<String>,
}

impl RangeArgs {
    /// Resolve against today and the configured planning horizon
    pub fn resolve(&self, settings: &Settings) -> PaycycleResult<(NaiveDate, NaiveDate)> {
        let from = match &self.from {
            Some(s) => parse_date(s, settings)?,
            None => Local::now().date_naive(),
        };
        let to = match &self.to {
            Some(s) => parse_date(s, settings)?,
            None => from
                .checked_add_days(Days::new(settings.planning_horizon_days.into()))
                .ok_or_else(|| PaycycleError::Validation("Planning horizon is too long".into()))?,
        };

        if from > to {
            return Err(PaycycleError::Validation(format!(
                "Range start {} is after its end {}",
                from, to
            )));
        }
        Ok((from, to))
    }
}

/// Parse a date in the configured format, falling back to ISO `YYYY-MM-DD`
pub fn parse_date(s: &str, settings: &Settings) -> PaycycleResult<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, &settings.date_format)
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .map_err(|_| PaycycleError::Validation(format!("Invalid date: {}", s)))
}

pub fn parse_amount(s: &str) -> PaycycleResult<Money> {
    Money::parse(s).map_err(|e| PaycycleError::Validation(format!("Invalid amount: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date_formats() {
        let mut settings = Settings::default();
        assert_eq!(parse_date("2025-01-31", &settings).unwrap(), date(2025, 1, 31));

        settings.date_format = "%m/%d/%Y".into();
        assert_eq!(parse_date("01/31/2025", &settings).unwrap(), date(2025, 1, 31));
        assert_eq!(parse_date("2025-01-31", &settings).unwrap(), date(2025, 1, 31));
        assert!(parse_date("2025-02-30", &settings).is_err());
    }

    #[test]
    fn test_range_uses_horizon() {
        let settings = Settings::default();
        let range = RangeArgs {
            from: Some("2025-01-01".into()),
            to: None,
        };
        assert_eq!(
            range.resolve(&settings).unwrap(),
            (date(2025, 1, 1), date(2025, 4, 1))
        );
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let range = RangeArgs {
            from: Some("2025-03-01".into()),
            to: Some("2025-01-01".into()),
        };
        assert!(matches!(
            range.resolve(&Settings::default()),
            Err(PaycycleError::Validation(_))
        ));
    }
}
