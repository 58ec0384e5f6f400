//! Income source CLI commands

use clap::Subcommand;
use serde_json::{json, Map, Value};

use super::{parse_amount, RangeArgs};
use crate::config::settings::Settings;
use crate::display::{format_income_list, format_pay_dates};
use crate::error::{PaycycleError, PaycycleResult};
use crate::services::IncomeSourceService;
use crate::storage::Storage;

/// Income subcommands
#[derive(Subcommand)]
pub enum IncomeCommands {
    /// Add an income source
    Add {
        /// Source name
        name: String,
        /// Schedule kind (weekly, biweekly, semimonthly, one_time)
        #[arg(short, long)]
        kind: String,
        /// Payday weekday, 0 = Monday through 6 = Sunday
        #[arg(short, long)]
        weekday: Option<u8>,
        /// A known payday phasing a biweekly schedule (YYYY-MM-DD)
        #[arg(long)]
        anchor: Option<String>,
        /// The two semimonthly paydays, e.g. "1,15"
        #[arg(long, value_delimiter = ',')]
        days: Vec<u32>,
        /// Move semimonthly paydays that land on a weekend back to Friday
        #[arg(long)]
        adjust_for_weekends: bool,
        /// Date of a one-time payment (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
        /// Usual paycheck amount (e.g., "2000" or "2000.00")
        #[arg(short, long)]
        amount: Option<String>,
        /// Raw schedule detail JSON, used instead of the flags above
        #[arg(long, conflicts_with_all = ["weekday", "anchor", "days", "date"])]
        detail: Option<String>,
    },
    /// List income sources
    List {
        /// Include inactive sources
        #[arg(short, long)]
        all: bool,
    },
    /// Resume generating periods for a source
    Activate {
        /// Source name or ID
        source: String,
    },
    /// Stop generating periods for a source
    Deactivate {
        /// Source name or ID
        source: String,
    },
    /// Preview the paydays a source produces
    Dates {
        /// Source name or ID
        source: String,
        #[command(flatten)]
        range: RangeArgs,
    },
}

/// Handle an income command
pub fn handle_income_command(
    storage: &Storage,
    settings: &Settings,
    cmd: IncomeCommands,
) -> PaycycleResult<()> {
    let service = IncomeSourceService::new(storage);

    match cmd {
        IncomeCommands::Add {
            name,
            kind,
            weekday,
            anchor,
            days,
            adjust_for_weekends,
            date,
            amount,
            detail,
        } => {
            let detail = match detail {
                Some(raw) => serde_json::from_str(&raw).map_err(|e| {
                    PaycycleError::Validation(format!("Invalid schedule detail JSON: {}", e))
                })?,
                None => detail_from_flags(weekday, anchor, days, adjust_for_weekends, date),
            };
            let amount = amount.as_deref().map(parse_amount).transpose()?;

            let source = service.create(&name, &kind, &detail, amount)?;
            println!("Created income source: {}", source.name);
            println!("  ID: {}", source.id);
            if let Ok(schedule) = source.schedule() {
                println!("  Schedule: {}", schedule);
            }
        }
        IncomeCommands::List { all } => {
            let sources = service.list(all)?;
            println!("{}", format_income_list(&sources, &settings.currency_symbol));
        }
        IncomeCommands::Activate { source } => {
            let source = service.set_active(&source, true)?;
            println!("Activated income source: {}", source.name);
        }
        IncomeCommands::Deactivate { source } => {
            let source = service.set_active(&source, false)?;
            println!("Deactivated income source: {}", source.name);
        }
        IncomeCommands::Dates { source, range } => {
            let (from, to) = range.resolve(settings)?;
            let dates = service.preview_dates(&source, from, to)?;
            println!("{}", format_pay_dates(&dates));
        }
    }

    Ok(())
}

/// Schedule detail from whichever flags were given; the schedule parser
/// reports what its kind is missing
fn detail_from_flags(
    weekday: Option<u8>,
    anchor: Option<String>,
    days: Vec<u32>,
    adjust_for_weekends: bool,
    date: Option<String>,
) -> Value {
    let mut detail = Map::new();
    if let Some(weekday) = weekday {
        detail.insert("weekday".into(), json!(weekday));
    }
    if let Some(anchor) = anchor {
        detail.insert("anchor_date".into(), json!(anchor));
    }
    if !days.is_empty() {
        detail.insert("days".into(), json!(days));
    }
    if adjust_for_weekends {
        detail.insert("adjust_for_weekends".into(), json!(true));
    }
    if let Some(date) = date {
        detail.insert("date".into(), json!(date));
    }
    Value::Object(detail)
}
