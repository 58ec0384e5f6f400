//! Pay period CLI commands

use clap::Subcommand;

use super::RangeArgs;
use crate::config::settings::Settings;
use crate::display::format_period_balances;
use crate::error::PaycycleResult;
use crate::services::PeriodService;
use crate::storage::Storage;

/// Period subcommands
#[derive(Subcommand)]
pub enum PeriodCommands {
    /// Create pay periods for every active income source
    Generate {
        #[command(flatten)]
        range: RangeArgs,
    },
    /// Show each period's income, assigned bills and what is left
    List {
        #[command(flatten)]
        range: RangeArgs,
    },
}

/// Handle a period command
pub fn handle_period_command(
    storage: &Storage,
    settings: &Settings,
    cmd: PeriodCommands,
) -> PaycycleResult<()> {
    let service = PeriodService::new(storage);

    match cmd {
        PeriodCommands::Generate { range } => {
            let (from, to) = range.resolve(settings)?;
            let report = service.generate_periods(from, to)?;
            println!(
                "Generated {} pay period(s) from {} to {} ({} already present)",
                report.created.len(),
                from,
                to,
                report.already_present
            );
            for failure in &report.failures {
                println!("  Skipped '{}': {}", failure.source_name, failure.reason);
            }
        }
        PeriodCommands::List { range } => {
            let (from, to) = range.resolve(settings)?;
            let balances = service.list_balances(from, to)?;
            println!(
                "{}",
                format_period_balances(&balances, &settings.currency_symbol)
            );
        }
    }

    Ok(())
}
