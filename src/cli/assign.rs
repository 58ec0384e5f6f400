//! Bill assignment CLI commands

use clap::Subcommand;

use super::RangeArgs;
use crate::config::settings::Settings;
use crate::display::{format_assignment_list, format_auto_assign_report};
use crate::error::{PaycycleError, PaycycleResult};
use crate::models::AssignmentStatus;
use crate::services::AssignmentService;
use crate::storage::Storage;

/// Assignment subcommands
#[derive(Subcommand)]
pub enum AssignCommands {
    /// Place every due bill on the paycheck that should cover it
    Auto {
        #[command(flatten)]
        range: RangeArgs,
        /// Re-place bills whose month is covered only by manual moves
        #[arg(long)]
        force: bool,
    },
    /// List assignments by period
    List {
        #[command(flatten)]
        range: RangeArgs,
    },
    /// Set an assignment's status (pending, paid, deferred, uncertain, skipped)
    Status {
        /// Assignment ID
        assignment: String,
        status: String,
    },
    /// Move an assignment to another pay period
    Move {
        /// Assignment ID
        assignment: String,
        /// Target pay period ID
        period: String,
    },
}

/// Handle an assign command
pub fn handle_assign_command(
    storage: &Storage,
    settings: &Settings,
    cmd: AssignCommands,
) -> PaycycleResult<()> {
    let service = AssignmentService::new(storage);

    match cmd {
        AssignCommands::Auto { range, force } => {
            let (from, to) = range.resolve(settings)?;
            let report = service.auto_assign(from, to, force)?;
            println!("{}", format_auto_assign_report(&report));
        }
        AssignCommands::List { range } => {
            let (from, to) = range.resolve(settings)?;
            let details = service.list_detailed(from, to)?;
            println!(
                "{}",
                format_assignment_list(&details, &settings.currency_symbol)
            );
        }
        AssignCommands::Status { assignment, status } => {
            let status: AssignmentStatus = status.parse().map_err(PaycycleError::Validation)?;
            let updated = service.set_status(&assignment, status)?;
            println!("Assignment {} is now {}", updated.id, updated.status);
        }
        AssignCommands::Move { assignment, period } => {
            let moved = service.move_assignment(&assignment, &period)?;
            println!("Moved assignment to period {}", moved.period_id);
            println!("  New ID: {}", moved.id);
        }
    }

    Ok(())
}
