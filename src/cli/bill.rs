//! Bill CLI commands

use clap::Subcommand;

use super::{parse_amount, parse_date};
use crate::config::settings::Settings;
use crate::display::format_bill_list;
use crate::error::PaycycleResult;
use crate::services::BillService;
use crate::storage::Storage;

/// Bill subcommands
#[derive(Subcommand)]
pub enum BillCommands {
    /// Add a bill
    Add {
        /// Bill name
        name: String,
        /// Amount due each occurrence
        #[arg(short, long)]
        amount: Option<String>,
        /// Day of month the bill is due; 0 means any time
        #[arg(short, long)]
        due: Option<u32>,
        /// How often it recurs (monthly, biweekly, quarterly, annual)
        #[arg(short, long, default_value = "monthly")]
        kind: String,
        /// A known due date phasing a non-monthly bill (YYYY-MM-DD)
        #[arg(long)]
        anchor: Option<String>,
    },
    /// List bills
    List {
        /// Include inactive bills
        #[arg(short, long)]
        all: bool,
    },
    /// Include a bill in auto-assignment again
    Activate {
        /// Bill name or ID
        bill: String,
    },
    /// Leave a bill out of auto-assignment
    Deactivate {
        /// Bill name or ID
        bill: String,
    },
}

/// Handle a bill command
pub fn handle_bill_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BillCommands,
) -> PaycycleResult<()> {
    let service = BillService::new(storage);

    match cmd {
        BillCommands::Add {
            name,
            amount,
            due,
            kind,
            anchor,
        } => {
            let amount = amount.as_deref().map(parse_amount).transpose()?;
            let anchor = anchor
                .as_deref()
                .map(|s| parse_date(s, settings))
                .transpose()?;

            let bill = service.create(&name, amount, due, &kind, anchor)?;
            println!("Created bill: {}", bill.name);
            println!("  ID: {}", bill.id);
            println!(
                "  Amount: {}",
                bill.amount().format_with_symbol(&settings.currency_symbol)
            );
        }
        BillCommands::List { all } => {
            let bills = service.list(all)?;
            println!("{}", format_bill_list(&bills, &settings.currency_symbol));
        }
        BillCommands::Activate { bill } => {
            let bill = service.set_active(&bill, true)?;
            println!("Activated bill: {}", bill.name);
        }
        BillCommands::Deactivate { bill } => {
            let bill = service.set_active(&bill, false)?;
            println!("Deactivated bill: {}", bill.name);
        }
    }

    Ok(())
}
