use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use paycycle::cli::{
    handle_assign_command, handle_audit_command, handle_bill_command, handle_export_command,
    handle_income_command, handle_optimize_command, handle_period_command,
    handle_surplus_command, RangeArgs,
};
use paycycle::config::{paths::PaycyclePaths, settings::Settings};
use paycycle::storage::Storage;

#[derive(Parser)]
#[command(
    name = "paycycle",
    author = "Kaylee Beyene",
    version,
    about = "Map paychecks against bills, keep every pay period solvent",
    long_about = "Paycycle generates your paydays from each income source's schedule, \
                  places every bill on the paycheck that should cover it, and suggests \
                  moves that keep the leanest paycheck above water."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Income source management commands
    #[command(subcommand)]
    Income(paycycle::cli::IncomeCommands),

    /// Bill management commands
    #[command(subcommand)]
    Bill(paycycle::cli::BillCommands),

    /// Pay period commands
    #[command(subcommand)]
    Period(paycycle::cli::PeriodCommands),

    /// Bill assignment commands
    #[command(subcommand)]
    Assign(paycycle::cli::AssignCommands),

    /// Suggest moves that raise the lowest period balance
    Optimize {
        #[command(flatten)]
        range: RangeArgs,
        /// Make the suggested moves
        #[arg(long)]
        apply: bool,
    },

    /// Show months with extra paychecks
    Surplus {
        #[command(flatten)]
        range: RangeArgs,
    },

    /// Export data
    #[command(subcommand)]
    Export(paycycle::cli::ExportCommands),

    /// Show recent changes
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Initialize the data directory
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let paths = PaycyclePaths::new()?;

    if let Some(Commands::Init) = cli.command {
        println!("Initializing Paycycle at: {}", paths.base_dir().display());
        let created = paycycle::storage::init::initialize_storage(&paths)?;
        if created {
            println!("Initialization complete!");
            println!();
            println!("Next steps:");
            println!("  paycycle income add Payroll --kind biweekly --weekday 4 --anchor 2025-01-03 --amount 2000");
            println!("  paycycle bill add Rent --amount 1200 --due 1");
            println!("  paycycle period generate && paycycle assign auto");
        } else {
            println!("Already initialized.");
        }
        return Ok(());
    }

    let settings = Settings::load_or_create(&paths)?;
    let storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Income(cmd)) => handle_income_command(&storage, &settings, cmd)?,
        Some(Commands::Bill(cmd)) => handle_bill_command(&storage, &settings, cmd)?,
        Some(Commands::Period(cmd)) => handle_period_command(&storage, &settings, cmd)?,
        Some(Commands::Assign(cmd)) => handle_assign_command(&storage, &settings, cmd)?,
        Some(Commands::Optimize { range, apply }) => {
            handle_optimize_command(&storage, &settings, &range, apply)?
        }
        Some(Commands::Surplus { range }) => handle_surplus_command(&storage, &settings, &range)?,
        Some(Commands::Export(cmd)) => handle_export_command(&storage, cmd)?,
        Some(Commands::Audit { limit }) => handle_audit_command(&storage, limit)?,
        Some(Commands::Config) => {
            println!("Paycycle Configuration");
            println!("======================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Data directory: {}", paths.data_dir().display());
            println!("Audit log:      {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:   {}", settings.currency_symbol);
            println!("  Date format:       {}", settings.date_format);
            println!("  Planning horizon:  {} days", settings.planning_horizon_days);
            println!(
                "  Balance threshold: {}",
                settings
                    .optimizer
                    .balance_threshold
                    .format_with_symbol(&settings.currency_symbol)
            );
            println!("  Max iterations:    {}", settings.optimizer.max_iterations);
        }
        Some(Commands::Init) => {}
        None => {
            println!("Paycycle - paychecks against bills");
            println!();
            println!("Run 'paycycle --help' for usage information.");
        }
    }

    Ok(())
}
