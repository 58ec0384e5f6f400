//! CLI commands for data export

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::Subcommand;

use crate::error::{PaycycleError, PaycycleResult};
use crate::export::{export_full_json, export_full_yaml, export_plan_csv};
use crate::storage::Storage;

/// Export subcommands; without an output path the export goes to stdout
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export the bill plan, one row per assignment
    Csv {
        /// Output file path
        output: Option<PathBuf>,
    },
    /// Export everything as JSON
    Json {
        /// Output file path
        output: Option<PathBuf>,
        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },
    /// Export everything as YAML
    Yaml {
        /// Output file path
        output: Option<PathBuf>,
    },
}

/// Handle export commands
pub fn handle_export_command(storage: &Storage, cmd: ExportCommands) -> PaycycleResult<()> {
    match cmd {
        ExportCommands::Csv { output } => {
            let mut writer = open_output(output.as_ref())?;
            let rows = export_plan_csv(storage, &mut writer)?;
            finish(writer, output.as_ref(), &format!("{} assignment(s)", rows))
        }
        ExportCommands::Json { output, pretty } => {
            let mut writer = open_output(output.as_ref())?;
            export_full_json(storage, &mut writer, pretty)?;
            finish(writer, output.as_ref(), "full data set")
        }
        ExportCommands::Yaml { output } => {
            let mut writer = open_output(output.as_ref())?;
            export_full_yaml(storage, &mut writer)?;
            finish(writer, output.as_ref(), "full data set")
        }
    }
}

fn open_output(output: Option<&PathBuf>) -> PaycycleResult<Box<dyn Write>> {
    match output {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                PaycycleError::Export(format!("Failed to create file {}: {}", path.display(), e))
            })?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(std::io::stdout().lock())),
    }
}

fn finish(mut writer: Box<dyn Write>, output: Option<&PathBuf>, what: &str) -> PaycycleResult<()> {
    writer.flush()?;
    if let Some(path) = output {
        println!("Exported {} to {}", what, path.display());
    }
    Ok(())
}
