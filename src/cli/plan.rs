//! Planning CLI commands: optimize, surplus and the audit trail

use super::RangeArgs;
use crate::config::settings::Settings;
use crate::display::{format_optimization, format_surplus_report};
use crate::error::PaycycleResult;
use crate::services::PlanService;
use crate::storage::Storage;

/// Suggest bill moves that lift the leanest paycheck, applying them on request
pub fn handle_optimize_command(
    storage: &Storage,
    settings: &Settings,
    range: &RangeArgs,
    apply: bool,
) -> PaycycleResult<()> {
    let (from, to) = range.resolve(settings)?;
    let service = PlanService::new(storage);
    let result = service.optimize(from, to, &settings.optimizer)?;

    println!(
        "{}",
        format_optimization(&result, &settings.currency_symbol)
    );

    if apply && !result.suggestions.is_empty() {
        let applied = service.apply_suggestions(&result.suggestions)?;
        println!();
        println!("Applied {} move(s).", applied.len());
    } else if !result.suggestions.is_empty() {
        println!();
        println!("Run with --apply to make these moves.");
    }

    Ok(())
}

/// Show months with an extra paycheck
pub fn handle_surplus_command(
    storage: &Storage,
    settings: &Settings,
    range: &RangeArgs,
) -> PaycycleResult<()> {
    let (from, to) = range.resolve(settings)?;
    let report = PlanService::new(storage).detect_surplus(from, to)?;
    println!(
        "{}",
        format_surplus_report(&report, &settings.currency_symbol)
    );
    Ok(())
}

/// Print the most recent audit entries, oldest first
pub fn handle_audit_command(storage: &Storage, limit: usize) -> PaycycleResult<()> {
    let entries = storage.audit().read_recent(limit)?;
    if entries.is_empty() {
        println!("No audit entries.");
        return Ok(());
    }
    for entry in &entries {
        println!("{}", entry.format_human_readable());
    }
    Ok(())
}
