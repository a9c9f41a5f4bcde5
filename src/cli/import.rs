//! CLI command handler for CSV import
//!
//! Imports a bank CSV export, then brings the rollover ledger up to date.

use std::path::Path;

use crate::config::Settings;
use crate::error::{BudgetError, BudgetResult};
use crate::services::{AccountService, ImportService, LedgerService};
use crate::storage::Storage;

/// Handle the import command
pub fn handle_import_command(
    storage: &Storage,
    settings: &Settings,
    file: &str,
    account: Option<&str>,
) -> BudgetResult<()> {
    let household_id = settings.require_household()?;

    let account = account
        .map(|reference| AccountService::new(storage).find(household_id, reference))
        .transpose()?;

    let path = Path::new(file);
    if !path.exists() {
        return Err(BudgetError::Import(format!("File not found: {}", file)));
    }

    let summary = ImportService::new(storage).import_file(
        household_id,
        path,
        account.as_ref().map(|a| a.id),
    )?;

    let ledger = LedgerService::new(storage);
    let report = if settings.recompute_history_on_import {
        ledger.recompute_history(household_id)?
    } else {
        ledger.recompute_current_week(household_id)?
    };

    match &account {
        Some(account) => println!("Import Complete for '{}'", account),
        None => println!("Import Complete"),
    }
    println!("{}", "=".repeat(40));
    println!("  Rows parsed:   {}", summary.total);
    println!("  Imported:      {}", summary.imported);
    println!("  Categorised:   {}", summary.categorised);
    println!("  Duplicates:    {}", summary.duplicates);
    if !summary.errors.is_empty() {
        println!("  Errors:        {}", summary.errors.len());
        for error in &summary.errors {
            println!("    Row {}: {}", error.row_number, error.message);
        }
    }
    println!(
        "  Ledger:        {} week(s) recomputed",
        report.weeks_processed
    );

    Ok(())
}
