//! Rollover ledger CLI commands

use clap::Subcommand;

use crate::config::Settings;
use crate::display::format_ledger_chain;
use crate::display::ledger::format_recompute_report;
use crate::error::BudgetResult;
use crate::services::{CategoryService, LedgerService};
use crate::storage::Storage;

/// Ledger subcommands
#[derive(Subcommand)]
pub enum LedgerCommands {
    /// Recompute the current week's rollover entries
    Recompute {
        /// Replay every week from the earliest transaction
        #[arg(long)]
        history: bool,
    },
    /// Show a category's weekly rollover chain
    Show {
        /// Category name or ID
        category: String,
    },
    /// Delete all rollover entries
    Reset,
}

/// Handle a ledger command
pub fn handle_ledger_command(
    storage: &Storage,
    settings: &Settings,
    cmd: LedgerCommands,
) -> BudgetResult<()> {
    let household_id = settings.require_household()?;
    let service = LedgerService::new(storage);

    match cmd {
        LedgerCommands::Recompute { history } => {
            let report = if history {
                service.recompute_history(household_id)?
            } else {
                service.recompute_current_week(household_id)?
            };
            println!("{}", format_recompute_report(&report));
        }

        LedgerCommands::Show { category } => {
            let category = CategoryService::new(storage).find(household_id, &category)?;
            let entries = service.entries_for_category(household_id, category.id)?;
            print!(
                "{}",
                format_ledger_chain(&category.name, &entries, &settings.currency_symbol)
            );
        }

        LedgerCommands::Reset => {
            let removed = service.reset(household_id)?;
            println!("Cleared {} rollover entries.", removed);
        }
    }

    Ok(())
}
