//! Budget CLI commands
//!
//! Implements viewing and editing the household's weekly budget.

use clap::Subcommand;

use super::parse_amount;
use crate::config::Settings;
use crate::display::format_budget;
use crate::error::BudgetResult;
use crate::services::{BudgetService, CategoryService, LedgerService};
use crate::storage::Storage;

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Show the current weekly budget
    Show,
    /// Set a category's weekly amount
    Set {
        /// Category name or ID
        category: String,
        /// Weekly amount (e.g., "80" or "80.50")
        #[arg(allow_negative_numbers = true)]
        amount: String,
    },
    /// Zero any budget lines for the "Uncategorised" category
    #[command(name = "zero-uncategorised")]
    ZeroUncategorised,
}

/// Handle a budget command
pub fn handle_budget_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BudgetCommands,
) -> BudgetResult<()> {
    let household_id = settings.require_household()?;
    let service = BudgetService::new(storage);
    let category_service = CategoryService::new(storage);

    match cmd {
        BudgetCommands::Show => match service.latest_weekly(household_id)? {
            Some(budget) => {
                let categories = category_service.list(household_id)?;
                print!(
                    "{}",
                    format_budget(&budget, &categories, &settings.currency_symbol)
                );
            }
            None => println!("No weekly budget set."),
        },

        BudgetCommands::Set { category, amount } => {
            let category = category_service.find(household_id, &category)?;
            let amount = parse_amount(&amount)?;
            service.set_weekly_amount(household_id, category.id, amount)?;
            LedgerService::new(storage).recompute_current_week(household_id)?;
            println!(
                "Set {} to {}/week",
                category.name,
                amount.format_with_symbol(&settings.currency_symbol)
            );
        }

        BudgetCommands::ZeroUncategorised => {
            let zeroed = service.zero_uncategorised_lines(household_id)?;
            println!("Zeroed {} uncategorised budget line(s).", zeroed);
        }
    }

    Ok(())
}
