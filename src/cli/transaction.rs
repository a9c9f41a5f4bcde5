//! Transaction CLI commands
//!
//! Listing imported transactions and changing their categories.

use std::collections::HashMap;

use clap::Subcommand;

use crate::config::Settings;
use crate::display::format_transaction_list;
use crate::error::BudgetResult;
use crate::services::{CategoryService, TransactionFilter, TransactionService};
use crate::storage::Storage;

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// List transactions, newest first
    List {
        /// Only show transactions without a category
        #[arg(short, long)]
        uncategorised: bool,
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// Set or clear a transaction's category
    Categorise {
        /// Transaction ID
        transaction: String,
        /// Category name or ID (omit to clear)
        category: Option<String>,
    },
    /// Apply rules to uncategorised transactions
    #[command(name = "auto-categorise")]
    AutoCategorise,
    /// Re-apply rules to every transaction
    Recategorise,
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &Storage,
    settings: &Settings,
    cmd: TransactionCommands,
) -> BudgetResult<()> {
    let household_id = settings.require_household()?;
    let service = TransactionService::new(storage);
    let category_service = CategoryService::new(storage);

    match cmd {
        TransactionCommands::List {
            uncategorised,
            limit,
        } => {
            let mut filter = TransactionFilter::new().limit(limit);
            if uncategorised {
                filter = filter.uncategorised();
            }
            let transactions = service.list(household_id, filter)?;
            let names: HashMap<_, _> = category_service
                .list(household_id)?
                .into_iter()
                .map(|c| (c.id, c.name))
                .collect();
            print!(
                "{}",
                format_transaction_list(
                    &transactions,
                    &names,
                    &settings.currency_symbol,
                    &settings.date_format
                )
            );
        }

        TransactionCommands::Categorise {
            transaction,
            category,
        } => {
            let txn = service.find(household_id, &transaction)?;
            let category = category
                .map(|reference| category_service.find(household_id, &reference))
                .transpose()?;
            service.set_category(household_id, txn.id, category.as_ref().map(|c| c.id))?;
            match category {
                Some(category) => println!("Categorised {} as {}", txn.id, category.name),
                None => println!("Cleared category of {}", txn.id),
            }
        }

        TransactionCommands::AutoCategorise => {
            let updated = service.auto_categorise(household_id)?;
            println!("Auto-categorised {} transaction(s).", updated);
        }

        TransactionCommands::Recategorise => {
            let updated = service.recategorise_all(household_id)?;
            println!("Re-categorised {} transaction(s).", updated);
        }
    }

    Ok(())
}
