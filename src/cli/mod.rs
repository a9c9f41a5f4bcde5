//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod account;
pub mod budget;
pub mod category;
pub mod dashboard;
pub mod import;
pub mod init;
pub mod ledger;
pub mod rule;
pub mod transaction;

pub use account::{handle_account_command, AccountCommands};
pub use budget::{handle_budget_command, BudgetCommands};
pub use category::{handle_category_command, CategoryCommands};
pub use dashboard::handle_dashboard_command;
pub use import::handle_import_command;
pub use init::{handle_config_command, handle_init_command};
pub use ledger::{handle_ledger_command, LedgerCommands};
pub use rule::{handle_rule_command, RuleCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};

use crate::error::{BudgetError, BudgetResult};
use crate::models::Money;

/// Parse a user-typed dollar amount such as "80", "80.50" or "$1,200"
pub(crate) fn parse_amount(input: &str) -> BudgetResult<Money> {
    let cleaned: String = input.chars().filter(|c| *c != '$' && *c != ',').collect();
    Money::parse(&cleaned)
        .map_err(|e| BudgetError::Validation(format!("Invalid amount '{}': {}", input, e)))
}
