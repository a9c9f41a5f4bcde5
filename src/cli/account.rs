//! Account CLI commands

use clap::Subcommand;

use crate::config::Settings;
use crate::display::format_account_list;
use crate::error::BudgetResult;
use crate::services::AccountService;
use crate::storage::Storage;

/// Account subcommands
#[derive(Subcommand)]
pub enum AccountCommands {
    /// List all accounts
    List,
    /// Add an account
    Add {
        /// Household's name for the account
        nickname: String,
        /// Bank name
        #[arg(short, long)]
        bank: String,
    },
}

/// Handle an account command
pub fn handle_account_command(
    storage: &Storage,
    settings: &Settings,
    cmd: AccountCommands,
) -> BudgetResult<()> {
    let household_id = settings.require_household()?;
    let service = AccountService::new(storage);

    match cmd {
        AccountCommands::List => {
            let accounts = service.list(household_id)?;
            print!("{}", format_account_list(&accounts));
        }

        AccountCommands::Add { nickname, bank } => {
            let account = service.create(household_id, &bank, &nickname)?;
            println!("Created account: {}", account);
            println!("  ID: {}", account.id);
        }
    }

    Ok(())
}
