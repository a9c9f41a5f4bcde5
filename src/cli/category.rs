//! Category CLI commands

use clap::Subcommand;

use crate::config::Settings;
use crate::display::format_category_list;
use crate::error::{BudgetError, BudgetResult};
use crate::models::CategoryKind;
use crate::services::CategoryService;
use crate::storage::Storage;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List all categories
    List,
    /// Create a new category
    Add {
        /// Category name
        name: String,
        /// Category kind (expense or income)
        #[arg(short, long, default_value = "expense")]
        kind: String,
    },
}

/// Handle a category command
pub fn handle_category_command(
    storage: &Storage,
    settings: &Settings,
    cmd: CategoryCommands,
) -> BudgetResult<()> {
    let household_id = settings.require_household()?;
    let service = CategoryService::new(storage);

    match cmd {
        CategoryCommands::List => {
            let categories = service.list(household_id)?;
            print!("{}", format_category_list(&categories));
        }

        CategoryCommands::Add { name, kind } => {
            let kind: CategoryKind = kind
                .parse()
                .map_err(|e: String| BudgetError::Validation(e))?;
            let category = service.create(household_id, &name, kind)?;
            println!("Created category: {}", category.name);
            println!("  ID: {}", category.id);
        }
    }

    Ok(())
}
