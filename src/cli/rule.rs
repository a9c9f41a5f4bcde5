//! Rule CLI commands

use std::collections::HashMap;

use clap::Subcommand;

use crate::config::Settings;
use crate::display::format_rule_list;
use crate::error::{BudgetError, BudgetResult};
use crate::models::MatchType;
use crate::services::{CategoryService, RuleService};
use crate::storage::Storage;

/// Rule subcommands
#[derive(Subcommand)]
pub enum RuleCommands {
    /// List rules in evaluation order
    List,
    /// Add a categorisation rule
    Add {
        /// Text or regular expression to match against descriptions
        pattern: String,
        /// Category name or ID
        category: String,
        /// Match type (contains, starts_with, regex)
        #[arg(short, long, default_value = "contains")]
        match_type: String,
        /// Lower priorities run first
        #[arg(short, long, default_value = "100")]
        priority: i32,
    },
    /// Remove a rule
    Remove {
        /// Rule ID
        rule: String,
    },
}

/// Handle a rule command
pub fn handle_rule_command(
    storage: &Storage,
    settings: &Settings,
    cmd: RuleCommands,
) -> BudgetResult<()> {
    let household_id = settings.require_household()?;
    let service = RuleService::new(storage);
    let category_service = CategoryService::new(storage);

    match cmd {
        RuleCommands::List => {
            let rules = service.list(household_id)?;
            let names: HashMap<_, _> = category_service
                .list(household_id)?
                .into_iter()
                .map(|c| (c.id, c.name))
                .collect();
            print!("{}", format_rule_list(&rules, &names));
        }

        RuleCommands::Add {
            pattern,
            category,
            match_type,
            priority,
        } => {
            let match_type: MatchType = match_type
                .parse()
                .map_err(|e: String| BudgetError::Validation(e))?;
            let category = category_service.find(household_id, &category)?;
            let rule = service.add(household_id, &pattern, match_type, category.id, priority)?;
            println!(
                "Created rule {}: {} '{}' -> {}",
                rule.id, rule.match_type, rule.pattern, category.name
            );
        }

        RuleCommands::Remove { rule } => {
            let found = service.find(household_id, &rule)?;
            service.remove(household_id, found.id)?;
            println!("Removed rule {} ('{}')", found.id, found.pattern);
        }
    }

    Ok(())
}
