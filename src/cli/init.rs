//! `init` and `config` commands

use chrono::Local;

use crate::config::{HearthPaths, Settings};
use crate::error::BudgetResult;
use crate::models::HouseholdId;
use crate::storage::{seed_household, Storage};

/// Create the household (once) and seed its default data
pub fn handle_init_command(
    storage: &Storage,
    paths: &HearthPaths,
    settings: &mut Settings,
) -> BudgetResult<()> {
    println!("Initializing Hearth Budget at: {}", paths.data_dir().display());

    let household_id = match settings.household_id {
        Some(id) => id,
        None => {
            let id = HouseholdId::new();
            settings.household_id = Some(id);
            id
        }
    };
    settings.save(paths)?;

    let report = seed_household(storage, household_id, Local::now().date_naive())?;

    println!("Household: {}", household_id);
    println!("  Categories created: {}", report.categories_created);
    println!("  Accounts created:   {}", report.accounts_created);
    println!("  Rules created:      {}", report.rules_created);
    if report.budget_created {
        println!("  Weekly budget created starting this Monday");
    }
    println!();
    println!("Run 'hearth budget show' to review the weekly budget.");
    Ok(())
}

/// Print paths and settings
pub fn handle_config_command(paths: &HearthPaths, settings: &Settings) -> BudgetResult<()> {
    println!("Hearth Budget Configuration");
    println!("===========================");
    println!("Config file:     {}", paths.settings_file().display());
    println!("Data directory:  {}", paths.data_dir().display());
    println!();
    println!("Settings:");
    match settings.household_id {
        Some(id) => println!("  Household:          {}", id),
        None => println!("  Household:          (not initialised)"),
    }
    println!("  Week starts on:     {}", settings.week_starts_on);
    println!("  Default period:     {}", settings.default_period_type());
    println!("  Currency symbol:    {}", settings.currency_symbol);
    println!("  Date format:        {}", settings.date_format);
    println!("  Log level:          {}", settings.log_level);
    println!(
        "  Replay on import:   {}",
        settings.recompute_history_on_import
    );
    Ok(())
}
