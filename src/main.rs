use anyhow::Result;
use clap::{Parser, Subcommand};

use hearth_budget::cli::{
    handle_account_command, handle_budget_command, handle_category_command,
    handle_config_command, handle_dashboard_command, handle_import_command, handle_init_command,
    handle_ledger_command, handle_rule_command, handle_transaction_command, AccountCommands,
    BudgetCommands, CategoryCommands, LedgerCommands, RuleCommands, TransactionCommands,
};
use hearth_budget::config::{HearthPaths, Settings};
use hearth_budget::logging::init_tracing;
use hearth_budget::storage::Storage;

#[derive(Parser)]
#[command(
    name = "hearth",
    version,
    about = "Household budgeting with weekly rollover",
    long_about = "Hearth imports bank CSV exports, categorises transactions with \
                  pattern rules and tracks each category's weekly budget, carrying \
                  surpluses and deficits forward from week to week."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the household with default categories, budget and rules
    Init,

    /// Show configuration
    Config,

    /// Budget-vs-actual for the current period
    Dashboard {
        /// Period type (week, fortnight, month, year)
        #[arg(short, long)]
        period: Option<String>,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rollover ledger commands
    #[command(subcommand)]
    Ledger(LedgerCommands),

    /// Weekly budget commands
    #[command(subcommand)]
    Budget(BudgetCommands),

    /// Import transactions from a bank CSV export
    Import {
        /// Path to CSV file
        file: String,
        /// Account nickname or ID
        #[arg(short, long)]
        account: Option<String>,
    },

    /// Categorisation rule commands
    #[command(subcommand)]
    Rule(RuleCommands),

    /// Transaction commands
    #[command(subcommand, alias = "transaction")]
    Txn(TransactionCommands),

    /// Category management commands
    #[command(subcommand)]
    Category(CategoryCommands),

    /// Account management commands
    #[command(subcommand)]
    Account(AccountCommands),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = HearthPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;
    init_tracing(&settings.log_level);

    // Initialize storage
    let storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Init) => handle_init_command(&storage, &paths, &mut settings)?,
        Some(Commands::Config) => handle_config_command(&paths, &settings)?,
        Some(Commands::Dashboard { period, json }) => {
            handle_dashboard_command(&storage, &settings, period.as_deref(), json)?
        }
        Some(Commands::Ledger(cmd)) => handle_ledger_command(&storage, &settings, cmd)?,
        Some(Commands::Budget(cmd)) => handle_budget_command(&storage, &settings, cmd)?,
        Some(Commands::Import { file, account }) => {
            handle_import_command(&storage, &settings, &file, account.as_deref())?
        }
        Some(Commands::Rule(cmd)) => handle_rule_command(&storage, &settings, cmd)?,
        Some(Commands::Txn(cmd)) => handle_transaction_command(&storage, &settings, cmd)?,
        Some(Commands::Category(cmd)) => handle_category_command(&storage, &settings, cmd)?,
        Some(Commands::Account(cmd)) => handle_account_command(&storage, &settings, cmd)?,
        None => {
            println!("Hearth Budget - household budgeting with weekly rollover");
            println!();
            println!("Run 'hearth --help' for usage information.");
            println!("Run 'hearth init' to set up a household.");
        }
    }

    Ok(())
}
