//! Storage layer for Hearth Budget
//!
//! Provides JSON file storage with atomic writes and automatic directory
//! creation. Each repository owns one file under the data directory.

pub mod accounts;
pub mod budget;
pub mod categories;
pub mod file_io;
pub mod imports;
pub mod init;
pub mod ledger;
pub mod rules;
pub mod transactions;

pub use accounts::AccountRepository;
pub use budget::BudgetRepository;
pub use categories::CategoryRepository;
pub use file_io::{read_json, write_json_atomic};
pub use imports::ImportRepository;
pub use init::{seed_household, SeedReport};
pub use ledger::LedgerRepository;
pub use rules::RuleRepository;
pub use transactions::TransactionRepository;

use crate::config::paths::HearthPaths;
use crate::error::BudgetError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: HearthPaths,
    pub accounts: AccountRepository,
    pub budgets: BudgetRepository,
    pub categories: CategoryRepository,
    pub transactions: TransactionRepository,
    pub ledger: LedgerRepository,
    pub rules: RuleRepository,
    pub imports: ImportRepository,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: HearthPaths) -> Result<Self, BudgetError> {
        paths.ensure_directories()?;

        Ok(Self {
            accounts: AccountRepository::new(paths.accounts_file()),
            budgets: BudgetRepository::new(paths.budgets_file()),
            categories: CategoryRepository::new(paths.categories_file()),
            transactions: TransactionRepository::new(paths.transactions_file()),
            ledger: LedgerRepository::new(paths.ledger_file()),
            rules: RuleRepository::new(paths.rules_file()),
            imports: ImportRepository::new(paths.imports_file()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &HearthPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&self) -> Result<(), BudgetError> {
        self.accounts.load()?;
        self.budgets.load()?;
        self.categories.load()?;
        self.transactions.load()?;
        self.ledger.load()?;
        self.rules.load()?;
        self.imports.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), BudgetError> {
        self.accounts.save()?;
        self.budgets.save()?;
        self.categories.save()?;
        self.transactions.save()?;
        self.ledger.save()?;
        self.rules.save()?;
        self.imports.save()?;
        Ok(())
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }
}
