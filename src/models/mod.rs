//! Core data models for Hearth Budget
//!
//! This module contains the data structures of the household budgeting
//! domain: weekly budgets, categories, transactions, rules, imports, the
//! rollover ledger and the period windows that tie them together.

pub mod account;
pub mod budget;
pub mod category;
pub mod ids;
pub mod import;
pub mod ledger;
pub mod money;
pub mod period;
pub mod rule;
pub mod transaction;

pub use account::Account;
pub use budget::{Budget, BudgetLine};
pub use category::{Category, CategoryKind, UNCATEGORISED_NAME};
pub use ids::{
    AccountId, BudgetId, BudgetLineId, CategoryId, HouseholdId, ImportId, RuleId, TransactionId,
};
pub use import::{ImportRecord, ImportStatus};
pub use ledger::{LedgerKey, RolloverLedgerEntry};
pub use money::{format_amount, Money};
pub use period::{PeriodBounds, PeriodType, WeekStart};
pub use rule::{MatchType, Rule};
pub use transaction::{Direction, Transaction};
