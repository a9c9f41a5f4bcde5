//! Service layer for Hearth Budget
//!
//! The service layer provides business logic on top of the storage layer:
//! period scaling, rollover arithmetic, ledger recomputation, dashboards,
//! CSV import and rule-based categorisation.

pub mod account;
pub mod budget;
pub mod category;
pub mod dashboard;
pub mod import;
pub mod ledger;
pub mod rollover;
pub mod rules;
pub mod scaling;
pub mod transaction;

pub use account::AccountService;
pub use budget::BudgetService;
pub use category::CategoryService;
pub use dashboard::{
    DashboardCategory, DashboardService, DashboardSummary, DashboardTotals, TrafficLight,
};
pub use import::{ImportService, ImportSummary};
pub use ledger::{LedgerService, RecomputeReport};
pub use rollover::{calculate_rollover, RolloverInput, RolloverResult};
pub use rules::{RuleMatcher, RuleService};
pub use scaling::{weekly_to_period, weeks_in_bounds};
pub use transaction::{TransactionFilter, TransactionService};
