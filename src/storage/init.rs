//! Household seeding
//!
//! Creates the starter categories, weekly budget, accounts and rules for a
//! newly initialised household. Seeding is idempotent: existing categories
//! and accounts are matched by name and kept.

use chrono::NaiveDate;
use tracing::info;

use crate::error::BudgetError;
use crate::models::{
    Account, Budget, Category, CategoryKind, HouseholdId, MatchType, Money, Rule, WeekStart,
    UNCATEGORISED_NAME,
};

use super::Storage;

/// (name, kind, sort order, weekly amount in dollars)
const DEFAULT_CATEGORIES: &[(&str, CategoryKind, i32, i64)] = &[
    ("Income", CategoryKind::Income, 1, 2000),
    ("Groceries", CategoryKind::Expense, 10, 250),
    ("Fuel", CategoryKind::Expense, 20, 80),
    ("Eating Out", CategoryKind::Expense, 30, 60),
    ("Insurance", CategoryKind::Expense, 40, 120),
    ("Internet", CategoryKind::Expense, 50, 80),
    ("Tithe", CategoryKind::Expense, 60, 50),
    ("Savings", CategoryKind::Expense, 70, 100),
    (UNCATEGORISED_NAME, CategoryKind::Expense, 999, 0),
];

const DEFAULT_ACCOUNTS: &[(&str, &str)] = &[
    ("Bendigo Bank", "Joint Card & Bills"),
    ("Bendigo Bank", "Savings"),
];

/// (pattern, category, priority)
const DEFAULT_RULES: &[(&str, &str, i32)] = &[
    ("Woolworths", "Groceries", 10),
    ("Coles", "Groceries", 10),
    ("Ampol", "Fuel", 20),
    ("McDonalds", "Eating Out", 30),
    ("Medibank", "Insurance", 40),
    ("Launtel", "Internet", 50),
];

/// What seeding created
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub categories_created: usize,
    pub accounts_created: usize,
    pub rules_created: usize,
    pub budget_created: bool,
}

/// Seed a household with default data and persist it.
///
/// The weekly budget starts on the Monday of the week containing `today`.
/// Rules and the budget are only created when the household has none yet.
pub fn seed_household(
    storage: &Storage,
    household_id: HouseholdId,
    today: NaiveDate,
) -> Result<SeedReport, BudgetError> {
    let mut report = SeedReport::default();
    let mut seeded = Vec::with_capacity(DEFAULT_CATEGORIES.len());

    for &(name, kind, sort_order, weekly) in DEFAULT_CATEGORIES {
        let category = match storage.categories.find_by_name(household_id, name)? {
            Some(existing) => existing,
            None => {
                let category = Category::with_kind(household_id, name, kind, sort_order);
                storage.categories.upsert(category.clone())?;
                report.categories_created += 1;
                category
            }
        };
        seeded.push((category, weekly));
    }

    for &(bank_name, nickname) in DEFAULT_ACCOUNTS {
        if storage
            .accounts
            .find_by_nickname(household_id, nickname)?
            .is_none()
        {
            storage
                .accounts
                .upsert(Account::new(household_id, bank_name, nickname))?;
            report.accounts_created += 1;
        }
    }

    if storage.budgets.latest_weekly(household_id)?.is_none() {
        let mut budget = Budget::weekly(household_id, WeekStart::Monday.start_of_week(today));
        for (category, weekly) in &seeded {
            budget.set_line_amount(category.id, Money::from_dollars_cents(*weekly, 0));
        }
        storage.budgets.upsert(budget)?;
        report.budget_created = true;
    }

    if storage.rules.for_household(household_id)?.is_empty() {
        for &(pattern, category_name, priority) in DEFAULT_RULES {
            if let Some((category, _)) = seeded.iter().find(|(c, _)| c.name == category_name) {
                storage.rules.upsert(Rule::new(
                    household_id,
                    pattern,
                    MatchType::Contains,
                    category.id,
                    priority,
                ))?;
                report.rules_created += 1;
            }
        }
    }

    storage.categories.save()?;
    storage.accounts.save()?;
    storage.budgets.save()?;
    storage.rules.save()?;

    info!(
        household = %household_id,
        categories = report.categories_created,
        accounts = report.accounts_created,
        rules = report.rules_created,
        budget = report.budget_created,
        "seeded household"
    );

    Ok(report)
}
