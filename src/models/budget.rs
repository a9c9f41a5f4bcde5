//! Weekly budget model
//!
//! A household's budget is always expressed per week. Each line holds the
//! canonical weekly amount for one category; other period views scale it.
//! When several budgets exist the one with the latest `starts_on` is current.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ids::{BudgetId, BudgetLineId, CategoryId, HouseholdId};
use super::money::Money;
use super::period::PeriodType;

/// One category's weekly allowance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetLine {
    pub id: BudgetLineId,
    pub category_id: CategoryId,
    /// Weekly amount
    pub amount: Money,
}

impl BudgetLine {
    pub fn new(category_id: CategoryId, amount: Money) -> Self {
        Self {
            id: BudgetLineId::new(),
            category_id,
            amount,
        }
    }
}

/// A weekly budget for a household
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: BudgetId,
    pub household_id: HouseholdId,

    /// Always `PeriodType::Week`; kept on disk for readability
    #[serde(default)]
    pub period_type: PeriodType,

    /// First day the budget applies from
    pub starts_on: NaiveDate,

    #[serde(default)]
    pub lines: Vec<BudgetLine>,
}

impl Budget {
    /// Create an empty weekly budget
    pub fn weekly(household_id: HouseholdId, starts_on: NaiveDate) -> Self {
        Self {
            id: BudgetId::new(),
            household_id,
            period_type: PeriodType::Week,
            starts_on,
            lines: Vec::new(),
        }
    }

    /// Find the line for a category
    pub fn line_for(&self, category_id: CategoryId) -> Option<&BudgetLine> {
        self.lines.iter().find(|line| line.category_id == category_id)
    }

    /// Set the weekly amount for a category, adding a line if needed.
    ///
    /// Returns the id of the line that was updated or created.
    pub fn set_line_amount(&mut self, category_id: CategoryId, amount: Money) -> BudgetLineId {
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.category_id == category_id)
        {
            line.amount = amount;
            return line.id;
        }

        let line = BudgetLine::new(category_id, amount);
        let id = line.id;
        self.lines.push(line);
        id
    }

    /// Sum of all weekly line amounts
    pub fn total_weekly(&self) -> Money {
        self.lines.iter().map(|line| line.amount).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekly_budget() {
        let budget = Budget::weekly(
            HouseholdId::new(),
            NaiveDate::from_ymd_opt(2025, 12, 8).unwrap(),
        );
        assert_eq!(budget.period_type, PeriodType::Week);
        assert!(budget.lines.is_empty());
        assert_eq!(budget.total_weekly(), Money::zero());
    }

    #[test]
    fn test_set_line_amount_adds_then_updates() {
        let mut budget = Budget::weekly(
            HouseholdId::new(),
            NaiveDate::from_ymd_opt(2025, 12, 8).unwrap(),
        );
        let groceries = CategoryId::new();

        let first = budget.set_line_amount(groceries, Money::from_cents(20000));
        let second = budget.set_line_amount(groceries, Money::from_cents(25000));

        assert_eq!(first, second);
        assert_eq!(budget.lines.len(), 1);
        assert_eq!(
            budget.line_for(groceries).unwrap().amount,
            Money::from_cents(25000)
        );
    }

    #[test]
    fn test_total_weekly() {
        let mut budget = Budget::weekly(
            HouseholdId::new(),
            NaiveDate::from_ymd_opt(2025, 12, 8).unwrap(),
        );
        budget.set_line_amount(CategoryId::new(), Money::from_cents(10000));
        budget.set_line_amount(CategoryId::new(), Money::from_cents(5050));
        assert_eq!(budget.total_weekly(), Money::from_cents(15050));
    }
}
