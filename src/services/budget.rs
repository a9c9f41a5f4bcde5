//! Budget service
//!
//! Provides business logic for editing the household's weekly budget.

use chrono::{Local, NaiveDate};
use tracing::info;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{Budget, CategoryId, HouseholdId, Money, WeekStart};
use crate::storage::Storage;

/// Service for budget management
pub struct BudgetService<'a> {
    storage: &'a Storage,
}

impl<'a> BudgetService<'a> {
    /// Create a new budget service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// The household's current weekly budget
    pub fn latest_weekly(&self, household_id: HouseholdId) -> BudgetResult<Option<Budget>> {
        self.storage.budgets.latest_weekly(household_id)
    }

    /// Set a category's weekly amount on the current budget
    pub fn set_weekly_amount(
        &self,
        household_id: HouseholdId,
        category_id: CategoryId,
        amount: Money,
    ) -> BudgetResult<Budget> {
        self.set_weekly_amount_on(household_id, category_id, amount, Local::now().date_naive())
    }

    /// Set a category's weekly amount, creating the line (or a budget
    /// starting the Monday of `today`'s week) when missing
    pub fn set_weekly_amount_on(
        &self,
        household_id: HouseholdId,
        category_id: CategoryId,
        amount: Money,
        today: NaiveDate,
    ) -> BudgetResult<Budget> {
        if amount.is_negative() {
            return Err(BudgetError::Validation(format!(
                "Weekly amount cannot be negative: {}",
                amount
            )));
        }

        // Verify category exists
        let category = self
            .storage
            .categories
            .get(category_id)?
            .filter(|c| c.household_id == household_id)
            .ok_or_else(|| BudgetError::category_not_found(category_id.to_string()))?;

        let mut budget = match self.storage.budgets.latest_weekly(household_id)? {
            Some(budget) => budget,
            None => Budget::weekly(household_id, WeekStart::Monday.start_of_week(today)),
        };

        budget.set_line_amount(category_id, amount);
        self.storage.budgets.upsert(budget.clone())?;
        self.storage.budgets.save()?;

        info!(
            household = %household_id,
            category = %category.name,
            amount = %amount,
            "set weekly budget amount"
        );

        Ok(budget)
    }

    /// Zero every budget line that points at an "Uncategorised" category.
    /// Returns how many lines changed.
    pub fn zero_uncategorised_lines(&self, household_id: HouseholdId) -> BudgetResult<usize> {
        let buckets: Vec<CategoryId> = self
            .storage
            .categories
            .for_household(household_id)?
            .into_iter()
            .filter(|c| c.is_uncategorised_bucket())
            .map(|c| c.id)
            .collect();

        let mut zeroed = 0;
        for budget in self.storage.budgets.for_household(household_id)? {
            for line in &budget.lines {
                if buckets.contains(&line.category_id) && !line.amount.is_zero() {
                    self.storage
                        .budgets
                        .update_line_amount(budget.id, line.id, Money::zero())?;
                    zeroed += 1;
                }
            }
        }

        if zeroed > 0 {
            self.storage.budgets.save()?;
        }
        Ok(zeroed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::HearthPaths;
    use crate::models::{Category, CategoryKind};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = HearthPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (temp_dir, storage)
    }

    fn thursday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 11).unwrap()
    }

    #[test]
    fn test_set_amount_creates_budget_on_monday() {
        let (_temp_dir, storage) = create_test_storage();
        let household = HouseholdId::new();
        let fuel = Category::new(household, "Fuel");
        storage.categories.upsert(fuel.clone()).unwrap();
        let service = BudgetService::new(&storage);

        let budget = service
            .set_weekly_amount_on(household, fuel.id, Money::from_cents(8000), thursday())
            .unwrap();

        assert_eq!(budget.starts_on, NaiveDate::from_ymd_opt(2025, 12, 8).unwrap());
        assert_eq!(budget.line_for(fuel.id).unwrap().amount, Money::from_cents(8000));
        assert_eq!(service.latest_weekly(household).unwrap(), Some(budget));
    }

    #[test]
    fn test_set_amount_updates_existing_line() {
        let (_temp_dir, storage) = create_test_storage();
        let household = HouseholdId::new();
        let fuel = Category::new(household, "Fuel");
        let groceries = Category::new(household, "Groceries");
        storage.categories.upsert(fuel.clone()).unwrap();
        storage.categories.upsert(groceries.clone()).unwrap();
        let service = BudgetService::new(&storage);

        let first = service
            .set_weekly_amount_on(household, fuel.id, Money::from_cents(8000), thursday())
            .unwrap();
        let line_id = first.line_for(fuel.id).unwrap().id;
        service
            .set_weekly_amount_on(household, groceries.id, Money::from_cents(25000), thursday())
            .unwrap();
        let updated = service
            .set_weekly_amount_on(household, fuel.id, Money::from_cents(9000), thursday())
            .unwrap();

        assert_eq!(updated.id, first.id);
        assert_eq!(updated.lines.len(), 2);
        let line = updated.line_for(fuel.id).unwrap();
        assert_eq!(line.id, line_id);
        assert_eq!(line.amount, Money::from_cents(9000));

        let stored = service.latest_weekly(household).unwrap().unwrap();
        assert_eq!(stored.line_for(fuel.id).unwrap().amount, Money::from_cents(9000));
    }

    #[test]
    fn test_set_amount_rejects_negative_and_foreign_category() {
        let (_temp_dir, storage) = create_test_storage();
        let household = HouseholdId::new();
        let fuel = Category::new(household, "Fuel");
        storage.categories.upsert(fuel.clone()).unwrap();
        let service = BudgetService::new(&storage);

        let err = service
            .set_weekly_amount_on(household, fuel.id, Money::from_cents(-1), thursday())
            .unwrap_err();
        assert!(err.is_validation());

        let err = service
            .set_weekly_amount_on(HouseholdId::new(), fuel.id, Money::from_cents(100), thursday())
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_zero_uncategorised_lines() {
        let (_temp_dir, storage) = create_test_storage();
        let household = HouseholdId::new();
        let fuel = Category::new(household, "Fuel");
        let bucket = Category::with_kind(household, "Uncategorised", CategoryKind::Expense, 999);
        storage.categories.upsert(fuel.clone()).unwrap();
        storage.categories.upsert(bucket.clone()).unwrap();
        let service = BudgetService::new(&storage);

        service
            .set_weekly_amount_on(household, fuel.id, Money::from_cents(8000), thursday())
            .unwrap();
        service
            .set_weekly_amount_on(household, bucket.id, Money::from_cents(5000), thursday())
            .unwrap();

        assert_eq!(service.zero_uncategorised_lines(household).unwrap(), 1);
        assert_eq!(service.zero_uncategorised_lines(household).unwrap(), 0);

        let budget = service.latest_weekly(household).unwrap().unwrap();
        assert!(budget.line_for(bucket.id).unwrap().amount.is_zero());
        assert_eq!(budget.line_for(fuel.id).unwrap().amount, Money::from_cents(8000));
    }
}
