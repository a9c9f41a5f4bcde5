//! Category service
//!
//! Provides business logic for household categories: listing, creation with
//! validation, and lookup by name or id.

use crate::error::{BudgetError, BudgetResult};
use crate::models::{Category, CategoryKind, HouseholdId};
use crate::storage::Storage;

/// Service for category management
pub struct CategoryService<'a> {
    storage: &'a Storage,
}

impl<'a> CategoryService<'a> {
    /// Create a new category service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// List the household's categories in display order
    pub fn list(&self, household_id: HouseholdId) -> BudgetResult<Vec<Category>> {
        self.storage.categories.for_household(household_id)
    }

    /// Create a new category at the end of the display order
    pub fn create(
        &self,
        household_id: HouseholdId,
        name: &str,
        kind: CategoryKind,
    ) -> BudgetResult<Category> {
        let name = name.trim();

        // Check for duplicate name
        if self
            .storage
            .categories
            .find_by_name(household_id, name)?
            .is_some()
        {
            return Err(BudgetError::Duplicate {
                entity_type: "Category",
                identifier: name.to_string(),
            });
        }

        // The Uncategorised bucket keeps its place at the end
        let max_order = self
            .list(household_id)?
            .iter()
            .filter(|c| !c.is_uncategorised_bucket())
            .map(|c| c.sort_order)
            .max()
            .unwrap_or(-1);

        let category = Category::with_kind(household_id, name, kind, max_order + 1);
        category
            .validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;

        self.storage.categories.upsert(category.clone())?;
        self.storage.categories.save()?;

        Ok(category)
    }

    /// Find a category by name, falling back to a short or full id
    pub fn find(&self, household_id: HouseholdId, identifier: &str) -> BudgetResult<Category> {
        if let Some(category) = self.storage.categories.find_by_name(household_id, identifier)? {
            return Ok(category);
        }

        let mut matches: Vec<_> = self
            .list(household_id)?
            .into_iter()
            .filter(|c| c.id.matches_prefix(identifier))
            .collect();

        if matches.len() > 1 {
            return Err(BudgetError::Validation(format!(
                "Category reference '{}' is ambiguous",
                identifier
            )));
        }
        matches
            .pop()
            .ok_or_else(|| BudgetError::category_not_found(identifier))
    }
}
