//! Category repository for JSON storage
//!
//! Manages loading and saving categories to categories.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::BudgetError;
use crate::models::{Category, CategoryId, HouseholdId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct CategoryData {
    #[serde(default)]
    categories: Vec<Category>,
}

/// Repository for category persistence
pub struct CategoryRepository {
    path: PathBuf,
    categories: RwLock<HashMap<CategoryId, Category>>,
}

impl CategoryRepository {
    /// Create a new category repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            categories: RwLock::new(HashMap::new()),
        }
    }

    /// Load categories from disk
    pub fn load(&self) -> Result<(), BudgetError> {
        let file_data: CategoryData = read_json(&self.path)?;

        let mut categories = self
            .categories
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        categories.clear();
        for category in file_data.categories {
            categories.insert(category.id, category);
        }

        Ok(())
    }

    /// Save categories to disk
    pub fn save(&self) -> Result<(), BudgetError> {
        let categories = self
            .categories
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut list: Vec<_> = categories.values().cloned().collect();
        sort_for_display(&mut list);

        write_json_atomic(&self.path, &CategoryData { categories: list })
    }

    /// Get a category by ID
    pub fn get(&self, id: CategoryId) -> Result<Option<Category>, BudgetError> {
        let categories = self
            .categories
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(categories.get(&id).cloned())
    }

    /// All categories of a household in display order
    pub fn for_household(&self, household_id: HouseholdId) -> Result<Vec<Category>, BudgetError> {
        let categories = self
            .categories
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut list: Vec<_> = categories
            .values()
            .filter(|c| c.household_id == household_id)
            .cloned()
            .collect();
        sort_for_display(&mut list);
        Ok(list)
    }

    /// Find a household category by name (case-insensitive)
    pub fn find_by_name(
        &self,
        household_id: HouseholdId,
        name: &str,
    ) -> Result<Option<Category>, BudgetError> {
        let categories = self
            .categories
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let name = name.trim();
        Ok(categories
            .values()
            .find(|c| c.household_id == household_id && c.name.eq_ignore_ascii_case(name))
            .cloned())
    }

    /// Insert or update a category
    pub fn upsert(&self, category: Category) -> Result<(), BudgetError> {
        let mut categories = self
            .categories
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        categories.insert(category.id, category);
        Ok(())
    }
}

fn sort_for_display(list: &mut [Category]) {
    list.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then(a.name.cmp(&b.name)));
}
