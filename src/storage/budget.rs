//! Weekly budget repository for JSON storage
//!
//! Manages loading and saving budgets (with their lines) to budgets.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::BudgetError;
use crate::models::{Budget, BudgetId, BudgetLineId, HouseholdId, Money, PeriodType};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct BudgetData {
    #[serde(default)]
    budgets: Vec<Budget>,
}

/// Repository for weekly budget persistence
pub struct BudgetRepository {
    path: PathBuf,
    budgets: RwLock<HashMap<BudgetId, Budget>>,
}

impl BudgetRepository {
    /// Create a new budget repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            budgets: RwLock::new(HashMap::new()),
        }
    }

    /// Load budgets from disk
    pub fn load(&self) -> Result<(), BudgetError> {
        let file_data: BudgetData = read_json(&self.path)?;

        let mut budgets = self
            .budgets
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        budgets.clear();
        for budget in file_data.budgets {
            budgets.insert(budget.id, budget);
        }

        Ok(())
    }

    /// Save budgets to disk
    pub fn save(&self) -> Result<(), BudgetError> {
        let budgets = self
            .budgets
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut list: Vec<_> = budgets.values().cloned().collect();
        list.sort_by(|a, b| a.starts_on.cmp(&b.starts_on).then(a.id.cmp(&b.id)));

        write_json_atomic(&self.path, &BudgetData { budgets: list })
    }

    /// Get a budget by ID
    pub fn get(&self, id: BudgetId) -> Result<Option<Budget>, BudgetError> {
        let budgets = self
            .budgets
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(budgets.get(&id).cloned())
    }

    /// All budgets of a household, oldest first
    pub fn for_household(&self, household_id: HouseholdId) -> Result<Vec<Budget>, BudgetError> {
        let budgets = self
            .budgets
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut list: Vec<_> = budgets
            .values()
            .filter(|b| b.household_id == household_id)
            .cloned()
            .collect();
        list.sort_by(|a, b| a.starts_on.cmp(&b.starts_on).then(a.id.cmp(&b.id)));
        Ok(list)
    }

    /// The household's weekly budget with the latest `starts_on`
    pub fn latest_weekly(&self, household_id: HouseholdId) -> Result<Option<Budget>, BudgetError> {
        Ok(self
            .for_household(household_id)?
            .into_iter()
            .filter(|b| b.period_type == PeriodType::Week)
            .last())
    }

    /// Insert or update a budget
    pub fn upsert(&self, budget: Budget) -> Result<(), BudgetError> {
        let mut budgets = self
            .budgets
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        budgets.insert(budget.id, budget);
        Ok(())
    }

    /// Change the weekly amount of one line in place
    pub fn update_line_amount(
        &self,
        budget_id: BudgetId,
        line_id: BudgetLineId,
        amount: Money,
    ) -> Result<(), BudgetError> {
        let mut budgets = self
            .budgets
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let line = budgets
            .get_mut(&budget_id)
            .and_then(|b| b.lines.iter_mut().find(|l| l.id == line_id))
            .ok_or_else(|| BudgetError::NotFound {
                entity_type: "Budget line",
                identifier: line_id.to_string(),
            })?;

        line.amount = amount;
        Ok(())
    }
}
