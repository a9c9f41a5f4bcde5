//! Rollover ledger repository for JSON storage
//!
//! Entries are keyed by [`LedgerKey`] so an upsert for the same household,
//! category, period start and period type replaces the previous values.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use chrono::NaiveDateTime;

use crate::error::BudgetError;
use crate::models::{CategoryId, HouseholdId, LedgerKey, PeriodType, RolloverLedgerEntry};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct LedgerData {
    #[serde(default)]
    entries: Vec<RolloverLedgerEntry>,
}

/// Repository for rollover ledger persistence
pub struct LedgerRepository {
    path: PathBuf,
    entries: RwLock<HashMap<LedgerKey, RolloverLedgerEntry>>,
}

impl LedgerRepository {
    /// Create a new ledger repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Load entries from disk
    pub fn load(&self) -> Result<(), BudgetError> {
        let file_data: LedgerData = read_json(&self.path)?;

        let mut entries = self
            .entries
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        entries.clear();
        for entry in file_data.entries {
            entries.insert(entry.key(), entry);
        }

        Ok(())
    }

    /// Save entries to disk in key order
    pub fn save(&self) -> Result<(), BudgetError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut list: Vec<_> = entries.values().cloned().collect();
        list.sort_by_key(|e| e.key());

        write_json_atomic(&self.path, &LedgerData { entries: list })
    }

    /// Get a single entry
    pub fn get(&self, key: &LedgerKey) -> Result<Option<RolloverLedgerEntry>, BudgetError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(entries.get(key).cloned())
    }

    /// Entries of a household for one period, keyed by category
    pub fn for_period(
        &self,
        household_id: HouseholdId,
        period_type: PeriodType,
        period_start: NaiveDateTime,
    ) -> Result<HashMap<CategoryId, RolloverLedgerEntry>, BudgetError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(entries
            .values()
            .filter(|e| {
                e.household_id == household_id
                    && e.period_type == period_type
                    && e.period_start == period_start
            })
            .map(|e| (e.category_id, e.clone()))
            .collect())
    }

    /// A category's entries, oldest period first
    pub fn for_category(
        &self,
        household_id: HouseholdId,
        category_id: CategoryId,
    ) -> Result<Vec<RolloverLedgerEntry>, BudgetError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut list: Vec<_> = entries
            .values()
            .filter(|e| e.household_id == household_id && e.category_id == category_id)
            .cloned()
            .collect();
        list.sort_by_key(|e| (e.period_type, e.period_start));
        Ok(list)
    }

    /// Insert an entry or overwrite `carry_in`/`carry_out` of the existing one
    pub fn upsert(&self, entry: RolloverLedgerEntry) -> Result<(), BudgetError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        entries
            .entry(entry.key())
            .and_modify(|existing| {
                existing.carry_in = entry.carry_in;
                existing.carry_out = entry.carry_out;
            })
            .or_insert(entry);
        Ok(())
    }

    /// Remove every entry of a household, returning how many were removed
    pub fn delete_for_household(&self, household_id: HouseholdId) -> Result<usize, BudgetError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let before = entries.len();
        entries.retain(|key, _| key.household_id != household_id);
        Ok(before - entries.len())
    }

    /// Count entries
    pub fn count(&self) -> Result<usize, BudgetError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(entries.len())
    }
}
