//! Transaction repository for JSON storage
//!
//! Manages loading and saving transactions to transactions.json. Besides the
//! id map it keeps an index of `(household, dedupe_hash)` so re-imported
//! rows can be skipped without scanning.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use chrono::NaiveDate;

use crate::error::BudgetError;
use crate::models::{HouseholdId, PeriodBounds, Transaction, TransactionId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct TransactionData {
    #[serde(default)]
    transactions: Vec<Transaction>,
}

/// Repository for transaction persistence
pub struct TransactionRepository {
    path: PathBuf,
    data: RwLock<HashMap<TransactionId, Transaction>>,
    /// Index: (household, dedupe hash) to the number of stored transactions
    /// carrying it
    hashes: RwLock<HashMap<HashKey, usize>>,
}

impl TransactionRepository {
    /// Create a new transaction repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            hashes: RwLock::new(HashMap::new()),
        }
    }

    /// Load transactions from disk and rebuild the dedupe index
    pub fn load(&self) -> Result<(), BudgetError> {
        let file_data: TransactionData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut hashes = self
            .hashes
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        hashes.clear();

        for txn in file_data.transactions {
            retain_hash(&mut hashes, &txn);
            data.insert(txn.id, txn);
        }

        Ok(())
    }

    /// Save transactions to disk, newest first
    pub fn save(&self) -> Result<(), BudgetError> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut transactions: Vec<_> = data.values().cloned().collect();
        sort_newest_first(&mut transactions);

        write_json_atomic(&self.path, &TransactionData { transactions })
    }

    /// Get a transaction by ID
    pub fn get(&self, id: TransactionId) -> Result<Option<Transaction>, BudgetError> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// All transactions of a household, newest first
    pub fn by_household(&self, household_id: HouseholdId) -> Result<Vec<Transaction>, BudgetError> {
        self.filtered(|t| t.household_id == household_id)
    }

    /// Transactions of a household dated within `[start, end]`, newest first
    pub fn by_date_range(
        &self,
        household_id: HouseholdId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Transaction>, BudgetError> {
        self.filtered(|t| t.household_id == household_id && t.date >= start && t.date <= end)
    }

    /// Transactions of a household dated inside a period window, newest first
    pub fn within(
        &self,
        household_id: HouseholdId,
        bounds: &PeriodBounds,
    ) -> Result<Vec<Transaction>, BudgetError> {
        self.filtered(|t| t.household_id == household_id && bounds.contains_date(t.date))
    }

    /// Transactions of a household without a category
    pub fn uncategorised(&self, household_id: HouseholdId) -> Result<Vec<Transaction>, BudgetError> {
        self.filtered(|t| t.household_id == household_id && t.category_id.is_none())
    }

    /// The household's oldest transaction by date
    pub fn earliest(&self, household_id: HouseholdId) -> Result<Option<Transaction>, BudgetError> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data
            .values()
            .filter(|t| t.household_id == household_id)
            .min_by_key(|t| (t.date, t.created_at))
            .cloned())
    }

    /// The household's newest transaction by date
    pub fn latest(&self, household_id: HouseholdId) -> Result<Option<Transaction>, BudgetError> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data
            .values()
            .filter(|t| t.household_id == household_id)
            .max_by_key(|t| (t.date, t.created_at))
            .cloned())
    }

    /// Whether the household already holds a transaction with this hash
    pub fn contains_hash(&self, household_id: HouseholdId, hash: &str) -> Result<bool, BudgetError> {
        let hashes = self
            .hashes
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(hashes.contains_key(&(household_id, hash.to_string())))
    }

    /// Insert a transaction unless its dedupe hash is already present for the
    /// household. Returns `false` when the row was skipped as a duplicate.
    pub fn insert_if_new(&self, txn: Transaction) -> Result<bool, BudgetError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut hashes = self
            .hashes
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        if hashes.contains_key(&(txn.household_id, txn.dedupe_hash.clone())) {
            return Ok(false);
        }

        retain_hash(&mut hashes, &txn);
        data.insert(txn.id, txn);
        Ok(true)
    }

    /// Insert or update a transaction
    pub fn upsert(&self, txn: Transaction) -> Result<(), BudgetError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut hashes = self
            .hashes
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        if let Some(old) = data.get(&txn.id) {
            release_hash(&mut hashes, old);
        }

        retain_hash(&mut hashes, &txn);
        data.insert(txn.id, txn);
        Ok(())
    }

    /// Count transactions
    pub fn count(&self) -> Result<usize, BudgetError> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }

    fn filtered<F>(&self, predicate: F) -> Result<Vec<Transaction>, BudgetError>
    where
        F: Fn(&Transaction) -> bool,
    {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut transactions: Vec<_> = data.values().filter(|t| predicate(t)).cloned().collect();
        sort_newest_first(&mut transactions);
        Ok(transactions)
    }
}

type HashKey = (HouseholdId, String);

fn retain_hash(hashes: &mut HashMap<HashKey, usize>, txn: &Transaction) {
    *hashes
        .entry((txn.household_id, txn.dedupe_hash.clone()))
        .or_insert(0) += 1;
}

fn release_hash(hashes: &mut HashMap<HashKey, usize>, txn: &Transaction) {
    let key = (txn.household_id, txn.dedupe_hash.clone());
    if let Some(count) = hashes.get_mut(&key) {
        *count -= 1;
        if *count == 0 {
            hashes.remove(&key);
        }
    }
}

fn sort_newest_first(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then(b.created_at.cmp(&a.created_at))
            .then(a.id.cmp(&b.id))
    });
}
