//! Account repository for JSON storage
//!
//! Manages loading and saving accounts to accounts.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::BudgetError;
use crate::models::{Account, AccountId, HouseholdId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct AccountData {
    #[serde(default)]
    accounts: Vec<Account>,
}

/// Repository for account persistence
pub struct AccountRepository {
    path: PathBuf,
    data: RwLock<HashMap<AccountId, Account>>,
}

impl AccountRepository {
    /// Create a new account repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load accounts from disk
    pub fn load(&self) -> Result<(), BudgetError> {
        let file_data: AccountData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for account in file_data.accounts {
            data.insert(account.id, account);
        }

        Ok(())
    }

    /// Save accounts to disk
    pub fn save(&self) -> Result<(), BudgetError> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut accounts: Vec<_> = data.values().cloned().collect();
        accounts.sort_by(|a, b| a.nickname.cmp(&b.nickname));

        write_json_atomic(&self.path, &AccountData { accounts })
    }

    /// Get an account by ID
    pub fn get(&self, id: AccountId) -> Result<Option<Account>, BudgetError> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// All accounts of a household, by nickname
    pub fn for_household(&self, household_id: HouseholdId) -> Result<Vec<Account>, BudgetError> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut accounts: Vec<_> = data
            .values()
            .filter(|a| a.household_id == household_id)
            .cloned()
            .collect();
        accounts.sort_by(|a, b| a.nickname.cmp(&b.nickname));
        Ok(accounts)
    }

    /// Find a household account by nickname (case-insensitive)
    pub fn find_by_nickname(
        &self,
        household_id: HouseholdId,
        nickname: &str,
    ) -> Result<Option<Account>, BudgetError> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let nickname = nickname.trim();
        Ok(data
            .values()
            .find(|a| a.household_id == household_id && a.nickname.eq_ignore_ascii_case(nickname))
            .cloned())
    }

    /// Insert or update an account
    pub fn upsert(&self, account: Account) -> Result<(), BudgetError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert(account.id, account);
        Ok(())
    }
}
