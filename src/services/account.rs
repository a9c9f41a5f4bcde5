//! Account service
//!
//! Accounts label the bank export a transaction was imported from.

use crate::error::{BudgetError, BudgetResult};
use crate::models::{Account, HouseholdId};
use crate::storage::Storage;

/// Service for account management
pub struct AccountService<'a> {
    storage: &'a Storage,
}

impl<'a> AccountService<'a> {
    /// Create a new account service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new account
    pub fn create(
        &self,
        household_id: HouseholdId,
        bank_name: &str,
        nickname: &str,
    ) -> BudgetResult<Account> {
        let nickname = nickname.trim();

        // Check for duplicate nickname
        if self
            .storage
            .accounts
            .find_by_nickname(household_id, nickname)?
            .is_some()
        {
            return Err(BudgetError::Duplicate {
                entity_type: "Account",
                identifier: nickname.to_string(),
            });
        }

        let account = Account::new(household_id, bank_name.trim(), nickname);
        account
            .validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;

        self.storage.accounts.upsert(account.clone())?;
        self.storage.accounts.save()?;

        Ok(account)
    }

    /// List the household's accounts
    pub fn list(&self, household_id: HouseholdId) -> BudgetResult<Vec<Account>> {
        self.storage.accounts.for_household(household_id)
    }

    /// Find an account by nickname, falling back to a short or full id
    pub fn find(&self, household_id: HouseholdId, identifier: &str) -> BudgetResult<Account> {
        if let Some(account) = self
            .storage
            .accounts
            .find_by_nickname(household_id, identifier)?
        {
            return Ok(account);
        }

        self.list(household_id)?
            .into_iter()
            .find(|a| a.id.matches_prefix(identifier))
            .ok_or_else(|| BudgetError::account_not_found(identifier))
    }
}
