//! Bank account model
//!
//! Accounts only label where imported transactions came from; balances are
//! not tracked.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AccountId, HouseholdId};

/// A bank account that CSV exports are imported from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier
    pub id: AccountId,

    /// Owning household
    pub household_id: HouseholdId,

    /// Bank name (e.g., "Bendigo Bank")
    pub bank_name: String,

    /// Household's name for the account (e.g., "Joint Card & Bills")
    pub nickname: String,
}

impl Account {
    pub fn new(
        household_id: HouseholdId,
        bank_name: impl Into<String>,
        nickname: impl Into<String>,
    ) -> Self {
        Self {
            id: AccountId::new(),
            household_id,
            bank_name: bank_name.into(),
            nickname: nickname.into(),
        }
    }

    /// Validate the account
    pub fn validate(&self) -> Result<(), AccountValidationError> {
        if self.nickname.trim().is_empty() {
            return Err(AccountValidationError::EmptyNickname);
        }
        if self.bank_name.trim().is_empty() {
            return Err(AccountValidationError::EmptyBankName);
        }
        Ok(())
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.nickname, self.bank_name)
    }
}

/// Validation errors for accounts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountValidationError {
    EmptyNickname,
    EmptyBankName,
}

impl fmt::Display for AccountValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyNickname => write!(f, "Account nickname cannot be empty"),
            Self::EmptyBankName => write!(f, "Bank name cannot be empty"),
        }
    }
}

impl std::error::Error for AccountValidationError {}
