//! Transaction model
//!
//! Transactions are imported from bank CSV exports. Amounts are stored as
//! non-negative values with an explicit direction: debits add to spend,
//! credits (refunds, income) subtract from it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AccountId, CategoryId, HouseholdId, ImportId, TransactionId};
use super::money::Money;

/// Whether money left or entered the account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    #[default]
    Debit,
    Credit,
}

impl Direction {
    /// Upper-case label used in dedupe hashes and CSV output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debit => "DEBIT",
            Self::Credit => "CREDIT",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A bank transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// Owning household
    pub household_id: HouseholdId,

    /// Account the transaction was imported from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<AccountId>,

    /// Import that created this transaction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_id: Option<ImportId>,

    /// Bank's own identifier for the row, when the export has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,

    /// Transaction date
    pub date: NaiveDate,

    /// Description as exported by the bank
    pub description: String,

    /// Absolute amount
    pub amount: Money,

    #[serde(default)]
    pub direction: Direction,

    /// Category, or `None` while uncategorised
    #[serde(default)]
    pub category_id: Option<CategoryId>,

    /// Content hash used to skip re-imported rows
    pub dedupe_hash: String,

    /// Lower-cased description for grouping by merchant
    #[serde(default)]
    pub merchant_key: String,

    /// When the transaction was created
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new uncategorised transaction
    pub fn new(
        household_id: HouseholdId,
        date: NaiveDate,
        description: impl Into<String>,
        amount: Money,
        direction: Direction,
        dedupe_hash: impl Into<String>,
    ) -> Self {
        let description = description.into();
        Self {
            id: TransactionId::new(),
            household_id,
            account_id: None,
            import_id: None,
            external_id: None,
            date,
            merchant_key: description.to_lowercase(),
            description,
            amount: amount.abs(),
            direction,
            category_id: None,
            dedupe_hash: dedupe_hash.into(),
            created_at: Utc::now(),
        }
    }

    /// Spend contribution: positive for debits, negative for credits
    pub fn signed_spend(&self) -> f64 {
        let amount = self.amount.as_f64();
        match self.direction {
            Direction::Debit => amount,
            Direction::Credit => -amount,
        }
    }

    pub fn is_uncategorised(&self) -> bool {
        self.category_id.is_none()
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.date.format("%Y-%m-%d"),
            self.description,
            self.direction,
            self.amount
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn txn(direction: Direction, cents: i64) -> Transaction {
        Transaction::new(
            HouseholdId::new(),
            NaiveDate::from_ymd_opt(2025, 12, 9).unwrap(),
            "DIRECT DEBIT HUBHELLO",
            Money::from_cents(cents),
            direction,
            "hash",
        )
    }

    #[test]
    fn test_new_transaction() {
        let t = txn(Direction::Debit, 2793);
        assert!(t.is_uncategorised());
        assert_eq!(t.merchant_key, "direct debit hubhello");
        assert_eq!(t.amount, Money::from_cents(2793));
    }

    #[test]
    fn test_amount_is_stored_absolute() {
        let t = txn(Direction::Debit, -2793);
        assert_eq!(t.amount, Money::from_cents(2793));
    }

    #[test]
    fn test_signed_spend() {
        assert_eq!(txn(Direction::Debit, 2000).signed_spend(), 20.0);
        assert_eq!(txn(Direction::Credit, 2000).signed_spend(), -20.0);
    }

    #[test]
    fn test_direction_serialization() {
        let json = serde_json::to_string(&Direction::Credit).unwrap();
        assert_eq!(json, "\"CREDIT\"");
    }

    #[test]
    fn test_serialization() {
        let t = txn(Direction::Credit, 1050);
        let json = serde_json::to_string(&t).unwrap();
        let deserialized: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(t, deserialized);
    }
}
