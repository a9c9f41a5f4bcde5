//! Custom error types for Hearth Budget
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.
//!
//! Note that "nothing configured yet" states (no weekly budget, no prior ledger
//! entry) are not errors; services signal them with `Option` or empty reports.

use thiserror::Error;

/// The main error type for Hearth Budget operations
#[derive(Error, Debug)]
pub enum BudgetError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// CSV reading errors
    #[error("CSV error: {0}")]
    Csv(String),

    /// Validation errors for user edits
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// Budget-related errors
    #[error("Budget error: {0}")]
    Budget(String),

    /// Import errors
    #[error("Import error: {0}")]
    Import(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl BudgetError {
    /// Create a "not found" error for categories
    pub fn category_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Category",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for transactions
    pub fn transaction_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Transaction",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for rules
    pub fn rule_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Rule",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for accounts
    pub fn account_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Account",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<std::io::Error> for BudgetError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BudgetError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for BudgetError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

/// Result type alias for Hearth Budget operations
pub type BudgetResult<T> = Result<T, BudgetError>;
