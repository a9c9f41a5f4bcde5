//! Category model
//!
//! Categories classify transactions and carry one weekly budget line each.
//! A category is either an expense or an income category; income categories
//! are excluded from spend and contribute to the planned income total.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CategoryId, HouseholdId};

/// Name of the catch-all category seeded for every household
pub const UNCATEGORISED_NAME: &str = "Uncategorised";

/// Whether a category tracks spending or income
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    #[default]
    Expense,
    Income,
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expense => write!(f, "expense"),
            Self::Income => write!(f, "income"),
        }
    }
}

impl std::str::FromStr for CategoryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "expense" => Ok(Self::Expense),
            "income" => Ok(Self::Income),
            other => Err(format!("Unknown category kind: {}", other)),
        }
    }
}

/// A budget category belonging to one household
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier
    pub id: CategoryId,

    /// Owning household
    pub household_id: HouseholdId,

    /// Category name
    pub name: String,

    /// Expense or income
    #[serde(default)]
    pub kind: CategoryKind,

    /// Sort order for display
    pub sort_order: i32,
}

impl Category {
    /// Create a new expense category
    pub fn new(household_id: HouseholdId, name: impl Into<String>) -> Self {
        Self {
            id: CategoryId::new(),
            household_id,
            name: name.into(),
            kind: CategoryKind::Expense,
            sort_order: 0,
        }
    }

    /// Create a category with an explicit kind and sort order
    pub fn with_kind(
        household_id: HouseholdId,
        name: impl Into<String>,
        kind: CategoryKind,
        sort_order: i32,
    ) -> Self {
        let mut category = Self::new(household_id, name);
        category.kind = kind;
        category.sort_order = sort_order;
        category
    }

    pub fn is_income(&self) -> bool {
        self.kind == CategoryKind::Income
    }

    /// Whether this is the household's catch-all "Uncategorised" category
    pub fn is_uncategorised_bucket(&self) -> bool {
        self.name.trim().eq_ignore_ascii_case(UNCATEGORISED_NAME)
    }

    /// Validate the category
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        if self.name.trim().is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }

        if self.name.len() > 50 {
            return Err(CategoryValidationError::NameTooLong(self.name.len()));
        }

        Ok(())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NameTooLong(usize),
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Category name too long ({} chars, max 50)", len)
            }
        }
    }
}

impl std::error::Error for CategoryValidationError {}
