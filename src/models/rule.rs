//! Categorisation rules
//!
//! A rule maps transaction descriptions to a category. Rules are evaluated in
//! ascending priority order and the first match wins.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CategoryId, HouseholdId, RuleId};

/// How a rule's pattern is compared against a description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// Case-insensitive substring
    #[default]
    Contains,
    /// Case-insensitive prefix
    StartsWith,
    /// Case-insensitive regular expression
    Regex,
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contains => write!(f, "contains"),
            Self::StartsWith => write!(f, "starts_with"),
            Self::Regex => write!(f, "regex"),
        }
    }
}

impl std::str::FromStr for MatchType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "contains" => Ok(Self::Contains),
            "starts_with" | "startswith" | "prefix" => Ok(Self::StartsWith),
            "regex" | "re" => Ok(Self::Regex),
            other => Err(format!("Unknown match type: {}", other)),
        }
    }
}

/// A description-matching rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub id: RuleId,
    pub household_id: HouseholdId,
    pub pattern: String,
    #[serde(default)]
    pub match_type: MatchType,
    pub category_id: CategoryId,
    /// Lower runs first
    #[serde(default)]
    pub priority: i32,
}

impl Rule {
    pub fn new(
        household_id: HouseholdId,
        pattern: impl Into<String>,
        match_type: MatchType,
        category_id: CategoryId,
        priority: i32,
    ) -> Self {
        Self {
            id: RuleId::new(),
            household_id,
            pattern: pattern.into(),
            match_type,
            category_id,
            priority,
        }
    }
}
