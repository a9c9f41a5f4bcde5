//! Strongly-typed ID wrappers for all entity types
//!
//! Using newtype wrappers prevents accidentally mixing up IDs from different
//! entity types at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Create an ID from an existing UUID
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Get the underlying UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Parse an ID from a string
            pub fn parse(s: &str) -> Result<Self, uuid::Error> {
                Ok(Self(Uuid::parse_str(s)?))
            }

            /// Whether a user-typed reference (short display form, with or
            /// without the prefix, or the full UUID) names this ID
            pub fn matches_prefix(&self, reference: &str) -> bool {
                let reference = reference.trim();
                let reference = reference.strip_prefix($display_prefix).unwrap_or(reference);
                !reference.is_empty() && self.0.to_string().starts_with(reference)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, &self.0.to_string()[..8])
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                // Try to parse the full UUID
                if let Ok(uuid) = Uuid::parse_str(s) {
                    return Ok(Self(uuid));
                }
                // Try stripping common prefixes
                let s = s.strip_prefix($display_prefix).unwrap_or(s);
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

define_id!(HouseholdId, "hh-");
define_id!(AccountId, "acc-");
define_id!(BudgetId, "bud-");
define_id!(BudgetLineId, "line-");
define_id!(CategoryId, "cat-");
define_id!(TransactionId, "txn-");
define_id!(RuleId, "rule-");
define_id!(ImportId, "imp-");
