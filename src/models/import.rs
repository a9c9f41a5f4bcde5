//! Import records
//!
//! Every CSV upload is recorded with its checksum and outcome so the
//! dashboard can report how fresh the household's data is.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AccountId, HouseholdId, ImportId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportStatus {
    #[default]
    Pending,
    Parsed,
    Failed,
}

impl fmt::Display for ImportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Parsed => write!(f, "parsed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// A single CSV upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportRecord {
    pub id: ImportId,
    pub household_id: HouseholdId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<AccountId>,
    pub filename: String,
    /// SHA-256 of the raw file bytes
    pub checksum: String,
    #[serde(default)]
    pub status: ImportStatus,
    pub uploaded_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parsed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total_transactions: usize,
    #[serde(default)]
    pub processed_transactions: usize,
}

impl ImportRecord {
    /// Create a pending record for a file that is about to be parsed
    pub fn pending(
        household_id: HouseholdId,
        account_id: Option<AccountId>,
        filename: impl Into<String>,
        checksum: impl Into<String>,
        uploaded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ImportId::new(),
            household_id,
            account_id,
            filename: filename.into(),
            checksum: checksum.into(),
            status: ImportStatus::Pending,
            uploaded_at,
            parsed_at: None,
            total_transactions: 0,
            processed_transactions: 0,
        }
    }

    /// Mark the import as parsed with its row counts
    pub fn mark_parsed(&mut self, total: usize, processed: usize, at: DateTime<Utc>) {
        self.status = ImportStatus::Parsed;
        self.parsed_at = Some(at);
        self.total_transactions = total;
        self.processed_transactions = processed;
    }

    pub fn mark_failed(&mut self) {
        self.status = ImportStatus::Failed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_then_parsed() {
        let now = Utc::now();
        let mut record = ImportRecord::pending(HouseholdId::new(), None, "jan.csv", "abc", now);
        assert_eq!(record.status, ImportStatus::Pending);
        assert!(record.parsed_at.is_none());

        record.mark_parsed(10, 8, now);
        assert_eq!(record.status, ImportStatus::Parsed);
        assert_eq!(record.total_transactions, 10);
        assert_eq!(record.processed_transactions, 8);
        assert_eq!(record.parsed_at, Some(now));
    }

    #[test]
    fn test_mark_failed() {
        let mut record =
            ImportRecord::pending(HouseholdId::new(), None, "bad.csv", "abc", Utc::now());
        record.mark_failed();
        assert_eq!(record.status, ImportStatus::Failed);
    }
}
