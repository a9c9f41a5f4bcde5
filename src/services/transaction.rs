//! Transaction service
//!
//! Provides listing and lookup of imported transactions, manual category
//! assignment, and rule-driven (re)categorisation. Every category change
//! brings the current week's ledger back in line.

use chrono::NaiveDate;
use std::collections::HashSet;
use tracing::info;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{CategoryId, HouseholdId, Transaction, TransactionId};
use crate::services::ledger::LedgerService;
use crate::services::rules::RuleMatcher;
use crate::storage::Storage;

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
}

/// Options for filtering transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Only transactions without a category
    pub uncategorised_only: bool,
    /// Filter by category
    pub category_id: Option<CategoryId>,
    /// Filter by date range start
    pub start_date: Option<NaiveDate>,
    /// Filter by date range end
    pub end_date: Option<NaiveDate>,
    /// Maximum number of transactions to return
    pub limit: Option<usize>,
}

impl TransactionFilter {
    /// Create a new empty filter
    pub fn new() -> Self {
        Self::default()
    }

    pub fn uncategorised(mut self) -> Self {
        self.uncategorised_only = true;
        self
    }

    /// Filter by category
    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Filter by date range
    pub fn date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    /// Limit results
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

impl<'a> TransactionService<'a> {
    /// Create a new transaction service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// List the household's transactions, newest first
    pub fn list(
        &self,
        household_id: HouseholdId,
        filter: TransactionFilter,
    ) -> BudgetResult<Vec<Transaction>> {
        let mut transactions = if filter.uncategorised_only {
            self.storage.transactions.uncategorised(household_id)?
        } else if let (Some(start), Some(end)) = (filter.start_date, filter.end_date) {
            self.storage.transactions.by_date_range(household_id, start, end)?
        } else {
            self.storage.transactions.by_household(household_id)?
        };

        // Apply additional filters
        if let Some(category_id) = filter.category_id {
            transactions.retain(|t| t.category_id == Some(category_id));
        }
        if let Some(start) = filter.start_date {
            transactions.retain(|t| t.date >= start);
        }
        if let Some(end) = filter.end_date {
            transactions.retain(|t| t.date <= end);
        }

        // Apply limit
        if let Some(limit) = filter.limit {
            transactions.truncate(limit);
        }

        Ok(transactions)
    }

    /// Find a household transaction by a short or full id
    pub fn find(&self, household_id: HouseholdId, reference: &str) -> BudgetResult<Transaction> {
        if let Ok(id) = TransactionId::parse(reference.trim()) {
            if let Some(txn) = self
                .storage
                .transactions
                .get(id)?
                .filter(|t| t.household_id == household_id)
            {
                return Ok(txn);
            }
        }

        let mut matches: Vec<_> = self
            .storage
            .transactions
            .by_household(household_id)?
            .into_iter()
            .filter(|t| t.id.matches_prefix(reference))
            .collect();

        if matches.len() > 1 {
            return Err(BudgetError::Validation(format!(
                "Transaction reference '{}' is ambiguous",
                reference
            )));
        }
        matches
            .pop()
            .ok_or_else(|| BudgetError::transaction_not_found(reference))
    }

    /// Assign (or clear) a transaction's category, then recompute the
    /// current week
    pub fn set_category(
        &self,
        household_id: HouseholdId,
        transaction_id: TransactionId,
        category_id: Option<CategoryId>,
    ) -> BudgetResult<Transaction> {
        let mut txn = self
            .storage
            .transactions
            .get(transaction_id)?
            .filter(|t| t.household_id == household_id)
            .ok_or_else(|| {
                BudgetError::Validation(format!(
                    "Transaction {} does not belong to this household",
                    transaction_id
                ))
            })?;

        if let Some(category_id) = category_id {
            self.storage
                .categories
                .get(category_id)?
                .filter(|c| c.household_id == household_id)
                .ok_or_else(|| BudgetError::category_not_found(category_id.to_string()))?;
        }

        txn.category_id = category_id;
        self.storage.transactions.upsert(txn.clone())?;
        self.storage.transactions.save()?;

        LedgerService::new(self.storage).recompute_current_week(household_id)?;

        Ok(txn)
    }

    /// Apply the household rules to uncategorised transactions.
    ///
    /// A rule pointing at the "Uncategorised" category leaves the
    /// transaction alone. Returns how many transactions were updated.
    pub fn auto_categorise(&self, household_id: HouseholdId) -> BudgetResult<usize> {
        let matcher = RuleMatcher::new(&self.storage.rules.for_household(household_id)?);
        let buckets: HashSet<CategoryId> = self
            .storage
            .categories
            .for_household(household_id)?
            .into_iter()
            .filter(|c| c.is_uncategorised_bucket())
            .map(|c| c.id)
            .collect();

        let mut updated = 0;
        for mut txn in self.storage.transactions.uncategorised(household_id)? {
            let Some(category_id) = matcher.categorise(&txn.description) else {
                continue;
            };
            if buckets.contains(&category_id) {
                continue;
            }
            txn.category_id = Some(category_id);
            self.storage.transactions.upsert(txn)?;
            updated += 1;
        }

        if updated > 0 {
            self.storage.transactions.save()?;
        }
        LedgerService::new(self.storage).recompute_current_week(household_id)?;

        info!(household = %household_id, updated, rules = matcher.len(), "auto-categorised transactions");
        Ok(updated)
    }

    /// Re-apply the household rules to every transaction, including ones
    /// that already have a category. Transactions no rule matches keep their
    /// category. Returns how many transactions changed.
    pub fn recategorise_all(&self, household_id: HouseholdId) -> BudgetResult<usize> {
        let matcher = RuleMatcher::new(&self.storage.rules.for_household(household_id)?);

        let mut updated = 0;
        for mut txn in self.storage.transactions.by_household(household_id)? {
            let next = matcher.categorise(&txn.description);
            if next.is_none() || next == txn.category_id {
                continue;
            }
            txn.category_id = next;
            self.storage.transactions.upsert(txn)?;
            updated += 1;
        }

        if updated > 0 {
            self.storage.transactions.save()?;
        }

        info!(household = %household_id, updated, rules = matcher.len(), "re-categorised transactions");
        Ok(updated)
    }
}
