//! Rollover ledger entries
//!
//! One entry per (household, category, period start, period type) records
//! how much surplus or deficit a category brought into a period and how much
//! it carries out. Entries for consecutive weeks form a chain: each week's
//! `carry_in` is the previous week's `carry_out`.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::ids::{CategoryId, HouseholdId};
use super::period::PeriodType;

/// Natural key of a ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LedgerKey {
    pub household_id: HouseholdId,
    pub category_id: CategoryId,
    pub period_start: NaiveDateTime,
    pub period_type: PeriodType,
}

/// Carry-forward record for one category in one period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RolloverLedgerEntry {
    pub household_id: HouseholdId,
    pub category_id: CategoryId,
    pub period_start: NaiveDateTime,
    pub period_type: PeriodType,
    pub carry_in: f64,
    pub carry_out: f64,
}

impl RolloverLedgerEntry {
    pub fn key(&self) -> LedgerKey {
        LedgerKey {
            household_id: self.household_id,
            category_id: self.category_id,
            period_start: self.period_start,
            period_type: self.period_type,
        }
    }

    /// Movement within the period (`carry_out - carry_in`)
    pub fn variance(&self) -> f64 {
        self.carry_out - self.carry_in
    }
}
