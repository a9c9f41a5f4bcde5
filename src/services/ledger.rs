//! Rollover ledger recomputation
//!
//! The ledger holds one weekly entry per budgeted category. Recomputing a
//! week reads the previous week's `carry_out` as `carry_in`, so weeks must be
//! replayed oldest first. Ledger weeks always start on Monday regardless of
//! the household's dashboard week start.

use std::collections::HashMap;

use chrono::{Duration, Local, NaiveDateTime};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::BudgetResult;
use crate::models::period::start_of_day;
use crate::models::{
    Budget, CategoryId, HouseholdId, PeriodBounds, PeriodType, RolloverLedgerEntry, WeekStart,
};
use crate::services::rollover::{calculate_rollover, RolloverInput};
use crate::storage::Storage;

/// What a recompute run did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RecomputeReport {
    pub weeks_processed: usize,
    pub entries_written: usize,
    /// The household has no weekly budget, so nothing was computed
    pub no_budget: bool,
}

/// Service for maintaining the weekly rollover ledger
pub struct LedgerService<'a> {
    storage: &'a Storage,
}

impl<'a> LedgerService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Recompute the ledger for the current week
    pub fn recompute_current_week(&self, household_id: HouseholdId) -> BudgetResult<RecomputeReport> {
        self.recompute_week_at(household_id, Local::now().naive_local())
    }

    /// Recompute the ledger for the Monday-start week containing `reference`
    pub fn recompute_week_at(
        &self,
        household_id: HouseholdId,
        reference: NaiveDateTime,
    ) -> BudgetResult<RecomputeReport> {
        let Some(budget) = self.storage.budgets.latest_weekly(household_id)? else {
            debug!(household = %household_id, "no weekly budget, skipping ledger recompute");
            return Ok(RecomputeReport {
                no_budget: true,
                ..RecomputeReport::default()
            });
        };

        let bounds = PeriodBounds::containing(PeriodType::Week, reference, WeekStart::Monday);
        let entries_written = self.recompute_week(household_id, &budget, &bounds)?;
        self.storage.ledger.save()?;

        info!(
            household = %household_id,
            week = %bounds.start_date(),
            entries = entries_written,
            "recomputed ledger week"
        );

        Ok(RecomputeReport {
            weeks_processed: 1,
            entries_written,
            no_budget: false,
        })
    }

    /// Replay every week from the earliest transaction through the current week
    pub fn recompute_history(&self, household_id: HouseholdId) -> BudgetResult<RecomputeReport> {
        self.recompute_history_at(household_id, Local::now().naive_local())
    }

    /// Replay every week from the earliest transaction through the week
    /// containing `now`, oldest first
    pub fn recompute_history_at(
        &self,
        household_id: HouseholdId,
        now: NaiveDateTime,
    ) -> BudgetResult<RecomputeReport> {
        let Some(earliest) = self.storage.transactions.earliest(household_id)? else {
            debug!(household = %household_id, "no transactions, nothing to replay");
            return Ok(RecomputeReport::default());
        };

        let Some(budget) = self.storage.budgets.latest_weekly(household_id)? else {
            debug!(household = %household_id, "no weekly budget, skipping ledger replay");
            return Ok(RecomputeReport {
                no_budget: true,
                ..RecomputeReport::default()
            });
        };

        let last = start_of_day(WeekStart::Monday.start_of_week(now.date()));
        let mut cursor = start_of_day(WeekStart::Monday.start_of_week(earliest.date));
        let mut report = RecomputeReport::default();

        while cursor <= last {
            let bounds = PeriodBounds::containing(PeriodType::Week, cursor, WeekStart::Monday);
            report.entries_written += self.recompute_week(household_id, &budget, &bounds)?;
            report.weeks_processed += 1;
            cursor += Duration::days(7);
        }

        self.storage.ledger.save()?;

        info!(
            household = %household_id,
            from = %earliest.date,
            weeks = report.weeks_processed,
            entries = report.entries_written,
            "replayed ledger history"
        );

        Ok(report)
    }

    /// Delete every ledger entry of the household
    pub fn reset(&self, household_id: HouseholdId) -> BudgetResult<usize> {
        let removed = self.storage.ledger.delete_for_household(household_id)?;
        self.storage.ledger.save()?;
        info!(household = %household_id, removed, "reset rollover ledger");
        Ok(removed)
    }

    /// A category's weekly chain, oldest first
    pub fn entries_for_category(
        &self,
        household_id: HouseholdId,
        category_id: CategoryId,
    ) -> BudgetResult<Vec<RolloverLedgerEntry>> {
        Ok(self
            .storage
            .ledger
            .for_category(household_id, category_id)?
            .into_iter()
            .filter(|e| e.period_type == PeriodType::Week)
            .collect())
    }

    /// Upsert one entry per budget line for the week in `bounds`.
    /// Does not save; callers persist once per run.
    fn recompute_week(
        &self,
        household_id: HouseholdId,
        budget: &Budget,
        bounds: &PeriodBounds,
    ) -> BudgetResult<usize> {
        let transactions = self.storage.transactions.within(household_id, bounds)?;
        let previous = self.storage.ledger.for_period(
            household_id,
            PeriodType::Week,
            bounds.previous().start,
        )?;

        // `None` collects uncategorised spend, which no budget line matches
        let mut spend: HashMap<Option<CategoryId>, f64> = HashMap::new();
        for txn in &transactions {
            *spend.entry(txn.category_id).or_insert(0.0) += txn.signed_spend();
        }

        for line in &budget.lines {
            let actual_spend = spend.get(&Some(line.category_id)).copied().unwrap_or(0.0);
            let carry_in = previous
                .get(&line.category_id)
                .map(|e| e.carry_out)
                .unwrap_or(0.0);
            let rollover = calculate_rollover(RolloverInput {
                budget: line.amount.as_f64(),
                carry_in,
                actual_spend,
            });

            self.storage.ledger.upsert(RolloverLedgerEntry {
                household_id,
                category_id: line.category_id,
                period_start: bounds.start,
                period_type: PeriodType::Week,
                carry_in,
                carry_out: rollover.carry_out,
            })?;
        }

        Ok(budget.lines.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::HearthPaths;
    use crate::models::{Category, Direction, LedgerKey, Money, Transaction};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    struct Fixture {
        _temp_dir: TempDir,
        storage: Storage,
        household: HouseholdId,
        groceries: CategoryId,
        fuel: CategoryId,
    }

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn noon(m: u32, d: u32) -> NaiveDateTime {
        date(m, d).and_hms_opt(12, 0, 0).unwrap()
    }

    /// Groceries $100/week, Fuel $50/week; no transactions yet
    fn fixture() -> Fixture {
        let temp_dir = TempDir::new().unwrap();
        let paths = HearthPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        let household = HouseholdId::new();

        let groceries = Category::new(household, "Groceries");
        let fuel = Category::new(household, "Fuel");
        storage.categories.upsert(groceries.clone()).unwrap();
        storage.categories.upsert(fuel.clone()).unwrap();

        let mut budget = Budget::weekly(household, date(11, 3));
        budget.set_line_amount(groceries.id, Money::from_cents(10000));
        budget.set_line_amount(fuel.id, Money::from_cents(5000));
        storage.budgets.upsert(budget).unwrap();

        Fixture {
            _temp_dir: temp_dir,
            storage,
            household,
            groceries: groceries.id,
            fuel: fuel.id,
        }
    }

    fn spend(f: &Fixture, day: NaiveDate, cents: i64, category: Option<CategoryId>) {
        spend_with_direction(f, day, cents, category, Direction::Debit);
    }

    fn spend_with_direction(
        f: &Fixture,
        day: NaiveDate,
        cents: i64,
        category: Option<CategoryId>,
        direction: Direction,
    ) {
        let mut txn = Transaction::new(
            f.household,
            day,
            "TEST",
            Money::from_cents(cents),
            direction,
            format!("{}-{}-{:?}", day, cents, direction),
        );
        txn.category_id = category;
        f.storage.transactions.upsert(txn).unwrap();
    }

    fn entry(f: &Fixture, category: CategoryId, monday: NaiveDate) -> RolloverLedgerEntry {
        f.storage
            .ledger
            .get(&LedgerKey {
                household_id: f.household,
                category_id: category,
                period_start: start_of_day(monday),
                period_type: PeriodType::Week,
            })
            .unwrap()
            .unwrap()
    }

    #[test]
    fn week_recompute_writes_one_entry_per_line() {
        let f = fixture();
        spend(&f, date(12, 9), 8000, Some(f.groceries));
        spend_with_direction(&f, date(12, 10), 1000, Some(f.groceries), Direction::Credit);
        spend(&f, date(12, 11), 9900, None);

        let report = LedgerService::new(&f.storage)
            .recompute_week_at(f.household, noon(12, 10))
            .unwrap();

        assert_eq!(report.weeks_processed, 1);
        assert_eq!(report.entries_written, 2);
        assert_eq!(f.storage.ledger.count().unwrap(), 2);

        // 100 budget - (80 - 10) spend
        let groceries = entry(&f, f.groceries, date(12, 8));
        assert_eq!(groceries.carry_in, 0.0);
        assert!((groceries.carry_out - 30.0).abs() < 1e-9);

        // Uncategorised spend never touches a budgeted category
        let fuel = entry(&f, f.fuel, date(12, 8));
        assert_eq!(fuel.carry_out, 50.0);
    }

    #[test]
    fn week_recompute_reads_prior_week_carry_out() {
        let f = fixture();
        f.storage
            .ledger
            .upsert(RolloverLedgerEntry {
                household_id: f.household,
                category_id: f.groceries,
                period_start: start_of_day(date(12, 1)),
                period_type: PeriodType::Week,
                carry_in: 0.0,
                carry_out: 20.0,
            })
            .unwrap();
        spend(&f, date(12, 9), 8000, Some(f.groceries));

        LedgerService::new(&f.storage)
            .recompute_week_at(f.household, noon(12, 10))
            .unwrap();

        let groceries = entry(&f, f.groceries, date(12, 8));
        assert_eq!(groceries.carry_in, 20.0);
        assert_eq!(groceries.carry_out, 40.0);
    }

    #[test]
    fn week_recompute_is_idempotent() {
        let f = fixture();
        spend(&f, date(12, 9), 12345, Some(f.groceries));
        let service = LedgerService::new(&f.storage);
        let ledger_path = f.storage.paths().ledger_file();

        service.recompute_week_at(f.household, noon(12, 10)).unwrap();
        let first = std::fs::read(&ledger_path).unwrap();
        service.recompute_week_at(f.household, noon(12, 10)).unwrap();
        let second = std::fs::read(&ledger_path).unwrap();

        assert_eq!(first, second);
        assert_eq!(f.storage.ledger.count().unwrap(), 2);
    }

    #[test]
    fn no_budget_is_a_no_op() {
        let f = fixture();
        let other = HouseholdId::new();

        let report = LedgerService::new(&f.storage)
            .recompute_week_at(other, noon(12, 10))
            .unwrap();

        assert!(report.no_budget);
        assert_eq!(report.entries_written, 0);
        assert_eq!(f.storage.ledger.count().unwrap(), 0);
    }

    #[test]
    fn category_without_line_gets_no_entry() {
        let f = fixture();
        let unbudgeted = Category::new(f.household, "Hobbies");
        f.storage.categories.upsert(unbudgeted.clone()).unwrap();
        spend(&f, date(12, 9), 5000, Some(unbudgeted.id));

        LedgerService::new(&f.storage)
            .recompute_week_at(f.household, noon(12, 10))
            .unwrap();

        assert!(LedgerService::new(&f.storage)
            .entries_for_category(f.household, unbudgeted.id)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn history_replay_keeps_chain_invariant() {
        let f = fixture();
        // Four weeks of activity starting Wednesday 12 November
        spend(&f, date(11, 12), 12000, Some(f.groceries));
        spend(&f, date(11, 20), 7000, Some(f.groceries));
        spend(&f, date(11, 21), 6500, Some(f.fuel));
        spend(&f, date(12, 2), 15000, Some(f.groceries));
        spend(&f, date(12, 9), 3000, Some(f.fuel));

        let service = LedgerService::new(&f.storage);
        let report = service.recompute_history_at(f.household, noon(12, 10)).unwrap();

        // Mondays 10 Nov through 8 Dec
        assert_eq!(report.weeks_processed, 5);
        assert_eq!(report.entries_written, 10);

        for category in [f.groceries, f.fuel] {
            let chain = service.entries_for_category(f.household, category).unwrap();
            assert_eq!(chain.len(), 5);
            assert_eq!(chain[0].period_start, start_of_day(date(11, 10)));
            assert_eq!(chain[0].carry_in, 0.0);
            for pair in chain.windows(2) {
                assert_eq!(pair[1].carry_in, pair[0].carry_out);
                assert_eq!(pair[1].period_start - pair[0].period_start, Duration::days(7));
            }
        }

        // Groceries spend per week: 120, 70, 0, 150, 0
        let groceries = service.entries_for_category(f.household, f.groceries).unwrap();
        let carry_outs: Vec<f64> = groceries.iter().map(|e| e.carry_out).collect();
        assert_eq!(carry_outs, vec![-20.0, 10.0, 110.0, 60.0, 160.0]);
    }

    #[test]
    fn history_replay_twice_is_identical() {
        let f = fixture();
        spend(&f, date(11, 12), 12000, Some(f.groceries));
        spend(&f, date(12, 2), 1500, Some(f.fuel));
        let service = LedgerService::new(&f.storage);
        let ledger_path = f.storage.paths().ledger_file();

        service.recompute_history_at(f.household, noon(12, 10)).unwrap();
        let first = std::fs::read(&ledger_path).unwrap();
        service.recompute_history_at(f.household, noon(12, 10)).unwrap();
        let second = std::fs::read(&ledger_path).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn history_without_transactions_is_a_no_op() {
        let f = fixture();
        let report = LedgerService::new(&f.storage)
            .recompute_history_at(f.household, noon(12, 10))
            .unwrap();

        assert_eq!(report, RecomputeReport::default());
        assert_eq!(f.storage.ledger.count().unwrap(), 0);
    }

    #[test]
    fn reset_removes_household_entries() {
        let f = fixture();
        spend(&f, date(12, 9), 1000, Some(f.groceries));
        let service = LedgerService::new(&f.storage);
        service.recompute_week_at(f.household, noon(12, 10)).unwrap();

        assert_eq!(service.reset(f.household).unwrap(), 2);
        assert_eq!(f.storage.ledger.count().unwrap(), 0);
    }
}
