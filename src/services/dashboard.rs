//! Budget-vs-actual dashboard
//!
//! Builds a [`DashboardSummary`] for one period window: each budgeted
//! category's scaled budget, spend, carry-in and traffic-light status, plus
//! household totals, pacing and data freshness.

use std::collections::HashMap;
use std::fmt;

use chrono::{Duration, Local, NaiveDateTime};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::BudgetResult;
use crate::models::period::start_of_day;
use crate::models::{
    CategoryId, CategoryKind, HouseholdId, PeriodBounds, PeriodType, WeekStart,
};
use crate::services::rollover::{calculate_rollover, RolloverInput};
use crate::services::scaling::weekly_to_period;
use crate::storage::Storage;

/// Traffic-light status for a category, the totals or pacing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficLight {
    Green,
    Amber,
    Red,
}

impl TrafficLight {
    /// Status of a category given what is available and what was spent
    pub fn for_category(available: f64, spend: f64) -> Self {
        if available - spend >= 0.0 {
            Self::Green
        } else if spend > available {
            Self::Red
        } else {
            Self::Amber
        }
    }
}

impl fmt::Display for TrafficLight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Green => write!(f, "green"),
            Self::Amber => write!(f, "amber"),
            Self::Red => write!(f, "red"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardCategory {
    pub id: CategoryId,
    pub name: String,
    pub kind: CategoryKind,
    /// Weekly amount scaled to the period
    pub budget: f64,
    pub spend: f64,
    pub carry_in: f64,
    pub available: f64,
    pub variance: f64,
    pub status: TrafficLight,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardTotals {
    /// Expense budget for the period
    pub budget: f64,
    /// Household-wide spend, uncategorised included
    pub spend: f64,
    pub expense_budget: f64,
    pub income_budget: f64,
    pub net_planned: f64,
    pub status: TrafficLight,
    pub pacing: TrafficLight,
    /// Expected spend so far minus actual spend
    pub pace_delta: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub bounds: PeriodBounds,
    pub totals: DashboardTotals,
    pub categories: Vec<DashboardCategory>,
    pub freshness_days: Option<i64>,
    pub last_data_at: Option<NaiveDateTime>,
}

/// Service for building dashboards
pub struct DashboardService<'a> {
    storage: &'a Storage,
    week_start: WeekStart,
}

impl<'a> DashboardService<'a> {
    pub fn new(storage: &'a Storage, week_start: WeekStart) -> Self {
        Self {
            storage,
            week_start,
        }
    }

    /// Dashboard for the period containing the current local time
    pub fn dashboard(
        &self,
        household_id: HouseholdId,
        period_type: PeriodType,
    ) -> BudgetResult<Option<DashboardSummary>> {
        self.dashboard_at(household_id, period_type, Local::now().naive_local())
    }

    /// Dashboard for the period containing `now`.
    ///
    /// Returns `None` when the household has no weekly budget.
    pub fn dashboard_at(
        &self,
        household_id: HouseholdId,
        period_type: PeriodType,
        now: NaiveDateTime,
    ) -> BudgetResult<Option<DashboardSummary>> {
        let bounds = PeriodBounds::containing(period_type, now, self.week_start);

        let Some(budget) = self.storage.budgets.latest_weekly(household_id)? else {
            debug!(household = %household_id, "no weekly budget, no dashboard");
            return Ok(None);
        };

        let categories: HashMap<CategoryId, _> = self
            .storage
            .categories
            .for_household(household_id)?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();
        let transactions = self.storage.transactions.within(household_id, &bounds)?;
        let carry_ins = self.carry_ins(household_id, &bounds)?;

        let mut spend_by_category: HashMap<Option<CategoryId>, f64> = HashMap::new();
        let mut total_spend = 0.0;
        for txn in &transactions {
            let is_income = txn
                .category_id
                .and_then(|id| categories.get(&id))
                .is_some_and(|c| c.is_income());
            if is_income {
                continue;
            }
            let amount = txn.signed_spend();
            *spend_by_category.entry(txn.category_id).or_insert(0.0) += amount;
            total_spend += amount;
        }

        let mut rows = Vec::with_capacity(budget.lines.len());
        let mut expense_budget = 0.0;
        let mut income_budget = 0.0;

        for line in &budget.lines {
            let Some(category) = categories.get(&line.category_id) else {
                warn!(category = %line.category_id, "budget line for unknown category");
                continue;
            };

            let scaled = weekly_to_period(line.amount.as_f64(), period_type, &bounds);
            let spend = spend_by_category
                .get(&Some(category.id))
                .copied()
                .unwrap_or(0.0);
            let carry_in = carry_ins.get(&category.id).copied().unwrap_or(0.0);
            let rollover = calculate_rollover(RolloverInput {
                budget: scaled,
                carry_in,
                actual_spend: spend,
            });

            match category.kind {
                CategoryKind::Expense => expense_budget += scaled,
                CategoryKind::Income => income_budget += scaled,
            }

            rows.push((
                category.sort_order,
                DashboardCategory {
                    id: category.id,
                    name: category.name.clone(),
                    kind: category.kind,
                    budget: scaled,
                    spend,
                    carry_in,
                    available: rollover.available,
                    variance: rollover.variance,
                    status: TrafficLight::for_category(rollover.available, spend),
                },
            ));
        }

        rows.sort_by(|(a_order, a), (b_order, b)| {
            a_order
                .cmp(b_order)
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });

        let status = if expense_budget - total_spend >= 0.0 {
            TrafficLight::Green
        } else {
            TrafficLight::Red
        };
        let (pacing, pace_delta) = pacing(&bounds, now, expense_budget, total_spend);
        let last_data_at = self.last_data_at(household_id)?;

        Ok(Some(DashboardSummary {
            bounds,
            totals: DashboardTotals {
                budget: expense_budget,
                spend: total_spend,
                expense_budget,
                income_budget,
                net_planned: income_budget - expense_budget,
                status,
                pacing,
                pace_delta,
            },
            categories: rows.into_iter().map(|(_, row)| row).collect(),
            freshness_days: last_data_at.map(|at| (now.date() - at.date()).num_days()),
            last_data_at,
        }))
    }

    /// Carry-in per category. Only weekly views have a ledger chain to read;
    /// other granularities start from zero.
    fn carry_ins(
        &self,
        household_id: HouseholdId,
        bounds: &PeriodBounds,
    ) -> BudgetResult<HashMap<CategoryId, f64>> {
        match bounds.period_type {
            PeriodType::Week => {
                // Ledger weeks are Monday-aligned; take the one overlapping
                // this window the most, then step back a week
                let ledger_week = PeriodBounds::containing(
                    PeriodType::Week,
                    start_of_day(bounds.start_date() + Duration::days(3)),
                    WeekStart::Monday,
                );
                let previous = ledger_week.previous();
                Ok(self
                    .storage
                    .ledger
                    .for_period(household_id, PeriodType::Week, previous.start)?
                    .into_iter()
                    .map(|(id, entry)| (id, entry.carry_out))
                    .collect())
            }
            PeriodType::Fortnight | PeriodType::Month | PeriodType::Year => Ok(HashMap::new()),
        }
    }

    /// Later of the last parsed import's upload time and the newest
    /// transaction's date
    fn last_data_at(&self, household_id: HouseholdId) -> BudgetResult<Option<NaiveDateTime>> {
        let imported = self
            .storage
            .imports
            .latest_parsed(household_id)?
            .map(|r| r.uploaded_at.with_timezone(&Local).naive_local());
        let transacted = self
            .storage
            .transactions
            .latest(household_id)?
            .map(|t| start_of_day(t.date));

        Ok(imported.max(transacted))
    }
}

/// Pacing status and delta for spend so far against the expense budget
fn pacing(
    bounds: &PeriodBounds,
    now: NaiveDateTime,
    expense_budget: f64,
    spend: f64,
) -> (TrafficLight, f64) {
    let period_seconds = bounds.seconds();
    let fraction = if period_seconds <= 0 {
        1.0
    } else {
        let remaining = (bounds.end - now).num_seconds().max(0);
        let elapsed = (period_seconds - remaining).clamp(1, period_seconds);
        elapsed as f64 / period_seconds as f64
    };

    let expected = expense_budget * fraction;
    let pace_delta = expected - spend;
    let status = if spend > expense_budget {
        TrafficLight::Red
    } else if pace_delta >= 0.0 {
        TrafficLight::Green
    } else {
        TrafficLight::Amber
    };

    (status, pace_delta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::HearthPaths;
    use crate::models::{
        Budget, Category, Direction, ImportRecord, Money, RolloverLedgerEntry, Transaction,
    };
    use chrono::{NaiveDate, TimeZone, Utc};
    use tempfile::TempDir;

    const EPSILON: f64 = 1e-6;

    struct Fixture {
        _temp_dir: TempDir,
        storage: Storage,
        household: HouseholdId,
        income: CategoryId,
        groceries: CategoryId,
        fuel: CategoryId,
    }

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn at(m: u32, d: u32, h: u32) -> NaiveDateTime {
        date(m, d).and_hms_opt(h, 0, 0).unwrap()
    }

    /// Income $1000, Groceries $100, Fuel $50 per week
    fn fixture() -> Fixture {
        let temp_dir = TempDir::new().unwrap();
        let paths = HearthPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        let household = HouseholdId::new();

        let income = Category::with_kind(household, "Income", CategoryKind::Income, 0);
        let groceries = Category::with_kind(household, "Groceries", CategoryKind::Expense, 1);
        let fuel = Category::with_kind(household, "Fuel", CategoryKind::Expense, 2);
        for category in [&income, &groceries, &fuel] {
            storage.categories.upsert(category.clone()).unwrap();
        }

        let mut budget = Budget::weekly(household, date(12, 1));
        budget.set_line_amount(income.id, Money::from_cents(100_000));
        budget.set_line_amount(groceries.id, Money::from_cents(10_000));
        budget.set_line_amount(fuel.id, Money::from_cents(5_000));
        storage.budgets.upsert(budget).unwrap();

        Fixture {
            _temp_dir: temp_dir,
            storage,
            household,
            income: income.id,
            groceries: groceries.id,
            fuel: fuel.id,
        }
    }

    fn add_txn(f: &Fixture, day: NaiveDate, cents: i64, direction: Direction, category: Option<CategoryId>) {
        let mut txn = Transaction::new(
            f.household,
            day,
            "TEST",
            Money::from_cents(cents),
            direction,
            format!("{}-{}-{:?}-{:?}", day, cents, direction, category),
        );
        txn.category_id = category;
        f.storage.transactions.upsert(txn).unwrap();
    }

    fn row<'s>(summary: &'s DashboardSummary, id: CategoryId) -> &'s DashboardCategory {
        summary.categories.iter().find(|c| c.id == id).unwrap()
    }

    #[test]
    fn status_boundaries() {
        assert_eq!(TrafficLight::for_category(100.0, 100.0), TrafficLight::Green);
        assert_eq!(TrafficLight::for_category(100.0, 100.01), TrafficLight::Red);
        assert_eq!(TrafficLight::for_category(100.0, 0.0), TrafficLight::Green);
        assert_eq!(TrafficLight::for_category(f64::NAN, 0.0), TrafficLight::Amber);
    }

    #[test]
    fn weekly_dashboard_partitions_spend() {
        let f = fixture();
        add_txn(&f, date(12, 9), 100_000, Direction::Credit, Some(f.income));
        add_txn(&f, date(12, 9), 10_000, Direction::Debit, Some(f.groceries));
        add_txn(&f, date(12, 10), 2_000, Direction::Debit, None);
        add_txn(&f, date(12, 10), 7_000, Direction::Debit, Some(f.fuel));
        // Outside the week
        add_txn(&f, date(12, 7), 9_999, Direction::Debit, Some(f.groceries));

        let summary = DashboardService::new(&f.storage, WeekStart::Monday)
            .dashboard_at(f.household, PeriodType::Week, at(12, 10, 12))
            .unwrap()
            .unwrap();

        assert_eq!(summary.bounds.start_date(), date(12, 8));
        assert_eq!(summary.categories.len(), 3);
        assert_eq!(summary.categories[0].id, f.income);

        let groceries = row(&summary, f.groceries);
        assert_eq!(groceries.budget, 100.0);
        assert_eq!(groceries.spend, 100.0);
        assert_eq!(groceries.status, TrafficLight::Green);

        let fuel = row(&summary, f.fuel);
        assert_eq!(fuel.status, TrafficLight::Red);
        assert_eq!(fuel.variance, -20.0);

        // Income transactions are not spend
        assert_eq!(row(&summary, f.income).spend, 0.0);

        assert_eq!(summary.totals.spend, 190.0);
        // Income lines stay out of the headline budget
        assert_eq!(summary.totals.budget, 150.0);
        assert_eq!(summary.totals.expense_budget, 150.0);
        assert_eq!(summary.totals.income_budget, 1000.0);
        assert_eq!(summary.totals.net_planned, 850.0);
        assert_eq!(summary.totals.status, TrafficLight::Red);
        assert_eq!(summary.totals.pacing, TrafficLight::Red);
    }

    #[test]
    fn weekly_dashboard_reads_previous_week_carry() {
        let f = fixture();
        f.storage
            .ledger
            .upsert(RolloverLedgerEntry {
                household_id: f.household,
                category_id: f.groceries,
                period_start: start_of_day(date(12, 1)),
                period_type: PeriodType::Week,
                carry_in: 0.0,
                carry_out: 25.0,
            })
            .unwrap();
        add_txn(&f, date(12, 9), 12_000, Direction::Debit, Some(f.groceries));

        let summary = DashboardService::new(&f.storage, WeekStart::Monday)
            .dashboard_at(f.household, PeriodType::Week, at(12, 10, 12))
            .unwrap()
            .unwrap();

        let groceries = row(&summary, f.groceries);
        assert_eq!(groceries.carry_in, 25.0);
        assert_eq!(groceries.available, 125.0);
        assert_eq!(groceries.status, TrafficLight::Green);
        assert_eq!(row(&summary, f.fuel).carry_in, 0.0);
    }

    #[test]
    fn sunday_weeks_read_the_overlapping_monday_chain() {
        let f = fixture();
        f.storage
            .ledger
            .upsert(RolloverLedgerEntry {
                household_id: f.household,
                category_id: f.groceries,
                period_start: start_of_day(date(12, 1)),
                period_type: PeriodType::Week,
                carry_in: 0.0,
                carry_out: 10.0,
            })
            .unwrap();

        // Sunday 7 Dec to Saturday 13 Dec overlaps the ledger week of 8 Dec
        let summary = DashboardService::new(&f.storage, WeekStart::Sunday)
            .dashboard_at(f.household, PeriodType::Week, at(12, 10, 12))
            .unwrap()
            .unwrap();

        assert_eq!(summary.bounds.start_date(), date(12, 7));
        assert_eq!(row(&summary, f.groceries).carry_in, 10.0);
    }

    #[test]
    fn longer_periods_scale_and_ignore_carry() {
        let f = fixture();
        f.storage
            .ledger
            .upsert(RolloverLedgerEntry {
                household_id: f.household,
                category_id: f.groceries,
                period_start: start_of_day(date(12, 1)),
                period_type: PeriodType::Week,
                carry_in: 0.0,
                carry_out: 25.0,
            })
            .unwrap();
        let service = DashboardService::new(&f.storage, WeekStart::Monday);

        let fortnight = service
            .dashboard_at(f.household, PeriodType::Fortnight, at(12, 10, 12))
            .unwrap()
            .unwrap();
        let groceries = row(&fortnight, f.groceries);
        assert_eq!(groceries.budget, 200.0);
        assert_eq!(groceries.carry_in, 0.0);

        let month = service
            .dashboard_at(f.household, PeriodType::Month, at(2, 10, 12))
            .unwrap()
            .unwrap();
        assert!((row(&month, f.groceries).budget - 400.0).abs() < 1e-3);
    }

    #[test]
    fn no_budget_means_no_dashboard() {
        let f = fixture();
        let summary = DashboardService::new(&f.storage, WeekStart::Monday)
            .dashboard_at(HouseholdId::new(), PeriodType::Week, at(12, 10, 12))
            .unwrap();
        assert!(summary.is_none());
    }

    #[test]
    fn pacing_compares_spend_to_elapsed_share() {
        let f = fixture();
        // Thursday noon of a Monday week: 3.5 of 7 days elapsed
        add_txn(&f, date(12, 8), 5_000, Direction::Debit, Some(f.groceries));
        let service = DashboardService::new(&f.storage, WeekStart::Monday);

        let summary = service
            .dashboard_at(f.household, PeriodType::Week, at(12, 11, 12))
            .unwrap()
            .unwrap();
        assert_eq!(summary.totals.pacing, TrafficLight::Green);
        assert!((summary.totals.pace_delta - 25.0).abs() < 0.01);

        add_txn(&f, date(12, 9), 4_000, Direction::Debit, Some(f.fuel));
        let summary = service
            .dashboard_at(f.household, PeriodType::Week, at(12, 11, 12))
            .unwrap()
            .unwrap();
        assert_eq!(summary.totals.pacing, TrafficLight::Amber);
        assert_eq!(summary.totals.status, TrafficLight::Green);
    }

    #[test]
    fn pacing_guards_zero_length_period() {
        let bounds = PeriodBounds {
            period_type: PeriodType::Week,
            start: at(12, 8, 0),
            end: at(12, 8, 0),
            week_start: WeekStart::Monday,
        };
        let (status, delta) = pacing(&bounds, at(12, 8, 0), 100.0, 40.0);
        assert_eq!(status, TrafficLight::Green);
        assert!((delta - 60.0).abs() < EPSILON);
    }

    #[test]
    fn freshness_uses_latest_transaction_or_import() {
        let f = fixture();
        let service = DashboardService::new(&f.storage, WeekStart::Monday);

        let empty = service
            .dashboard_at(f.household, PeriodType::Week, at(12, 10, 12))
            .unwrap()
            .unwrap();
        assert_eq!(empty.freshness_days, None);
        assert_eq!(empty.last_data_at, None);

        add_txn(&f, date(12, 6), 1_000, Direction::Debit, Some(f.fuel));
        let summary = service
            .dashboard_at(f.household, PeriodType::Week, at(12, 10, 12))
            .unwrap()
            .unwrap();
        assert_eq!(summary.last_data_at, Some(start_of_day(date(12, 6))));
        assert_eq!(summary.freshness_days, Some(4));

        let uploaded = Utc.with_ymd_and_hms(2025, 12, 1, 0, 0, 0).unwrap();
        let mut record = ImportRecord::pending(
            f.household,
            None,
            "old.csv".to_string(),
            "abc".to_string(),
            uploaded,
        );
        record.mark_parsed(1, 1, uploaded);
        f.storage.imports.upsert(record).unwrap();

        // An older import does not win over a newer transaction
        let summary = service
            .dashboard_at(f.household, PeriodType::Week, at(12, 10, 12))
            .unwrap()
            .unwrap();
        assert_eq!(summary.freshness_days, Some(4));
    }
}
