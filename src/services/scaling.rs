//! Weekly-to-period budget scaling
//!
//! Budgets are stored per week. A fortnight is exactly two weeks; months and
//! years are scaled by their real length in (fractional) weeks, so February
//! gets less than March.

use crate::models::{PeriodBounds, PeriodType};

const MILLIS_PER_WEEK: f64 = 7.0 * 86_400.0 * 1000.0;

/// Length of the bounds in weeks, measured from `start` to `end`
pub fn weeks_in_bounds(bounds: &PeriodBounds) -> f64 {
    bounds.milliseconds() as f64 / MILLIS_PER_WEEK
}

/// Scale a weekly amount to the given period.
///
/// Non-finite input yields `0.0`.
pub fn weekly_to_period(weekly: f64, period_type: PeriodType, bounds: &PeriodBounds) -> f64 {
    if !weekly.is_finite() {
        return 0.0;
    }

    match period_type {
        PeriodType::Week => weekly,
        PeriodType::Fortnight => weekly * 2.0,
        PeriodType::Month | PeriodType::Year => weekly * weeks_in_bounds(bounds),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WeekStart;
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    const EPSILON: f64 = 1e-3;

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn span(period_type: PeriodType, days: i64) -> PeriodBounds {
        PeriodBounds {
            period_type,
            start: start(),
            end: start() + Duration::days(days),
            week_start: WeekStart::Monday,
        }
    }

    #[test]
    fn seven_days_is_one_week() {
        assert!((weeks_in_bounds(&span(PeriodType::Week, 7)) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn half_week_is_fractional() {
        let bounds = PeriodBounds {
            end: start() + Duration::hours(84),
            ..span(PeriodType::Week, 0)
        };
        assert!((weeks_in_bounds(&bounds) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn week_is_identity() {
        assert_eq!(weekly_to_period(100.0, PeriodType::Week, &span(PeriodType::Week, 7)), 100.0);
    }

    #[test]
    fn fortnight_is_double_regardless_of_bounds() {
        assert_eq!(
            weekly_to_period(100.0, PeriodType::Fortnight, &span(PeriodType::Fortnight, 3)),
            200.0
        );
        assert_eq!(
            weekly_to_period(100.0, PeriodType::Fortnight, &span(PeriodType::Fortnight, 14)),
            200.0
        );
    }

    #[test]
    fn month_scales_by_length() {
        let feb = weekly_to_period(100.0, PeriodType::Month, &span(PeriodType::Month, 28));
        assert!((feb - 400.0).abs() < EPSILON);

        let thirty = weekly_to_period(100.0, PeriodType::Month, &span(PeriodType::Month, 30));
        assert!((thirty - 428.5714).abs() < EPSILON);
    }

    #[test]
    fn year_scales_by_length() {
        let year = weekly_to_period(100.0, PeriodType::Year, &span(PeriodType::Year, 364));
        assert!((year - 5200.0).abs() < EPSILON);
    }

    #[test]
    fn real_month_bounds_are_just_under_whole_days() {
        let reference = NaiveDate::from_ymd_opt(2025, 2, 10)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let bounds = PeriodBounds::containing(PeriodType::Month, reference, WeekStart::Monday);
        let scaled = weekly_to_period(100.0, PeriodType::Month, &bounds);
        assert!((scaled - 400.0).abs() < EPSILON);
    }

    #[test]
    fn non_finite_is_zero() {
        let bounds = span(PeriodType::Month, 30);
        assert_eq!(weekly_to_period(f64::NAN, PeriodType::Month, &bounds), 0.0);
        assert_eq!(weekly_to_period(f64::INFINITY, PeriodType::Week, &bounds), 0.0);
    }
}
