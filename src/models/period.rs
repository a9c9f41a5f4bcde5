//! Period windows for dashboards and the rollover ledger
//!
//! A [`PeriodBounds`] is the concrete local-time window for one period type
//! around a reference instant. Weekly and fortnightly windows align to the
//! configured first day of the week; monthly and yearly windows follow the
//! calendar. `end` is always the last millisecond of the final day.

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Granularity of a budget view
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    #[default]
    Week,
    Fortnight,
    Month,
    Year,
}

impl PeriodType {
    pub const ALL: [PeriodType; 4] = [Self::Week, Self::Fortnight, Self::Month, Self::Year];

    /// Parse a period type from free text, falling back to WEEK.
    ///
    /// Used for values that arrive as text from settings or the command line.
    /// An unrecognised value is logged and treated as a week.
    pub fn parse_or_week(s: &str) -> Self {
        match s.parse() {
            Ok(period_type) => period_type,
            Err(_) => {
                tracing::warn!(value = s, "unknown period type, using week");
                Self::Week
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Fortnight => "fortnight",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PeriodType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "week" | "weekly" => Ok(Self::Week),
            "fortnight" | "fortnightly" => Ok(Self::Fortnight),
            "month" | "monthly" => Ok(Self::Month),
            "year" | "yearly" => Ok(Self::Year),
            other => Err(format!("Unknown period type: {}", other)),
        }
    }
}

/// First day of the week for WEEK and FORTNIGHT windows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

impl WeekStart {
    /// The first day of the week containing `date`
    pub fn start_of_week(&self, date: NaiveDate) -> NaiveDate {
        let offset = match self {
            Self::Monday => date.weekday().num_days_from_monday(),
            Self::Sunday => date.weekday().num_days_from_sunday(),
        };
        date - Duration::days(i64::from(offset))
    }
}

impl fmt::Display for WeekStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Monday => write!(f, "monday"),
            Self::Sunday => write!(f, "sunday"),
        }
    }
}

impl FromStr for WeekStart {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monday" | "mon" => Ok(Self::Monday),
            "sunday" | "sun" => Ok(Self::Sunday),
            other => Err(format!("Unknown week start: {}", other)),
        }
    }
}

/// Inclusive local-time window for one period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodBounds {
    pub period_type: PeriodType,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub week_start: WeekStart,
}

impl PeriodBounds {
    /// The window of `period_type` that contains `reference`
    pub fn containing(
        period_type: PeriodType,
        reference: NaiveDateTime,
        week_start: WeekStart,
    ) -> Self {
        let date = reference.date();
        let (first, last) = match period_type {
            PeriodType::Week => {
                let first = week_start.start_of_week(date);
                (first, first + Duration::days(6))
            }
            PeriodType::Fortnight => {
                let first = week_start.start_of_week(date);
                let second_week = week_start.start_of_week(first + Duration::days(13));
                (first, second_week + Duration::days(6))
            }
            PeriodType::Month => {
                let first = first_of_month(date);
                (first, first_of_month(first + Duration::days(32)) - Duration::days(1))
            }
            PeriodType::Year => {
                let first = first_of_year(date);
                (first, first_of_year(first + Duration::days(366)) - Duration::days(1))
            }
        };

        Self {
            period_type,
            start: start_of_day(first),
            end: end_of_day(last),
            week_start,
        }
    }

    /// The window immediately before this one
    pub fn previous(&self) -> Self {
        let start = self.start.date();
        let reference = match self.period_type {
            PeriodType::Week | PeriodType::Fortnight => start - Duration::days(1),
            PeriodType::Month => start
                .checked_sub_months(Months::new(1))
                .unwrap_or(start - Duration::days(1)),
            PeriodType::Year => start
                .checked_sub_months(Months::new(12))
                .unwrap_or(start - Duration::days(1)),
        };
        Self::containing(self.period_type, start_of_day(reference), self.week_start)
    }

    /// Whole seconds from `start` to `end`
    pub fn seconds(&self) -> i64 {
        (self.end - self.start).num_seconds()
    }

    /// Milliseconds from `start` to `end`
    pub fn milliseconds(&self) -> i64 {
        (self.end - self.start).num_milliseconds()
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end.date()
    }

    /// Check whether a calendar date falls inside the window
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date() && date <= self.end_date()
    }
}

impl fmt::Display for PeriodBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} to {}",
            self.period_type,
            self.start_date(),
            self.end_date()
        )
    }
}

/// Midnight at the start of `date`
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::default())
}

/// 23:59:59.999 on `date`
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    start_of_day(date) + Duration::days(1) - Duration::milliseconds(1)
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

fn first_of_year(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.ordinal0()))
}
