//! Calendar month periods
//!
//! A `Period` is a `YYYY-MM` string. Zero padding makes plain string
//! comparison chronological, so periods sort and range-check without
//! being parsed back into dates.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Length of a `YYYY-MM` period string
pub const PERIOD_LEN: usize = 7;

/// A calendar month identified by `YYYY-MM`
///
/// An empty period stands for a row whose month could not be resolved.
/// It sorts before every real month and never falls inside a `PeriodRange`.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Period(String);

impl Period {
    /// Truncate a date to its month
    pub fn from_date(date: NaiveDate) -> Self {
        Self(format!("{:04}-{:02}", date.year(), date.month()))
    }

    pub fn from_ym(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self::from_date)
    }

    /// Keep the leading `YYYY-MM` of a raw value such as `2024-01-01T00:00:00`
    ///
    /// Never fails: the result is whatever the first seven characters are.
    pub fn truncate(raw: &str) -> Self {
        Self(raw.trim().chars().take(PERIOD_LEN).collect())
    }

    /// Truncate like `truncate`, keeping the result only if it is a real month
    ///
    /// `2024-1-15` truncates to `2024-1-`, which is not zero-padded and would
    /// sort out of order, so it resolves to the empty period instead.
    pub fn resolve(raw: &str) -> Self {
        let period = Self::truncate(raw);
        if period.year_month().is_some() {
            period
        } else {
            Self::default()
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse the year and month, if this is a well-formed period
    pub fn year_month(&self) -> Option<(i32, u32)> {
        let (year, month) = self.0.split_once('-')?;
        if year.len() != 4 || month.len() != 2 {
            return None;
        }
        let year: i32 = year.parse().ok()?;
        let month: u32 = month.parse().ok()?;
        (1..=12).contains(&month).then_some((year, month))
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        let (year, month) = self.year_month()?;
        NaiveDate::from_ymd_opt(year, month, 1)
    }

    pub fn last_day(&self) -> Option<NaiveDate> {
        self.shift(1)?.first_day()?.pred_opt()
    }

    /// Move forward (positive) or backward (negative) by whole months
    pub fn shift(&self, months: i32) -> Option<Self> {
        let (year, month) = self.year_month()?;
        let total = year * 12 + (month as i32 - 1) + months;
        Self::from_ym(total.div_euclid(12), total.rem_euclid(12) as u32 + 1)
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let period = Self::truncate(s);
        match period.year_month() {
            Some(_) => Ok(period),
            None => Err(format!("Invalid period: {} (expected YYYY-MM)", s)),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Inclusive range of periods
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodRange {
    pub from: Period,
    pub to: Period,
}

impl PeriodRange {
    pub fn new(from: Period, to: Period) -> Self {
        Self { from, to }
    }

    /// A single month
    pub fn month(period: Period) -> Self {
        Self {
            from: period.clone(),
            to: period,
        }
    }

    /// The trailing `months` months ending with the month containing `today`
    ///
    /// `months` below 1 is treated as 1.
    pub fn trailing(today: NaiveDate, months: u32) -> Self {
        let to = Period::from_date(today);
        let back = months.max(1) as i32 - 1;
        let from = to.shift(-back).unwrap_or_else(|| to.clone());
        Self { from, to }
    }

    /// Inclusive membership; only well-formed periods are ever inside
    pub fn contains(&self, period: &Period) -> bool {
        period.year_month().is_some() && self.from <= *period && *period <= self.to
    }

    /// First day of the first month and last day of the last month
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.from.first_day()?, self.to.last_day()?))
    }
}

/// Days elapsed in the month of `today`, counting today
pub fn days_elapsed(today: NaiveDate) -> u32 {
    today.day()
}
