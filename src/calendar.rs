//! Buddhist Era / Gregorian calendar normalization.
//!
//! Users filter by Buddhist Era (B.E.) years. Some kinds store their domain
//! year directly in B.E.; others store Gregorian civil dates. This module
//! converts between the two at whole-year granularity.
//!
//! All arithmetic is on civil calendar dates. There is no timezone handling:
//! timestamps are read in UTC.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Difference between a Buddhist Era year and the matching Gregorian year.
pub const BUDDHIST_ERA_OFFSET: i32 = 543;

/// A calendar year in the Buddhist Era.
///
/// # Examples
///
/// ```
/// use heritage_report::calendar::{to_buddhist_year, BuddhistYear};
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
/// assert_eq!(to_buddhist_year(date), BuddhistYear::new(2566));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuddhistYear(i32);

impl BuddhistYear {
    /// Wraps a raw B.E. year. No plausibility check is made.
    #[must_use]
    pub const fn new(year: i32) -> Self {
        Self(year)
    }

    /// Returns the raw B.E. year.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for BuddhistYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for BuddhistYear {
    fn from(year: i32) -> Self {
        Self(year)
    }
}

/// A half-open range of civil dates: `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YearRange {
    /// First day of the range (inclusive).
    pub start: NaiveDate,

    /// First day after the range (exclusive).
    pub end: NaiveDate,
}

impl YearRange {
    /// Check if a date falls within this range `[start, end)`.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} → {})", self.start, self.end)
    }
}

/// Converts a B.E. year into the Gregorian dates it covers.
///
/// `start` is 1 January of `year - 543`, `end` is 1 January of the following
/// Gregorian year.
///
/// # Errors
///
/// Returns `ValidationError::YearOutOfRange` if either bound falls outside the
/// dates chrono can represent.
pub fn to_gregorian_year_range(year: BuddhistYear) -> Result<YearRange, ValidationError> {
    let out_of_range = || ValidationError::YearOutOfRange { year: year.get() };
    let gregorian = year
        .get()
        .checked_sub(BUDDHIST_ERA_OFFSET)
        .ok_or_else(out_of_range)?;
    let start = NaiveDate::from_ymd_opt(gregorian, 1, 1).ok_or_else(out_of_range)?;
    let end = gregorian
        .checked_add(1)
        .and_then(|next| NaiveDate::from_ymd_opt(next, 1, 1))
        .ok_or_else(out_of_range)?;
    Ok(YearRange { start, end })
}

/// Returns the B.E. year of a Gregorian date or timestamp.
#[must_use]
pub fn to_buddhist_year<D: Datelike>(date: D) -> BuddhistYear {
    BuddhistYear(date.year() + BUDDHIST_ERA_OFFSET)
}
