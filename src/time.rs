//! Period and date arithmetic.
//!
//! This module contains the [`Period`] and [`EmploymentPeriod`] types and the
//! pure date functions that underlie nearly every payroll computation:
//! inclusive day counts, months left in the year, the Monday count used by the
//! week-paid contribution scheme, and the fraction of a period an employee
//! actually worked. All counts are exact to the day.

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A closed, inclusive date range.
///
/// A period represents either a payroll month or any other bounded span.
/// Construction enforces `start <= end`; deserialization re-validates.
///
/// # Example
///
/// ```
/// use payroll_engine::time::Period;
///
/// let january = Period::month(2024, 1).unwrap();
/// assert_eq!(january.start().to_string(), "2024-01-01");
/// assert_eq!(january.end().to_string(), "2024-01-31");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPeriod")]
pub struct Period {
    start: NaiveDate,
    end: NaiveDate,
}

/// Unvalidated mirror of [`Period`] used during deserialization.
#[derive(Deserialize)]
struct RawPeriod {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawPeriod> for Period {
    type Error = EngineError;

    fn try_from(raw: RawPeriod) -> EngineResult<Self> {
        Period::new(raw.start, raw.end)
    }
}

impl Period {
    /// Creates a period, failing if `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> EngineResult<Self> {
        if start > end {
            return Err(EngineError::InvalidPeriod { start, end });
        }
        Ok(Self { start, end })
    }

    /// Creates the period covering one calendar month.
    pub fn month(year: i32, month: u32) -> EngineResult<Self> {
        let start =
            NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| EngineError::InvalidRecord {
                record: format!("period {year}-{month:02}"),
                message: "not a valid calendar month".to_string(),
            })?;
        let end = start
            .checked_add_months(Months::new(1))
            .and_then(|first_of_next| first_of_next.pred_opt())
            .ok_or_else(|| EngineError::InvalidRecord {
                record: format!("period {year}-{month:02}"),
                message: "month end is out of the supported date range".to_string(),
            })?;
        Ok(Self { start, end })
    }

    /// The first day of the period (inclusive).
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// The last day of the period (inclusive).
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Checks whether a date falls within the period, inclusive of both ends.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// An employment span whose end may still be open.
///
/// The end date is `None` while the employee is still active; date arithmetic
/// bounds an open span by the payment period under consideration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmploymentPeriod {
    /// The employment start date.
    pub start: NaiveDate,
    /// The employment end date, if the employee has left.
    pub end: Option<NaiveDate>,
}

impl EmploymentPeriod {
    /// Creates an employment span, failing if a known end precedes the start.
    pub fn new(start: NaiveDate, end: Option<NaiveDate>) -> EngineResult<Self> {
        if let Some(end) = end {
            if start > end {
                return Err(EngineError::InvalidPeriod { start, end });
            }
        }
        Ok(Self { start, end })
    }
}

/// Counts the days between two dates, inclusive of both.
///
/// The order of the arguments does not matter.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use payroll_engine::time::days_between;
///
/// let first = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let last = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
/// assert_eq!(days_between(first, last), 31);
/// assert_eq!(days_between(last, first), 31);
/// ```
pub fn days_between(d1: NaiveDate, d2: NaiveDate) -> i64 {
    (d2 - d1).num_days().abs() + 1
}

/// Counts the months left in the year after the given month.
///
/// ```
/// use payroll_engine::time::months_left_in_year;
///
/// assert_eq!(months_left_in_year(1), 11);
/// assert_eq!(months_left_in_year(12), 0);
/// ```
pub fn months_left_in_year(from_month: u32) -> u32 {
    12u32.saturating_sub(from_month)
}

/// Counts the Mondays an employee is engaged for during a payment period.
///
/// The count covers the inclusive intersection of the employment span and the
/// payment period; an open employment end is bounded by the payment period's
/// end. Social security and maternity fund contributions are due once per
/// Monday under the week-paid scheme.
pub fn weeks_worked(employment: &EmploymentPeriod, period: &Period) -> u32 {
    let start = employment.start.max(period.start());
    let end = match employment.end {
        Some(employment_end) => employment_end.min(period.end()),
        None => period.end(),
    };
    if start > end {
        return 0;
    }
    let days_until_monday = (7 - start.weekday().num_days_from_monday()) % 7;
    let first_monday = start + Duration::days(i64::from(days_until_monday));
    if first_monday > end {
        return 0;
    }
    ((end - first_monday).num_days() / 7 + 1) as u32
}

/// The fraction of a payment period covered by an employment span.
///
/// Returns 0 when the employee starts after the period or leaves before it.
/// Otherwise the result is the inclusive overlap day count divided by the
/// inclusive period day count, rounded to 2 decimals; a full-period engagement
/// yields exactly 1.00.
pub fn fraction_of_period_worked(
    employment: &EmploymentPeriod,
    period: &Period,
) -> rust_decimal::Decimal {
    use rust_decimal::Decimal;

    if employment.start > period.end() {
        return Decimal::ZERO;
    }
    if let Some(end) = employment.end {
        if end < period.start() {
            return Decimal::ZERO;
        }
    }
    let overlap_start = employment.start.max(period.start());
    let overlap_end = match employment.end {
        Some(employment_end) => employment_end.min(period.end()),
        None => period.end(),
    };
    let overlap = Decimal::from(days_between(overlap_start, overlap_end));
    let total = Decimal::from(days_between(period.start(), period.end()));
    (overlap / total).round_dp(2)
}
