//! The government statutory bonus.
//!
//! The bonus schedule names the months a bonus is paid in and the full amount
//! for each. An employee who started within the six months before a bonus
//! month's end receives a linear share of that month's bonus; everyone else
//! receives it in full. Either way the amount scales with contracted hours
//! against a 40-hour week.

use chrono::{Datelike, Months};
use rust_decimal::Decimal;

use crate::error::EngineResult;
use crate::models::{Employee, Items, Money, Payment};
use crate::tables::MonetaryBonusTable;
use crate::time::{Period, days_between};

/// The weekly hours of a full-time engagement; bonus amounts scale against it.
pub const FULL_TIME_WEEK_HOURS: u32 = 40;

/// The statutory bonus for the payment's month, 2 decimals.
pub(crate) fn compute(table: &MonetaryBonusTable, payment: &Payment) -> EngineResult<Money> {
    let start = payment.period.start();
    let bonus = bonus_for_month(table, start.year(), start.month(), &payment.employee)?;
    let scaled = bonus * hours_scale(&payment.employee);
    Ok(Money::new(scaled, payment.currency()).round_dp(2))
}

/// Projected full-year statutory bonus.
///
/// The same rule summed across the payment's month and every later month of
/// the year, plus the year-to-date bonus already paid out.
pub(crate) fn project(
    table: &MonetaryBonusTable,
    payment: &Payment,
    historical: &Items,
) -> EngineResult<Money> {
    let start = payment.period.start();
    let mut bonus = Decimal::ZERO;
    for month in start.month()..=12 {
        bonus += bonus_for_month(table, start.year(), month, &payment.employee)?;
    }
    let scaled = bonus * hours_scale(&payment.employee);
    Ok(Money::new(scaled, payment.currency()).round_dp(2) + historical.statutory_bonus)
}

fn hours_scale(employee: &Employee) -> Decimal {
    employee.hours_per_week / Decimal::from(FULL_TIME_WEEK_HOURS)
}

/// The unscaled bonus an employee is entitled to for one month.
///
/// Months the schedule does not name pay nothing. For named months, an
/// employee whose start date precedes the six-month window before month-end
/// gets the full amount; a start inside the window pro-rates linearly by
/// elapsed days over window days, both counted inclusively from month-end.
fn bonus_for_month(
    table: &MonetaryBonusTable,
    year: i32,
    month: u32,
    employee: &Employee,
) -> EngineResult<Decimal> {
    let Some(entry) = table.entry_for(month) else {
        return Ok(Decimal::ZERO);
    };
    let month_end = Period::month(year, month)?.end();
    let window_start = month_end - Months::new(6);
    if employee.start_date < window_start {
        return Ok(entry.bonus);
    }
    let elapsed = Decimal::from(days_between(month_end, employee.start_date));
    let window = Decimal::from(days_between(month_end, window_start));
    Ok(entry.bonus * (elapsed / window))
}
