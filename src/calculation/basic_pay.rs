//! Basic pay: salaried full-time and work-log part-time.

use chrono::Datelike;
use rust_decimal::Decimal;

use crate::error::EngineResult;
use crate::models::{Items, LineItemName, Money, Payment, TaxComputation, TransactionStore, WorkLog};
use crate::time::months_left_in_year;

use super::Calculator;

/// Salaried pay for the period: `monthly wage * fraction worked`, 2 decimals.
///
/// Part-time-taxed employees earn through work logs instead and get zero here.
pub(crate) fn compute_full_time(payment: &Payment) -> Money {
    if payment.employee.tax_computation == TaxComputation::PartTime {
        return Money::zero(payment.currency());
    }
    (payment.monthly_wage * payment.time_worked).round_dp(2)
}

/// Projected full-year salaried pay.
///
/// This period's value plus the year-to-date total plus a full monthly wage
/// for every month left in the year. For part-time-taxed employees the
/// projection degrades to the year-to-date total.
pub(crate) fn project_full_time(
    resolver: &mut Calculator<'_>,
    payment: &Payment,
    historical: &Items,
) -> EngineResult<Money> {
    if payment.employee.tax_computation == TaxComputation::PartTime {
        return Ok(historical.basic_pay_full_time);
    }
    let months_remaining = months_left_in_year(payment.period.end().month());
    Ok(resolver.value_of(LineItemName::BasicPayFullTime)?
        + historical.basic_pay_full_time
        + payment.monthly_wage * Decimal::from(months_remaining))
}

/// Payslip narration: how much of the month was worked.
pub(crate) fn describe_full_time(payment: &Payment) -> Option<String> {
    Some(format!("{} months", payment.time_worked))
}

/// Hourly pay: `hours * hourly wage` summed over the period's work logs.
pub(crate) fn compute_part_time(
    store: &dyn TransactionStore<WorkLog>,
    payment: &Payment,
) -> Money {
    let period = payment.period;
    let mut total = Money::zero(payment.currency());
    for log in store.stream(
        &payment.employee.key,
        period.start().year(),
        &|log: &WorkLog| period.contains(log.dated),
    ) {
        total += log.hourly_wage * log.hours;
    }
    total
}

/// Payslip narration: the hours behind the work-log sum.
pub(crate) fn describe_part_time(
    store: &dyn TransactionStore<WorkLog>,
    payment: &Payment,
) -> Option<String> {
    let period = payment.period;
    let mut hours = Decimal::ZERO;
    for log in store.stream(
        &payment.employee.key,
        period.start().year(),
        &|log: &WorkLog| period.contains(log.dated),
    ) {
        hours += log.hours;
    }
    Some(format!("{hours} hours"))
}
