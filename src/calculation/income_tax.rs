//! Income tax withholding.
//!
//! Full-time-taxed employees are withheld progressively: the projected annual
//! liability, less what the year has already withheld, is smoothed in
//! proportion over the remaining pay periods. Part-time-taxed employees are
//! withheld at a flat configured rate on their taxable gross.

use chrono::Datelike;
use rust_decimal::Decimal;

use crate::error::EngineResult;
use crate::models::{Items, LineItemName, Money, Payment, TaxComputation};
use crate::tables::IncomeTaxTable;
use crate::time::months_left_in_year;

use super::Calculator;

/// This period's progressive withholding, rounded to whole units.
///
/// The remaining annual liability (projection minus year-to-date withheld) is
/// shared over this period and the months left in the year, weighted by the
/// fraction of the period worked.
pub(crate) fn compute_full_time(
    resolver: &mut Calculator<'_>,
    payment: &Payment,
    historical: &Items,
) -> EngineResult<Money> {
    if payment.employee.tax_computation == TaxComputation::PartTime {
        return Ok(Money::zero(payment.currency()));
    }

    let projected = resolver.projection_of(LineItemName::IncomeTaxFullTime)?;
    let remaining = projected - historical.income_tax_full_time;
    let months_remaining = Decimal::from(months_left_in_year(payment.period.end().month()));
    let periods = payment.time_worked + months_remaining;
    if periods.is_zero() {
        return Ok(Money::zero(payment.currency()));
    }
    Ok((remaining * (payment.time_worked / periods)).round_dp(0))
}

/// The projected annual income tax liability, rounded to whole units.
///
/// The full expected year of taxable income (prior-employer emoluments,
/// projected basic pay, adjustments to date, projected bonus) runs through
/// the progressive table; prior-employer withholding comes off the liability.
/// The result never drops below what the year has already withheld, so
/// withholding never decreases period over period.
pub(crate) fn project_full_time(
    table: &IncomeTaxTable,
    resolver: &mut Calculator<'_>,
    payment: &Payment,
    historical: &Items,
) -> EngineResult<Money> {
    if payment.employee.tax_computation == TaxComputation::PartTime {
        return Ok(historical.income_tax_full_time);
    }

    let projected_prior_gross_emoluments = resolver
        .value_of(LineItemName::PriorGrossEmoluments)?
        + historical.prior_gross_emoluments;
    let projected_basic_pay = resolver.projection_of(LineItemName::BasicPayFullTime)?;
    let projected_manual_adjustments = resolver.value_of(LineItemName::ManualAdjustments)?
        + historical.manual_adjustments;
    let projected_statutory_bonus = resolver.projection_of(LineItemName::StatutoryBonus)?;

    let total_taxable_amount = projected_prior_gross_emoluments
        + projected_basic_pay
        + projected_manual_adjustments
        + projected_statutory_bonus;
    let total_tax_liability = table.apply(total_taxable_amount);

    let prior_deduction = resolver.value_of(LineItemName::PriorIncomeTaxDeduction)?
        + historical.prior_income_tax_deduction;

    Ok((total_tax_liability - prior_deduction)
        .max(historical.income_tax_full_time)
        .round_dp(0))
}

/// Flat-rate withholding on part-time emoluments, rounded to whole units.
///
/// Zero for everyone except part-time-taxed employees.
pub(crate) fn compute_part_time(
    resolver: &mut Calculator<'_>,
    rate: Decimal,
    payment: &Payment,
) -> EngineResult<Money> {
    if payment.employee.tax_computation != TaxComputation::PartTime {
        return Ok(Money::zero(payment.currency()));
    }
    Ok((resolver.value_of(LineItemName::TotalTaxableGrossEmoluments)? * rate).round_dp(0))
}
