//! Week-paid social security and maternity fund contributions.
//!
//! Contributions are due once per Monday the employee is engaged for in the
//! payment period: the category rate applied to the weekly wage, times the
//! Monday count. The employee-side social security contribution is zero for
//! part-time-taxed employees; the employer-side contribution and the
//! maternity fund contribution always apply.

use rust_decimal::Decimal;

use crate::error::EngineResult;
use crate::models::{Money, Payment};
use crate::tables::CategoryRateTable;

/// The weekly category rate times the period's Monday count, 2 decimals.
pub(crate) fn weekly_contribution(
    table: &CategoryRateTable,
    payment: &Payment,
) -> EngineResult<Money> {
    let weekly = table.apply(payment.employee.social_security_category, payment.weekly_wage)?;
    Ok((weekly * Decimal::from(payment.weeks_worked)).round_dp(2))
}

/// The employee-side social security contribution.
pub(crate) fn employee_social_security(
    table: &CategoryRateTable,
    payment: &Payment,
) -> EngineResult<Money> {
    if !payment.employee.pays_social_security_contributions() {
        return Ok(Money::zero(payment.currency()));
    }
    weekly_contribution(table, payment)
}

/// Payslip narration: the number of contribution weeks.
pub(crate) fn describe_weeks(payment: &Payment) -> Option<String> {
    Some(format!("{} weeks", payment.weeks_worked))
}
