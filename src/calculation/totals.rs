//! Derived totals over other line items.
//!
//! These rules contain no arithmetic of their own beyond sums; their job is
//! to pin down which items are taxable, which are deductions, and what the
//! employer owes the authority.

use crate::error::EngineResult;
use crate::models::{LineItemName, Money};

use super::Calculator;

/// Everything taxed as gross emoluments, 2 decimals.
pub(crate) fn total_taxable_gross_emoluments(
    resolver: &mut Calculator<'_>,
) -> EngineResult<Money> {
    Ok((resolver.value_of(LineItemName::BasicPayFullTime)?
        + resolver.value_of(LineItemName::BasicPayPartTime)?
        + resolver.value_of(LineItemName::ManualAdjustments)?
        + resolver.value_of(LineItemName::StatutoryBonus)?)
    .round_dp(2))
}

/// Everything withheld from the employee, 2 decimals.
pub(crate) fn total_deductions(resolver: &mut Calculator<'_>) -> EngineResult<Money> {
    Ok((resolver.value_of(LineItemName::IncomeTaxFullTime)?
        + resolver.value_of(LineItemName::IncomeTaxPartTime)?
        + resolver.value_of(LineItemName::SocialSecurityContributionEmployee)?)
    .round_dp(2))
}

/// What the employee is actually paid: taxable gross plus untaxed
/// reimbursements, less deductions, 2 decimals.
pub(crate) fn net_pay(resolver: &mut Calculator<'_>) -> EngineResult<Money> {
    Ok((resolver.value_of(LineItemName::TotalTaxableGrossEmoluments)?
        + resolver.value_of(LineItemName::Reimbursements)?
        - resolver.value_of(LineItemName::TotalDeductions)?)
    .round_dp(2))
}

/// The total remittance due to the tax authority: both income-tax variants,
/// both social security sides, and the maternity fund contribution.
pub(crate) fn tax_due(resolver: &mut Calculator<'_>) -> EngineResult<Money> {
    Ok(resolver.value_of(LineItemName::IncomeTaxFullTime)?
        + resolver.value_of(LineItemName::IncomeTaxPartTime)?
        + resolver.value_of(LineItemName::SocialSecurityContributionEmployee)?
        + resolver.value_of(LineItemName::SocialSecurityContributionEmployer)?
        + resolver.value_of(LineItemName::MaternityFundContributionEmployer)?)
}
