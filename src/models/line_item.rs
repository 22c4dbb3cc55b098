//! Line-item names, the per-payment items mapping, and stored aggregates.
//!
//! A payslip is a fixed, closed set of named monetary figures. [`LineItemName`]
//! enumerates the names, [`Items`] maps every name to an amount for one
//! payment, and [`LineItem`] is the per-item aggregate shape that storage
//! collaborators persist across a year.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::ops::Add;

use crate::error::{EngineError, EngineResult};
use crate::models::money::{Currency, Money};

/// The closed set of line-item names a payment is made of.
///
/// The set is fixed by the statutory forms the computed figures feed into;
/// there is deliberately no way to extend it at runtime.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LineItemName {
    /// Gross emoluments earned with a prior employer this year.
    PriorGrossEmoluments,
    /// Salaried pay for the period, pro-rated by time worked.
    BasicPayFullTime,
    /// Hourly pay accumulated from work logs.
    BasicPayPartTime,
    /// One-off taxed adjustments credited alongside the salary.
    ManualAdjustments,
    /// The statutory bonus for the period's month.
    StatutoryBonus,
    /// The sum of all taxable gross emoluments.
    TotalTaxableGrossEmoluments,
    /// Income tax already withheld by a prior employer this year.
    PriorIncomeTaxDeduction,
    /// Progressive income tax withheld for full-time-taxed employees.
    IncomeTaxFullTime,
    /// Flat-rate income tax withheld for part-time-taxed employees.
    IncomeTaxPartTime,
    /// The employee's share of the social security contribution.
    SocialSecurityContributionEmployee,
    /// The employer's share of the social security contribution.
    SocialSecurityContributionEmployer,
    /// Everything deducted from the employee's gross pay.
    TotalDeductions,
    /// The employer's maternity fund contribution.
    MaternityFundContributionEmployer,
    /// Untaxed expense reimbursements credited alongside the salary.
    Reimbursements,
    /// The amount actually paid out to the employee.
    NetPay,
    /// The total remittance due to the tax authority.
    TaxDue,
}

/// An immutable mapping of every [`LineItemName`] to a monetary amount.
///
/// `Items` supports a zero identity and pointwise addition, which is how
/// year-to-date totals are accumulated across a year's payments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Items {
    /// Gross emoluments earned with a prior employer this year.
    pub prior_gross_emoluments: Money,
    /// Salaried pay for the period, pro-rated by time worked.
    pub basic_pay_full_time: Money,
    /// Hourly pay accumulated from work logs.
    pub basic_pay_part_time: Money,
    /// One-off taxed adjustments credited alongside the salary.
    pub manual_adjustments: Money,
    /// The statutory bonus for the period's month.
    pub statutory_bonus: Money,
    /// The sum of all taxable gross emoluments.
    pub total_taxable_gross_emoluments: Money,
    /// Income tax already withheld by a prior employer this year.
    pub prior_income_tax_deduction: Money,
    /// Progressive income tax withheld for full-time-taxed employees.
    pub income_tax_full_time: Money,
    /// Flat-rate income tax withheld for part-time-taxed employees.
    pub income_tax_part_time: Money,
    /// The employee's share of the social security contribution.
    pub social_security_contribution_employee: Money,
    /// The employer's share of the social security contribution.
    pub social_security_contribution_employer: Money,
    /// Everything deducted from the employee's gross pay.
    pub total_deductions: Money,
    /// The employer's maternity fund contribution.
    pub maternity_fund_contribution_employer: Money,
    /// Untaxed expense reimbursements credited alongside the salary.
    pub reimbursements: Money,
    /// The amount actually paid out to the employee.
    pub net_pay: Money,
    /// The total remittance due to the tax authority.
    pub tax_due: Money,
}

impl Items {
    /// The additive identity: every item zero in the given currency.
    pub fn zero(currency: Currency) -> Self {
        let zero = Money::zero(currency);
        Self {
            prior_gross_emoluments: zero,
            basic_pay_full_time: zero,
            basic_pay_part_time: zero,
            manual_adjustments: zero,
            statutory_bonus: zero,
            total_taxable_gross_emoluments: zero,
            prior_income_tax_deduction: zero,
            income_tax_full_time: zero,
            income_tax_part_time: zero,
            social_security_contribution_employee: zero,
            social_security_contribution_employer: zero,
            total_deductions: zero,
            maternity_fund_contribution_employer: zero,
            reimbursements: zero,
            net_pay: zero,
            tax_due: zero,
        }
    }

    /// Looks up the amount for a line-item name.
    pub fn get(&self, name: LineItemName) -> Money {
        match name {
            LineItemName::PriorGrossEmoluments => self.prior_gross_emoluments,
            LineItemName::BasicPayFullTime => self.basic_pay_full_time,
            LineItemName::BasicPayPartTime => self.basic_pay_part_time,
            LineItemName::ManualAdjustments => self.manual_adjustments,
            LineItemName::StatutoryBonus => self.statutory_bonus,
            LineItemName::TotalTaxableGrossEmoluments => self.total_taxable_gross_emoluments,
            LineItemName::PriorIncomeTaxDeduction => self.prior_income_tax_deduction,
            LineItemName::IncomeTaxFullTime => self.income_tax_full_time,
            LineItemName::IncomeTaxPartTime => self.income_tax_part_time,
            LineItemName::SocialSecurityContributionEmployee => {
                self.social_security_contribution_employee
            }
            LineItemName::SocialSecurityContributionEmployer => {
                self.social_security_contribution_employer
            }
            LineItemName::TotalDeductions => self.total_deductions,
            LineItemName::MaternityFundContributionEmployer => {
                self.maternity_fund_contribution_employer
            }
            LineItemName::Reimbursements => self.reimbursements,
            LineItemName::NetPay => self.net_pay,
            LineItemName::TaxDue => self.tax_due,
        }
    }
}

impl Add for Items {
    type Output = Items;

    fn add(self, other: Items) -> Items {
        Items {
            prior_gross_emoluments: self.prior_gross_emoluments + other.prior_gross_emoluments,
            basic_pay_full_time: self.basic_pay_full_time + other.basic_pay_full_time,
            basic_pay_part_time: self.basic_pay_part_time + other.basic_pay_part_time,
            manual_adjustments: self.manual_adjustments + other.manual_adjustments,
            statutory_bonus: self.statutory_bonus + other.statutory_bonus,
            total_taxable_gross_emoluments: self.total_taxable_gross_emoluments
                + other.total_taxable_gross_emoluments,
            prior_income_tax_deduction: self.prior_income_tax_deduction
                + other.prior_income_tax_deduction,
            income_tax_full_time: self.income_tax_full_time + other.income_tax_full_time,
            income_tax_part_time: self.income_tax_part_time + other.income_tax_part_time,
            social_security_contribution_employee: self.social_security_contribution_employee
                + other.social_security_contribution_employee,
            social_security_contribution_employer: self.social_security_contribution_employer
                + other.social_security_contribution_employer,
            total_deductions: self.total_deductions + other.total_deductions,
            maternity_fund_contribution_employer: self.maternity_fund_contribution_employer
                + other.maternity_fund_contribution_employer,
            reimbursements: self.reimbursements + other.reimbursements,
            net_pay: self.net_pay + other.net_pay,
            tax_due: self.tax_due + other.tax_due,
        }
    }
}

/// The stored aggregate of one line item across a year.
///
/// Storage collaborators persist one of these per line item and payment:
/// the current period's amount, the running year-to-date total, and the
/// projected full-year figure. Stored aggregates are never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LineItem {
    /// The amount computed for the current payroll period.
    pub current_period: Decimal,
    /// The cumulative amount since the start of the year.
    pub year_to_date: Decimal,
    /// The amount the engine projects by the end of the year.
    pub projected_yearly: Decimal,
}

impl LineItem {
    /// Creates a stored aggregate, rejecting negative amounts.
    pub fn new(
        current_period: Decimal,
        year_to_date: Decimal,
        projected_yearly: Decimal,
    ) -> EngineResult<Self> {
        let aggregate = Self {
            current_period,
            year_to_date,
            projected_yearly,
        };
        aggregate.validate()?;
        Ok(aggregate)
    }

    /// Checks that every stored amount is non-negative.
    pub fn validate(&self) -> EngineResult<()> {
        for (field, value) in [
            ("current_period", self.current_period),
            ("year_to_date", self.year_to_date),
            ("projected_yearly", self.projected_yearly),
        ] {
            if value < Decimal::ZERO {
                return Err(EngineError::InvalidRecord {
                    record: "line item".to_string(),
                    message: format!("{field} amount '{value}' cannot be < 0"),
                });
            }
        }
        Ok(())
    }
}
