//! Employee model and related types.
//!
//! Employee records arrive from a storage collaborator already parsed; the
//! engine re-validates the payroll-relevant invariants (date order,
//! non-negative amounts) before computing a payment for them.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{EngineError, EngineResult};
use crate::models::money::{Currency, Money};
use crate::time::EmploymentPeriod;

/// How an employee's income tax is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxComputation {
    /// Progressive withholding under the single rates.
    Single,
    /// Progressive withholding under the married rates.
    Married,
    /// Progressive withholding under the parent rates.
    Parent,
    /// Flat-rate withholding on part-time emoluments.
    PartTime,
}

/// The social security contribution category an employee falls under.
///
/// Category codes use the spellings of the published contribution schedules,
/// which is also how they appear in the rate-table CSV files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SocialSecurityCategory {
    /// Category A.
    A,
    /// Category B.
    B,
    /// Category C/D, first threshold.
    #[serde(rename = "C/D #1")]
    CD1,
    /// Category C/D, second threshold.
    #[serde(rename = "C/D #2")]
    CD2,
    /// Category E.
    E,
    /// Category F.
    F,
}

impl fmt::Display for SocialSecurityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            SocialSecurityCategory::A => "A",
            SocialSecurityCategory::B => "B",
            SocialSecurityCategory::CD1 => "C/D #1",
            SocialSecurityCategory::CD2 => "C/D #2",
            SocialSecurityCategory::E => "E",
            SocialSecurityCategory::F => "F",
        };
        f.write_str(code)
    }
}

/// What an employee earned, and paid in tax, with a prior employer this year.
///
/// Both figures feed the first payment only; every later payment carries them
/// through the year-to-date totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PriorTaxInformation {
    /// Gross annual emoluments with the prior employer.
    pub gross_annual_emoluments: Decimal,
    /// Income tax the prior employer already withheld.
    pub income_tax: Decimal,
}

/// An employee a payroll is computed for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub key: String,
    /// The date the employee started employment.
    pub start_date: NaiveDate,
    /// The date the employee left, if they have.
    pub end_date: Option<NaiveDate>,
    /// Contracted hours per week; 40 is a full week.
    pub hours_per_week: Decimal,
    /// How the employee's income tax is computed.
    pub tax_computation: TaxComputation,
    /// The social security contribution category.
    pub social_security_category: SocialSecurityCategory,
    /// Gross annual salary in the payroll currency.
    pub gross_annual_salary: Decimal,
    /// Prior-employer earnings and withholding for the current year.
    #[serde(default)]
    pub prior_tax_information: PriorTaxInformation,
}

impl Employee {
    /// Whether the employee pays social security contributions.
    ///
    /// Part-time-taxed employees do not contribute on their own behalf.
    pub fn pays_social_security_contributions(&self) -> bool {
        self.tax_computation != TaxComputation::PartTime
    }

    /// The monthly wage: one twelfth of the annual salary, rounded to 2 decimals.
    pub fn monthly_wage(&self, currency: Currency) -> Money {
        Money::new(self.gross_annual_salary / Decimal::from(12), currency).round_dp(2)
    }

    /// The weekly wage: one fifty-second of the annual salary, rounded to 2 decimals.
    pub fn weekly_wage(&self, currency: Currency) -> Money {
        Money::new(self.gross_annual_salary / Decimal::from(52), currency).round_dp(2)
    }

    /// The employment span, open-ended while the employee is active.
    pub fn employment_period(&self) -> EmploymentPeriod {
        EmploymentPeriod {
            start: self.start_date,
            end: self.end_date,
        }
    }

    /// Checks the payroll-relevant invariants of the record.
    pub fn validate(&self) -> EngineResult<()> {
        let invalid = |message: String| EngineError::InvalidRecord {
            record: format!("employee '{}'", self.key),
            message,
        };
        if let Some(end_date) = self.end_date {
            if self.start_date > end_date {
                return Err(invalid(format!(
                    "end date {end_date} precedes start date {}",
                    self.start_date
                )));
            }
        }
        if self.hours_per_week < Decimal::ZERO {
            return Err(invalid(format!(
                "hours per week '{}' must be >= 0",
                self.hours_per_week
            )));
        }
        if self.gross_annual_salary < Decimal::ZERO {
            return Err(invalid(format!(
                "gross annual salary '{}' cannot be < 0",
                self.gross_annual_salary
            )));
        }
        if self.prior_tax_information.gross_annual_emoluments < Decimal::ZERO
            || self.prior_tax_information.income_tax < Decimal::ZERO
        {
            return Err(invalid(
                "prior tax information amounts cannot be < 0".to_string(),
            ));
        }
        Ok(())
    }
}
