//! Calculation logic for the payroll engine.
//!
//! This module contains one calculation per line item: the prior-employment
//! carry-overs, salaried and hourly basic pay, the statutory bonus with its
//! six-month pro-ration window, progressive and flat-rate income tax
//! withholding, the week-paid social security and maternity fund
//! contributions, and the derived totals. The [`Calculator`] resolves the
//! dependencies between them on demand, memoizing every result.
//!
//! Calculations form a closed set of tagged variants rather than open-ended
//! dynamic dispatch: the full set of line items is fixed by the statutory
//! forms, and a closed enum keeps every rule visible in one place. Variants
//! borrow the shared read-only rate tables and the transaction-store
//! collaborators they need.

mod adjustments;
mod basic_pay;
mod calculator;
mod contributions;
mod income_tax;
mod prior_employment;
mod statutory_bonus;
mod totals;

pub use calculator::Calculator;
pub use statutory_bonus::FULL_TIME_WEEK_HOURS;

use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    Items, LineItemName, ManualAdjustment, Money, Payment, Reimbursement, TransactionStore,
    WorkLog,
};
use crate::tables::{CategoryRateTable, IncomeTaxTable, MonetaryBonusTable, RateTables};

/// The outcome of asking a calculation for its annual projection.
///
/// Callers must handle both cases; a non-projectable item never silently
/// projects to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// The projected full-year amount.
    Projected(Money),
    /// The line item has no meaningful annual projection.
    NotProjectable,
}

/// One line item's calculation.
///
/// Every variant can `compute` this period's value; some can also `project`
/// the expected full-year figure, and some narrate themselves for the
/// payslip via `describe`.
#[derive(Clone, Copy)]
pub enum Calculation<'a> {
    /// Always zero; for wiring names an employer does not use.
    Zero,
    /// Prior-employer gross emoluments, contributed on the first payment only.
    PriorGrossEmoluments,
    /// Prior-employer withheld tax, contributed on the first payment only.
    PriorIncomeTaxDeduction,
    /// Sum of taxed one-off adjustments dated within the period.
    ManualAdjustments {
        /// The manual adjustment records collaborator.
        store: &'a dyn TransactionStore<ManualAdjustment>,
    },
    /// Salaried pay pro-rated by the fraction of the period worked.
    BasicPayFullTime,
    /// Hourly pay summed over the period's work logs.
    BasicPayPartTime {
        /// The work log records collaborator.
        store: &'a dyn TransactionStore<WorkLog>,
    },
    /// The statutory bonus for the period's month.
    StatutoryBonus {
        /// The month-keyed bonus schedule.
        table: &'a MonetaryBonusTable,
    },
    /// Sum of all taxable gross emoluments.
    TotalTaxableGrossEmoluments,
    /// Progressive income tax smoothed over the remaining periods.
    IncomeTaxFullTime {
        /// The progressive bracket schedule.
        table: &'a IncomeTaxTable,
    },
    /// Flat-rate income tax on part-time emoluments.
    IncomeTaxPartTime {
        /// The flat withholding rate.
        rate: Decimal,
    },
    /// The employee's share of the social security contribution.
    SocialSecurityEmployee {
        /// The category-keyed contribution schedule.
        table: &'a CategoryRateTable,
    },
    /// The employer's share of the social security contribution.
    SocialSecurityEmployer {
        /// The category-keyed contribution schedule.
        table: &'a CategoryRateTable,
    },
    /// The employer's maternity fund contribution.
    MaternityFund {
        /// The category-keyed contribution schedule.
        table: &'a CategoryRateTable,
    },
    /// Everything deducted from the employee's gross pay.
    TotalDeductions,
    /// Sum of untaxed reimbursements dated within the period.
    Reimbursements {
        /// The reimbursement records collaborator.
        store: &'a dyn TransactionStore<Reimbursement>,
    },
    /// What the employee is actually paid.
    NetPay,
    /// The total remittance due to the tax authority.
    TaxDue,
}

impl<'a> Calculation<'a> {
    /// Computes this line item's value for the current payment.
    ///
    /// `resolver` resolves other line items; every call through it creates a
    /// dependency edge. `historical` holds the aggregated items of all prior
    /// same-year payments.
    pub fn compute(
        &self,
        resolver: &mut Calculator<'a>,
        payment: &Payment,
        historical: &Items,
    ) -> EngineResult<Money> {
        match self {
            Calculation::Zero => Ok(Money::zero(payment.currency())),
            Calculation::PriorGrossEmoluments => {
                Ok(prior_employment::prior_gross_emoluments(payment))
            }
            Calculation::PriorIncomeTaxDeduction => {
                Ok(prior_employment::prior_income_tax_deduction(payment))
            }
            Calculation::ManualAdjustments { store } => {
                Ok(adjustments::manual_adjustments(*store, payment))
            }
            Calculation::BasicPayFullTime => Ok(basic_pay::compute_full_time(payment)),
            Calculation::BasicPayPartTime { store } => {
                Ok(basic_pay::compute_part_time(*store, payment))
            }
            Calculation::StatutoryBonus { table } => statutory_bonus::compute(table, payment),
            Calculation::TotalTaxableGrossEmoluments => {
                totals::total_taxable_gross_emoluments(resolver)
            }
            Calculation::IncomeTaxFullTime { .. } => {
                income_tax::compute_full_time(resolver, payment, historical)
            }
            Calculation::IncomeTaxPartTime { rate } => {
                income_tax::compute_part_time(resolver, *rate, payment)
            }
            Calculation::SocialSecurityEmployee { table } => {
                contributions::employee_social_security(table, payment)
            }
            Calculation::SocialSecurityEmployer { table } => {
                contributions::weekly_contribution(table, payment)
            }
            Calculation::MaternityFund { table } => {
                contributions::weekly_contribution(table, payment)
            }
            Calculation::TotalDeductions => totals::total_deductions(resolver),
            Calculation::Reimbursements { store } => {
                Ok(adjustments::reimbursements(*store, payment))
            }
            Calculation::NetPay => totals::net_pay(resolver),
            Calculation::TaxDue => totals::tax_due(resolver),
        }
    }

    /// Computes this line item's projected full-year value.
    ///
    /// Most items are not projectable; only basic pay, the statutory bonus,
    /// and full-time income tax carry an annual projection.
    pub fn project(
        &self,
        resolver: &mut Calculator<'a>,
        payment: &Payment,
        historical: &Items,
    ) -> EngineResult<Projection> {
        match self {
            Calculation::BasicPayFullTime => {
                basic_pay::project_full_time(resolver, payment, historical)
                    .map(Projection::Projected)
            }
            Calculation::StatutoryBonus { table } => {
                statutory_bonus::project(table, payment, historical).map(Projection::Projected)
            }
            Calculation::IncomeTaxFullTime { table } => {
                income_tax::project_full_time(table, resolver, payment, historical)
                    .map(Projection::Projected)
            }
            _ => Ok(Projection::NotProjectable),
        }
    }

    /// A human-readable note on the computed value, if the rule has one.
    pub fn describe(
        &self,
        _value: Money,
        payment: &Payment,
        _historical: &Items,
    ) -> Option<String> {
        match self {
            Calculation::BasicPayFullTime => basic_pay::describe_full_time(payment),
            Calculation::BasicPayPartTime { store } => {
                basic_pay::describe_part_time(*store, payment)
            }
            Calculation::SocialSecurityEmployee { .. }
            | Calculation::SocialSecurityEmployer { .. }
            | Calculation::MaternityFund { .. } => contributions::describe_weeks(payment),
            _ => None,
        }
    }
}

/// The name-to-calculation registry for one payroll run.
///
/// Built once per run and shared, by reference, by every calculator.
#[derive(Clone, Default)]
pub struct CalculationSet<'a> {
    calculations: HashMap<LineItemName, Calculation<'a>>,
}

impl<'a> CalculationSet<'a> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            calculations: HashMap::new(),
        }
    }

    /// Registers (or replaces) the calculation for a name.
    pub fn insert(&mut self, name: LineItemName, calculation: Calculation<'a>) {
        self.calculations.insert(name, calculation);
    }

    /// Looks up the calculation for a name.
    pub fn get(&self, name: LineItemName) -> EngineResult<&Calculation<'a>> {
        self.calculations
            .get(&name)
            .ok_or(EngineError::CalculationMissing { name })
    }

    /// The standard wiring: every line item bound to its statutory rule.
    pub fn standard(
        tables: &'a RateTables,
        work_logs: &'a dyn TransactionStore<WorkLog>,
        manual_adjustments: &'a dyn TransactionStore<ManualAdjustment>,
        reimbursements: &'a dyn TransactionStore<Reimbursement>,
        part_time_tax_rate: Decimal,
    ) -> Self {
        let mut set = Self::new();
        set.insert(
            LineItemName::PriorGrossEmoluments,
            Calculation::PriorGrossEmoluments,
        );
        set.insert(
            LineItemName::PriorIncomeTaxDeduction,
            Calculation::PriorIncomeTaxDeduction,
        );
        set.insert(
            LineItemName::ManualAdjustments,
            Calculation::ManualAdjustments {
                store: manual_adjustments,
            },
        );
        set.insert(LineItemName::BasicPayFullTime, Calculation::BasicPayFullTime);
        set.insert(
            LineItemName::BasicPayPartTime,
            Calculation::BasicPayPartTime { store: work_logs },
        );
        set.insert(
            LineItemName::StatutoryBonus,
            Calculation::StatutoryBonus {
                table: &tables.statutory_bonus,
            },
        );
        set.insert(
            LineItemName::TotalTaxableGrossEmoluments,
            Calculation::TotalTaxableGrossEmoluments,
        );
        set.insert(
            LineItemName::IncomeTaxFullTime,
            Calculation::IncomeTaxFullTime {
                table: &tables.income_tax,
            },
        );
        set.insert(
            LineItemName::IncomeTaxPartTime,
            Calculation::IncomeTaxPartTime {
                rate: part_time_tax_rate,
            },
        );
        set.insert(
            LineItemName::SocialSecurityContributionEmployee,
            Calculation::SocialSecurityEmployee {
                table: &tables.social_security,
            },
        );
        set.insert(
            LineItemName::SocialSecurityContributionEmployer,
            Calculation::SocialSecurityEmployer {
                table: &tables.social_security,
            },
        );
        set.insert(
            LineItemName::MaternityFundContributionEmployer,
            Calculation::MaternityFund {
                table: &tables.maternity_fund,
            },
        );
        set.insert(LineItemName::TotalDeductions, Calculation::TotalDeductions);
        set.insert(
            LineItemName::Reimbursements,
            Calculation::Reimbursements {
                store: reimbursements,
            },
        );
        set.insert(LineItemName::NetPay, Calculation::NetPay);
        set.insert(LineItemName::TaxDue, Calculation::TaxDue);
        set
    }
}
