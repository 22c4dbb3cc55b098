//! The per-payment dependency-resolving evaluator.

use std::collections::HashMap;

use crate::error::{EngineError, EngineResult};
use crate::models::{Items, LineItemName, Money, Payment};

use super::{CalculationSet, Projection};

/// The state of one line item in a resolution cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    /// Resolution has started but not finished; seeing this again is a cycle.
    InProgress,
    /// The memoized result.
    Done(Money),
}

/// Which resolution channel a cache entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Channel {
    Value,
    Projection,
}

/// Resolves the line items of one payment, memoizing every result.
///
/// A calculator is scoped to exactly one (employee, period) payment. It holds
/// the payment context, the aggregated items of all prior same-year payments,
/// and the name-to-calculation registry; the value and projection caches live
/// only for this payment's computation and the instance is discarded after
/// use.
///
/// Each name is computed at most once per channel no matter how many
/// dependents request it. A name that transitively depends on itself fails
/// with [`EngineError::DependencyCycle`] carrying the resolution path instead
/// of recursing without bound.
pub struct Calculator<'a> {
    payment: &'a Payment,
    historical: &'a Items,
    calculations: &'a CalculationSet<'a>,
    values: HashMap<LineItemName, Slot>,
    projections: HashMap<LineItemName, Slot>,
    stack: Vec<(Channel, LineItemName)>,
}

impl<'a> Calculator<'a> {
    /// Creates a calculator for one payment.
    ///
    /// `historical` is the pointwise sum of the employee's prior payments in
    /// the same year, as supplied by the payment-history collaborator.
    pub fn new(
        payment: &'a Payment,
        historical: &'a Items,
        calculations: &'a CalculationSet<'a>,
    ) -> Self {
        Self {
            payment,
            historical,
            calculations,
            values: HashMap::new(),
            projections: HashMap::new(),
            stack: Vec::new(),
        }
    }

    /// The value of a line item for the current payment.
    ///
    /// If the value is not yet computed, the registered calculation runs with
    /// this calculator as its resolver, creating dependency edges to any
    /// other line items it requests. The result is cached; later requests
    /// return it without recomputation.
    pub fn value_of(&mut self, name: LineItemName) -> EngineResult<Money> {
        match self.values.get(&name) {
            Some(Slot::Done(value)) => return Ok(*value),
            Some(Slot::InProgress) => return Err(self.cycle(Channel::Value, name)),
            None => {}
        }

        let calculations = self.calculations;
        let calculation = calculations.get(name)?;
        let payment = self.payment;
        let historical = self.historical;

        self.values.insert(name, Slot::InProgress);
        self.stack.push((Channel::Value, name));
        let result = calculation.compute(self, payment, historical);
        self.stack.pop();

        match result {
            Ok(value) => {
                self.values.insert(name, Slot::Done(value));
                Ok(value)
            }
            Err(error) => {
                self.values.remove(&name);
                Err(error)
            }
        }
    }

    /// The projected full-year value of a line item.
    ///
    /// Follows the same memoization and cycle discipline as [`value_of`].
    /// Requesting the projection of a non-projectable item is a caller error
    /// reported as [`EngineError::ProjectionUnavailable`], never a zero
    /// default.
    ///
    /// [`value_of`]: Calculator::value_of
    pub fn projection_of(&mut self, name: LineItemName) -> EngineResult<Money> {
        match self.projections.get(&name) {
            Some(Slot::Done(value)) => return Ok(*value),
            Some(Slot::InProgress) => return Err(self.cycle(Channel::Projection, name)),
            None => {}
        }

        let calculations = self.calculations;
        let calculation = calculations.get(name)?;
        let payment = self.payment;
        let historical = self.historical;

        self.projections.insert(name, Slot::InProgress);
        self.stack.push((Channel::Projection, name));
        let result = calculation.project(self, payment, historical);
        self.stack.pop();

        match result {
            Ok(Projection::Projected(value)) => {
                self.projections.insert(name, Slot::Done(value));
                Ok(value)
            }
            Ok(Projection::NotProjectable) => {
                self.projections.remove(&name);
                Err(EngineError::ProjectionUnavailable { name })
            }
            Err(error) => {
                self.projections.remove(&name);
                Err(error)
            }
        }
    }

    /// The registered calculation's narration for a line item, if any.
    ///
    /// The value is resolved first (and cached) so the narration always
    /// describes the figure that ends up on the payment.
    pub fn describe(&mut self, name: LineItemName) -> EngineResult<Option<String>> {
        let calculations = self.calculations;
        let calculation = calculations.get(name)?;
        let payment = self.payment;
        let historical = self.historical;
        let value = self.value_of(name)?;
        Ok(calculation.describe(value, payment, historical))
    }

    /// Materializes the full items record by resolving every name.
    pub fn items(&mut self) -> EngineResult<Items> {
        Ok(Items {
            prior_gross_emoluments: self.value_of(LineItemName::PriorGrossEmoluments)?,
            basic_pay_full_time: self.value_of(LineItemName::BasicPayFullTime)?,
            basic_pay_part_time: self.value_of(LineItemName::BasicPayPartTime)?,
            manual_adjustments: self.value_of(LineItemName::ManualAdjustments)?,
            statutory_bonus: self.value_of(LineItemName::StatutoryBonus)?,
            total_taxable_gross_emoluments: self
                .value_of(LineItemName::TotalTaxableGrossEmoluments)?,
            prior_income_tax_deduction: self.value_of(LineItemName::PriorIncomeTaxDeduction)?,
            income_tax_full_time: self.value_of(LineItemName::IncomeTaxFullTime)?,
            income_tax_part_time: self.value_of(LineItemName::IncomeTaxPartTime)?,
            social_security_contribution_employee: self
                .value_of(LineItemName::SocialSecurityContributionEmployee)?,
            social_security_contribution_employer: self
                .value_of(LineItemName::SocialSecurityContributionEmployer)?,
            total_deductions: self.value_of(LineItemName::TotalDeductions)?,
            maternity_fund_contribution_employer: self
                .value_of(LineItemName::MaternityFundContributionEmployer)?,
            reimbursements: self.value_of(LineItemName::Reimbursements)?,
            net_pay: self.value_of(LineItemName::NetPay)?,
            tax_due: self.value_of(LineItemName::TaxDue)?,
        })
    }

    /// Builds the cycle error for a name that is already being resolved.
    fn cycle(&self, channel: Channel, name: LineItemName) -> EngineError {
        let mut names: Vec<String> = Vec::new();
        if let Some(position) = self
            .stack
            .iter()
            .position(|entry| *entry == (channel, name))
        {
            names.extend(self.stack[position..].iter().map(|(_, n)| n.to_string()));
        }
        names.push(name.to_string());
        EngineError::DependencyCycle {
            path: names.join(" -> "),
        }
    }
}
