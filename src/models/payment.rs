//! Payment model and the payment-history collaborator interface.
//!
//! A [`Payment`] is the container one calculator run fills: the employee and
//! period under computation plus the derived snapshots every calculation rule
//! reads (fraction of the period worked, Monday count, wage figures).
//! [`PaymentHistory`] is how the engine obtains the pre-aggregated
//! year-to-date totals of all prior same-year payments.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::models::employee::Employee;
use crate::models::line_item::Items;
use crate::models::money::{Currency, Money};
use crate::time::{Period, fraction_of_period_worked, weeks_worked};

/// One payment to one employee for one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    /// The employee being paid.
    pub employee: Employee,
    /// The payroll period the payment covers.
    pub period: Period,
    /// The fraction of the period the employee worked, 2 decimals.
    pub time_worked: Decimal,
    /// The number of Mondays the employee is engaged for in the period.
    pub weeks_worked: u32,
    /// The employee's monthly wage at computation time.
    pub monthly_wage: Money,
    /// The employee's weekly wage at computation time.
    pub weekly_wage: Money,
    /// The computed line items; zero until a calculator fills them.
    pub items: Items,
}

impl Payment {
    /// Builds the payment snapshot for an employee and period.
    ///
    /// The pro-rated time worked, Monday count, and wage figures are captured
    /// here so that every calculation rule reads the same numbers.
    pub fn new(employee: Employee, period: Period, currency: Currency) -> Self {
        let employment = employee.employment_period();
        let time_worked = fraction_of_period_worked(&employment, &period);
        let weeks = weeks_worked(&employment, &period);
        let monthly_wage = employee.monthly_wage(currency);
        let weekly_wage = employee.weekly_wage(currency);
        Self {
            employee,
            period,
            time_worked,
            weeks_worked: weeks,
            monthly_wage,
            weekly_wage,
            items: Items::zero(currency),
        }
    }

    /// Whether this is the employee's very first payment ever.
    ///
    /// True exactly when the employee's start date falls within the payment
    /// period; prior-employment figures contribute only to this payment.
    pub fn first_for_employee(&self) -> bool {
        self.period.contains(self.employee.start_date)
    }

    /// The currency the payment is computed in.
    pub fn currency(&self) -> Currency {
        self.monthly_wage.currency()
    }
}

/// A source of pre-aggregated prior payments for an employee.
///
/// Implementations sum the [`Items`] of every payment of the given year whose
/// period ended strictly before `before`, using pointwise addition. Storage
/// backends are collaborator-owned; the engine only consumes the aggregate.
pub trait PaymentHistory {
    /// The pointwise sum of the employee's prior payments this year.
    fn year_to_date(&self, employee: &str, year: i32, before: NaiveDate) -> EngineResult<Items>;
}

/// An in-memory [`PaymentHistory`] backed by recorded payments.
#[derive(Debug, Clone)]
pub struct MemoryPaymentHistory {
    currency: Currency,
    payments: Vec<(String, Period, Items)>,
}

impl MemoryPaymentHistory {
    /// Creates an empty history aggregating in the given currency.
    pub fn new(currency: Currency) -> Self {
        Self {
            currency,
            payments: Vec::new(),
        }
    }

    /// Records a settled payment's items.
    pub fn record(&mut self, employee: &str, period: Period, items: Items) {
        self.payments.push((employee.to_string(), period, items));
    }

    /// Records a whole computed payment.
    pub fn record_payment(&mut self, payment: &Payment) {
        self.record(&payment.employee.key, payment.period, payment.items);
    }
}

impl PaymentHistory for MemoryPaymentHistory {
    fn year_to_date(&self, employee: &str, year: i32, before: NaiveDate) -> EngineResult<Items> {
        use chrono::Datelike;

        let mut accumulator = Items::zero(self.currency);
        for (key, period, items) in &self.payments {
            if key == employee && period.start().year() == year && period.end() < before {
                accumulator = accumulator + *items;
            }
        }
        Ok(accumulator)
    }
}
