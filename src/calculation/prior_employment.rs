//! Prior-employment carry-overs.
//!
//! What an employee earned, and had withheld, with a prior employer this year
//! enters the payroll exactly once: on the first payment, the one whose
//! period contains the employment start date. Every later payment sees the
//! figures through the year-to-date totals instead.

use crate::models::{Money, Payment};

/// Gross emoluments earned with a prior employer this year.
pub(crate) fn prior_gross_emoluments(payment: &Payment) -> Money {
    if payment.first_for_employee() {
        Money::new(
            payment.employee.prior_tax_information.gross_annual_emoluments,
            payment.currency(),
        )
    } else {
        Money::zero(payment.currency())
    }
}

/// Income tax a prior employer already withheld this year.
pub(crate) fn prior_income_tax_deduction(payment: &Payment) -> Money {
    if payment.first_for_employee() {
        Money::new(
            payment.employee.prior_tax_information.income_tax,
            payment.currency(),
        )
    } else {
        Money::zero(payment.currency())
    }
}
