//! Transaction-backed credit sums.
//!
//! Manual adjustments and expense reimbursements are both sums over dated
//! transaction records falling within the payment period. The difference is
//! tax treatment, which lives in the totals: adjustments count towards the
//! taxable gross, reimbursements do not.

use chrono::Datelike;

use crate::models::{ManualAdjustment, Money, Payment, Reimbursement, TransactionStore};

/// Sum of taxed one-off adjustments dated within the period.
pub(crate) fn manual_adjustments(
    store: &dyn TransactionStore<ManualAdjustment>,
    payment: &Payment,
) -> Money {
    let period = payment.period;
    let mut total = Money::zero(payment.currency());
    for transaction in store.stream(
        &payment.employee.key,
        period.start().year(),
        &|transaction: &ManualAdjustment| period.contains(transaction.dated),
    ) {
        total += transaction.value;
    }
    total
}

/// Sum of untaxed reimbursements dated within the period.
pub(crate) fn reimbursements(
    store: &dyn TransactionStore<Reimbursement>,
    payment: &Payment,
) -> Money {
    let period = payment.period;
    let mut total = Money::zero(payment.currency());
    for transaction in store.stream(
        &payment.employee.key,
        period.start().year(),
        &|transaction: &Reimbursement| period.contains(transaction.dated),
    ) {
        total += transaction.value;
    }
    total
}
