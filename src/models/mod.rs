//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod employee;
mod line_item;
mod money;
mod payment;
mod transaction;

pub use employee::{Employee, PriorTaxInformation, SocialSecurityCategory, TaxComputation};
pub use line_item::{Items, LineItem, LineItemName};
pub use money::{Currency, Money};
pub use payment::{MemoryPaymentHistory, Payment, PaymentHistory};
pub use transaction::{
    ManualAdjustment, MemoryTransactionStore, Reimbursement, Transaction, TransactionStore,
    WorkLog,
};
