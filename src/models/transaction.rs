//! Transaction records and the store collaborator interface.
//!
//! Transactions are one-off, dated records credited alongside an employee's
//! salary: hourly work logs, taxed manual adjustments, and untaxed expense
//! reimbursements. Durable storage belongs to a collaborator; the engine only
//! needs the [`TransactionStore`] streaming interface, and ships an in-memory
//! implementation for tests and embedding.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::money::Money;

/// A dated record attributable to one employee.
pub trait Transaction {
    /// The key of the employee the record belongs to.
    fn employee(&self) -> &str;
    /// The date the record applies to.
    fn dated(&self) -> NaiveDate;
}

/// A log of hourly work paid for and taxed as a part-time emolument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkLog {
    /// The key of the employee the hours belong to.
    pub employee: String,
    /// The date the hours were worked.
    pub dated: NaiveDate,
    /// The number of hours worked.
    pub hours: Decimal,
    /// The wage due per hour.
    pub hourly_wage: Money,
}

impl WorkLog {
    /// Checks that the logged hours and wage are non-negative.
    pub fn validate(&self) -> EngineResult<()> {
        if self.hours < Decimal::ZERO {
            return Err(EngineError::InvalidRecord {
                record: format!("work log for '{}' on {}", self.employee, self.dated),
                message: format!("hours '{}' cannot be < 0", self.hours),
            });
        }
        if self.hourly_wage.amount() < Decimal::ZERO {
            return Err(EngineError::InvalidRecord {
                record: format!("work log for '{}' on {}", self.employee, self.dated),
                message: format!("hourly wage '{}' cannot be < 0", self.hourly_wage),
            });
        }
        Ok(())
    }
}

impl Transaction for WorkLog {
    fn employee(&self) -> &str {
        &self.employee
    }

    fn dated(&self) -> NaiveDate {
        self.dated
    }
}

/// An expense reimbursement credited alongside the salary. Not taxed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reimbursement {
    /// The key of the employee being reimbursed.
    pub employee: String,
    /// The date of the expense.
    pub dated: NaiveDate,
    /// The amount reimbursed.
    pub value: Money,
    /// What the expense was for.
    pub description: String,
}

impl Transaction for Reimbursement {
    fn employee(&self) -> &str {
        &self.employee
    }

    fn dated(&self) -> NaiveDate {
        self.dated
    }
}

/// A one-time payment credited alongside the salary and taxed with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualAdjustment {
    /// The key of the employee the adjustment applies to.
    pub employee: String,
    /// The date the adjustment applies to.
    pub dated: NaiveDate,
    /// The amount credited (or debited, when negative).
    pub value: Money,
    /// Why the adjustment was made.
    pub description: String,
}

impl Transaction for ManualAdjustment {
    fn employee(&self) -> &str {
        &self.employee
    }

    fn dated(&self) -> NaiveDate {
        self.dated
    }
}

/// A source of transaction records for one employee and year.
pub trait TransactionStore<T> {
    /// Streams the employee's records for the year that satisfy `filter`.
    ///
    /// Records are returned in no particular order.
    fn stream(&self, employee: &str, year: i32, filter: &dyn Fn(&T) -> bool) -> Vec<T>;
}

/// An in-memory [`TransactionStore`] backed by a vector of records.
#[derive(Debug, Clone, Default)]
pub struct MemoryTransactionStore<T> {
    records: Vec<T>,
}

impl<T: Transaction + Clone> MemoryTransactionStore<T> {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Adds a record to the store.
    pub fn push(&mut self, record: T) {
        self.records.push(record);
    }
}

impl<T: Transaction + Clone> TransactionStore<T> for MemoryTransactionStore<T> {
    fn stream(&self, employee: &str, year: i32, filter: &dyn Fn(&T) -> bool) -> Vec<T> {
        self.records
            .iter()
            .filter(|record| {
                record.employee() == employee && record.dated().year() == year && filter(record)
            })
            .cloned()
            .collect()
    }
}
