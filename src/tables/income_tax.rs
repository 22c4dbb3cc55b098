//! Progressive income-tax bracket table.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::models::Money;

use super::{INLINE_SOURCE, read_rows};

/// One bracket of the progressive income-tax schedule.
///
/// A taxable amount falls in the first bracket whose upper bound covers it;
/// the tax due is `taxable * rate - subtract`. The schedule's last row has no
/// upper bound (`upto` is `None`) and therefore always matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncomeTaxEntry {
    /// The bracket's inclusive upper bound; `None` means unbounded.
    pub upto: Option<Decimal>,
    /// The tax rate applied to the whole taxable amount, between 0 and 1.
    pub rate: Decimal,
    /// The amount subtracted after applying the rate.
    pub subtract: Decimal,
}

impl IncomeTaxEntry {
    fn validate(&self) -> Result<(), String> {
        if let Some(upto) = self.upto {
            if upto < Decimal::ZERO {
                return Err("upto cannot be < 0".to_string());
            }
        }
        if self.rate < Decimal::ZERO || self.rate > Decimal::ONE {
            return Err("rate must be between 0 and 1.0".to_string());
        }
        if self.subtract < Decimal::ZERO {
            return Err("subtract cannot be < 0".to_string());
        }
        Ok(())
    }
}

/// Raw CSV row; `-1` in the `upto` column is the unbounded sentinel.
#[derive(Debug, Deserialize)]
struct RawIncomeTaxRow {
    #[serde(with = "rust_decimal::serde::str")]
    upto: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    rate: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    subtract: Decimal,
}

impl RawIncomeTaxRow {
    fn into_entry(self) -> IncomeTaxEntry {
        let upto = if self.upto == Decimal::from(-1) {
            None
        } else {
            Some(self.upto)
        };
        IncomeTaxEntry {
            upto,
            rate: self.rate,
            subtract: self.subtract,
        }
    }
}

/// The progressive income-tax schedule for one year and filing status.
///
/// # Example
///
/// ```no_run
/// use payroll_engine::tables::IncomeTaxTable;
///
/// let table = IncomeTaxTable::load("./tables/2024-income-tax-single.csv")?;
/// # Ok::<(), payroll_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct IncomeTaxTable {
    entries: Vec<IncomeTaxEntry>,
}

impl IncomeTaxTable {
    /// Builds a table from entries, validating each one.
    pub fn new(entries: Vec<IncomeTaxEntry>) -> EngineResult<Self> {
        for (index, entry) in entries.iter().enumerate() {
            entry.validate().map_err(|message| EngineError::InvalidTableRow {
                table: INLINE_SOURCE.to_string(),
                row: index + 1,
                message,
            })?;
        }
        Ok(Self { entries })
    }

    /// Loads and validates the schedule from a CSV file.
    ///
    /// The file must have an `upto,rate,subtract` header; the first invalid
    /// row fails the whole table.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let source = path.display().to_string();
        let rows: Vec<RawIncomeTaxRow> = read_rows(path)?;
        let mut entries = Vec::with_capacity(rows.len());
        for (index, row) in rows.into_iter().enumerate() {
            let entry = row.into_entry();
            entry.validate().map_err(|message| EngineError::InvalidTableRow {
                table: source.clone(),
                row: index + 1,
                message,
            })?;
            entries.push(entry);
        }
        Ok(Self { entries })
    }

    /// Applies the schedule to a taxable amount.
    ///
    /// The first bracket (in file order) whose upper bound covers the amount
    /// determines the tax: `taxable * rate - subtract`. With no matching
    /// bracket the tax is zero; a well-formed schedule ends with an unbounded
    /// row so this only happens for empty tables.
    pub fn apply(&self, taxable: Money) -> Money {
        for entry in &self.entries {
            let covers = match entry.upto {
                Some(upper_bound) => upper_bound >= taxable.amount(),
                None => true,
            };
            if covers {
                return Money::new(
                    taxable.amount() * entry.rate - entry.subtract,
                    taxable.currency(),
                );
            }
        }
        Money::zero(taxable.currency()).round_dp(2)
    }

    /// The validated entries in file order.
    pub fn entries(&self) -> &[IncomeTaxEntry] {
        &self.entries
    }
}
