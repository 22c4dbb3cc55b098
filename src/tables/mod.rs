//! Rate tables encoding tax and contribution law.
//!
//! Three lookup structures are loaded from CSV schedules published by the
//! issuing authority: the progressive income-tax brackets, the category-keyed
//! social security / maternity fund rates, and the month-keyed statutory
//! bonus amounts. Rows are authored in priority order, so every lookup is a
//! first-match-wins scan in file order; that is policy, not an optimization.
//!
//! Loading validates every row and fails the whole table on the first invalid
//! one, reporting the offending source and row number. Loaded tables are
//! immutable and safe to share across concurrent payroll computations.

mod category_rate;
mod income_tax;
mod monetary_bonus;

pub use category_rate::{CategoryRateEntry, CategoryRateTable, RateKind};
pub use income_tax::{IncomeTaxEntry, IncomeTaxTable};
pub use monetary_bonus::{MonetaryBonusEntry, MonetaryBonusTable};

use serde::de::DeserializeOwned;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

/// Source label for tables constructed in code rather than loaded from disk.
pub(crate) const INLINE_SOURCE: &str = "inline";

/// Reads and deserializes every data row of a CSV table file.
pub(crate) fn read_rows<T: DeserializeOwned>(path: &Path) -> EngineResult<Vec<T>> {
    let source = path.display().to_string();
    let mut reader = csv::Reader::from_path(path).map_err(|_| EngineError::TableNotFound {
        path: source.clone(),
    })?;
    let mut rows = Vec::new();
    for (index, row) in reader.deserialize::<T>().enumerate() {
        let row = row.map_err(|error| EngineError::InvalidTableRow {
            table: source.clone(),
            row: index + 1,
            message: error.to_string(),
        })?;
        rows.push(row);
    }
    Ok(rows)
}

/// The full set of rate tables one payroll year runs against.
///
/// The authority publishes one schedule per concern per year; the
/// conventional file names under a tables directory are
/// `{year}-income-tax-single.csv`, `{year}-ssc.csv`, `{year}-maternity.csv`,
/// and `{year}-statutory-bonus.csv`.
#[derive(Debug, Clone)]
pub struct RateTables {
    /// Progressive income-tax brackets.
    pub income_tax: IncomeTaxTable,
    /// Social security contribution rates by category.
    pub social_security: CategoryRateTable,
    /// Maternity fund contribution rates by category.
    pub maternity_fund: CategoryRateTable,
    /// Statutory bonus amounts by month.
    pub statutory_bonus: MonetaryBonusTable,
}

impl RateTables {
    /// Bundles already-loaded tables.
    pub fn new(
        income_tax: IncomeTaxTable,
        social_security: CategoryRateTable,
        maternity_fund: CategoryRateTable,
        statutory_bonus: MonetaryBonusTable,
    ) -> Self {
        Self {
            income_tax,
            social_security,
            maternity_fund,
            statutory_bonus,
        }
    }

    /// Loads the conventional four-table set for a year from a directory.
    pub fn load<P: AsRef<Path>>(dir: P, year: i32) -> EngineResult<Self> {
        let dir = dir.as_ref();
        Ok(Self {
            income_tax: IncomeTaxTable::load(dir.join(format!("{year}-income-tax-single.csv")))?,
            social_security: CategoryRateTable::load(dir.join(format!("{year}-ssc.csv")))?,
            maternity_fund: CategoryRateTable::load(dir.join(format!("{year}-maternity.csv")))?,
            statutory_bonus: MonetaryBonusTable::load(
                dir.join(format!("{year}-statutory-bonus.csv")),
            )?,
        })
    }
}
