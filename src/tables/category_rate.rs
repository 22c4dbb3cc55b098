//! Category-keyed contribution rate table.
//!
//! Social security and maternity fund contributions share one schedule shape:
//! each row keys a contribution category to either a fixed weekly amount or a
//! proportion of the weekly wage, capped at a maximum.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::models::{Money, SocialSecurityCategory};

use super::{INLINE_SOURCE, read_rows};

/// How a category rate is applied to the weekly wage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum RateKind {
    /// The rate value is a fixed weekly amount.
    Fixed,
    /// The rate value is a proportion of the weekly wage.
    Rate,
}

/// One row of a category rate schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryRateEntry {
    /// The contribution category this row applies to.
    pub category: SocialSecurityCategory,
    /// Whether the rate is a fixed amount or a proportion.
    pub kind: RateKind,
    /// The fixed amount, or the proportion between 0 and 1.
    pub rate: Decimal,
    /// The weekly contribution cap.
    pub maximum: Decimal,
}

impl CategoryRateEntry {
    fn validate(&self) -> Result<(), String> {
        match self.kind {
            RateKind::Fixed => {
                if self.rate < Decimal::ZERO {
                    return Err("rate must be >= 0".to_string());
                }
            }
            RateKind::Rate => {
                if self.rate < Decimal::ZERO || self.rate > Decimal::ONE {
                    return Err("rate must be between 0 and 1.0".to_string());
                }
            }
        }
        if self.maximum < Decimal::ZERO {
            return Err("maximum cannot be < 0".to_string());
        }
        Ok(())
    }
}

/// Raw CSV row with the authority's column names.
#[derive(Debug, Deserialize)]
struct RawCategoryRateRow {
    category: SocialSecurityCategory,
    rate_type: RateKind,
    #[serde(with = "rust_decimal::serde::str")]
    rate: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    maximum: Decimal,
}

/// A category-keyed contribution schedule.
#[derive(Debug, Clone)]
pub struct CategoryRateTable {
    entries: Vec<CategoryRateEntry>,
}

impl CategoryRateTable {
    /// Builds a table from entries, validating each one.
    pub fn new(entries: Vec<CategoryRateEntry>) -> EngineResult<Self> {
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
    /// The file must have a `category,rate_type,rate,maximum` header; the
    /// first invalid row fails the whole table.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let source = path.display().to_string();
        let rows: Vec<RawCategoryRateRow> = read_rows(path)?;
        let mut entries = Vec::with_capacity(rows.len());
        for (index, row) in rows.into_iter().enumerate() {
            let entry = CategoryRateEntry {
                category: row.category,
                kind: row.rate_type,
                rate: row.rate,
                maximum: row.maximum,
            };
            entry.validate().map_err(|message| EngineError::InvalidTableRow {
                table: source.clone(),
                row: index + 1,
                message,
            })?;
            entries.push(entry);
        }
        Ok(Self { entries })
    }

    /// The weekly contribution for a category and weekly wage.
    ///
    /// The first row matching the category applies: a `Fixed` row yields its
    /// amount, a `Rate` row yields `weekly_wage * rate`, and either result is
    /// capped at the row's maximum. A category with no matching row is a
    /// configuration error, never a silent zero.
    pub fn apply(
        &self,
        category: SocialSecurityCategory,
        weekly_wage: Money,
    ) -> EngineResult<Money> {
        for entry in &self.entries {
            if entry.category == category {
                let total = match entry.kind {
                    RateKind::Fixed => Money::new(entry.rate, weekly_wage.currency()),
                    RateKind::Rate => weekly_wage * entry.rate,
                };
                return Ok(total.min(Money::new(entry.maximum, weekly_wage.currency())));
            }
        }
        Err(EngineError::CategoryNotFound { category })
    }

    /// The validated entries in file order.
    pub fn entries(&self) -> &[CategoryRateEntry] {
        &self.entries
    }
}
