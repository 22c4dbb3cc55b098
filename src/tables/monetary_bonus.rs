//! Month-keyed statutory bonus table.
//!
//! The schedule lists the months in which a government bonus is paid and the
//! full bonus amount for each. Pro-ration for recently started employees and
//! the scaling by contracted hours live in the statutory bonus calculation,
//! not here.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::{INLINE_SOURCE, read_rows};

/// Month names as they appear in the published schedule.
const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// One row of the statutory bonus schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonetaryBonusEntry {
    /// The calendar month the bonus is paid in, 1 to 12.
    pub month: u32,
    /// The full bonus amount for a 40-hour week.
    pub bonus: Decimal,
}

impl MonetaryBonusEntry {
    fn validate(&self) -> Result<(), String> {
        if !(1..=12).contains(&self.month) {
            return Err("month is invalid".to_string());
        }
        if self.bonus < Decimal::ZERO {
            return Err("bonus cannot be < 0".to_string());
        }
        Ok(())
    }
}

/// Raw CSV row; months are spelled out in the published schedule.
#[derive(Debug, Deserialize)]
struct RawMonetaryBonusRow {
    month: String,
    #[serde(with = "rust_decimal::serde::str")]
    bonus: Decimal,
}

/// The statutory bonus schedule for one year.
#[derive(Debug, Clone)]
pub struct MonetaryBonusTable {
    entries: Vec<MonetaryBonusEntry>,
}

impl MonetaryBonusTable {
    /// Builds a table from entries, validating each one.
    pub fn new(entries: Vec<MonetaryBonusEntry>) -> EngineResult<Self> {
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
    /// The file must have a `month,bonus` header with months spelled out in
    /// lowercase; the first invalid row fails the whole table.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let source = path.display().to_string();
        let rows: Vec<RawMonetaryBonusRow> = read_rows(path)?;
        let mut entries = Vec::with_capacity(rows.len());
        for (index, row) in rows.into_iter().enumerate() {
            let month = MONTH_NAMES
                .iter()
                .position(|name| *name == row.month)
                .map(|position| position as u32 + 1)
                .ok_or_else(|| EngineError::InvalidTableRow {
                    table: source.clone(),
                    row: index + 1,
                    message: format!("month '{}' is invalid", row.month),
                })?;
            let entry = MonetaryBonusEntry {
                month,
                bonus: row.bonus,
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

    /// The first row for a month, if the schedule pays a bonus that month.
    pub fn entry_for(&self, month: u32) -> Option<&MonetaryBonusEntry> {
        self.entries.iter().find(|entry| entry.month == month)
    }

    /// The validated entries in file order.
    pub fn entries(&self) -> &[MonetaryBonusEntry] {
        &self.entries
    }
}
