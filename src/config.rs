//! Engine settings loading.
//!
//! The settings file carries what is employer policy rather than published
//! rate law: the payroll currency and the flat part-time tax rate.
//!
//! ```yaml
//! currency: EUR
//! part_time_tax_rate: "0.15"
//! ```

use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::models::Currency;

/// Employer-level payroll settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PayrollSettings {
    /// The currency every payment is computed in.
    pub currency: Currency,
    /// The flat withholding rate applied to part-time emoluments.
    pub part_time_tax_rate: Decimal,
}

impl Default for PayrollSettings {
    fn default() -> Self {
        Self {
            currency: Currency::Eur,
            part_time_tax_rate: Decimal::new(15, 2),
        }
    }
}

impl PayrollSettings {
    /// Loads and validates settings from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        let settings: PayrollSettings =
            serde_yaml::from_str(&content).map_err(|error| EngineError::ConfigParseError {
                path: path_str.clone(),
                message: error.to_string(),
            })?;

        settings.validate(&path_str)?;
        Ok(settings)
    }

    fn validate(&self, path: &str) -> EngineResult<()> {
        if self.part_time_tax_rate < Decimal::ZERO || self.part_time_tax_rate > Decimal::ONE {
            return Err(EngineError::ConfigParseError {
                path: path.to_string(),
                message: format!(
                    "part_time_tax_rate '{}' must be between 0 and 1.0",
                    self.part_time_tax_rate
                ),
            });
        }
        Ok(())
    }
}
