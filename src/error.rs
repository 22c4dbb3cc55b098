//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while computing a payroll.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{LineItemName, SocialSecurityCategory};

/// The main error type for the payroll engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::TableNotFound {
///     path: "/missing/2024-ssc.csv".to_string(),
/// };
/// assert_eq!(error.to_string(), "Rate table not found: /missing/2024-ssc.csv");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// A rate table file was not found or could not be opened.
    #[error("Rate table not found: {path}")]
    TableNotFound {
        /// The path that was not found.
        path: String,
    },

    /// A rate table row failed validation; the whole table is rejected.
    #[error("Invalid row {row} in rate table '{table}': {message}")]
    InvalidTableRow {
        /// The file (or "inline" for in-code tables) the row came from.
        table: String,
        /// The 1-based data row number.
        row: usize,
        /// A description of what made the row invalid.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed or failed validation.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// No row in a category rate table matched the requested category.
    #[error("No rate table entry for social security category '{category}'")]
    CategoryNotFound {
        /// The category that was not matched.
        category: SocialSecurityCategory,
    },

    /// A period was constructed with its end before its start.
    #[error("Invalid period: start {start} is after end {end}")]
    InvalidPeriod {
        /// The period start date.
        start: NaiveDate,
        /// The period end date.
        end: NaiveDate,
    },

    /// An employee, payment, or transaction record failed validation.
    #[error("Invalid record '{record}': {message}")]
    InvalidRecord {
        /// An identifier for the offending record.
        record: String,
        /// A description of what made the record invalid.
        message: String,
    },

    /// A projection was requested for a line item that cannot be projected.
    #[error("Line item '{name}' has no annual projection")]
    ProjectionUnavailable {
        /// The name of the non-projectable line item.
        name: LineItemName,
    },

    /// A line item transitively depends on itself.
    #[error("Dependency cycle between line items: {path}")]
    DependencyCycle {
        /// The resolution path that closed the cycle, e.g. `a -> b -> a`.
        path: String,
    },

    /// A line item was requested that has no registered calculation.
    #[error("No calculation registered for line item '{name}'")]
    CalculationMissing {
        /// The unregistered line-item name.
        name: LineItemName,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_not_found_displays_path() {
        let error = EngineError::TableNotFound {
            path: "/missing/2024-ssc.csv".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Rate table not found: /missing/2024-ssc.csv"
        );
    }

    #[test]
    fn test_invalid_table_row_displays_source_and_row() {
        let error = EngineError::InvalidTableRow {
            table: "2024-income-tax-single.csv".to_string(),
            row: 3,
            message: "rate must be between 0 and 1".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid row 3 in rate table '2024-income-tax-single.csv': rate must be between 0 and 1"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_category_not_found_displays_category() {
        let error = EngineError::CategoryNotFound {
            category: SocialSecurityCategory::CD1,
        };
        assert_eq!(
            error.to_string(),
            "No rate table entry for social security category 'C/D #1'"
        );
    }

    #[test]
    fn test_invalid_period_displays_dates() {
        let error = EngineError::InvalidPeriod {
            start: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid period: start 2024-02-01 is after end 2024-01-01"
        );
    }

    #[test]
    fn test_projection_unavailable_displays_name() {
        let error = EngineError::ProjectionUnavailable {
            name: LineItemName::NetPay,
        };
        assert_eq!(
            error.to_string(),
            "Line item 'net_pay' has no annual projection"
        );
    }

    #[test]
    fn test_dependency_cycle_displays_path() {
        let error = EngineError::DependencyCycle {
            path: "net_pay -> total_deductions -> net_pay".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Dependency cycle between line items: net_pay -> total_deductions -> net_pay"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_table_not_found() -> EngineResult<()> {
            Err(EngineError::TableNotFound {
                path: "/test".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_table_not_found()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
