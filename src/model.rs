//! Core data types for the hydrology plotting utilities.
//!
//! This module defines the shared domain model imported by all other modules.
//! It contains no rendering and no file I/O, only types and the checks
//! needed to keep them consistent.

use chrono::NaiveDate;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Default units
// ---------------------------------------------------------------------------

/// Default streamflow unit, cubic feet per second.
pub const UNIT_STREAMFLOW: &str = "ft³/sec";

/// Default water quality concentration unit.
pub const UNIT_CONCENTRATION: &str = "mg/L";

/// Default precipitation depth unit.
pub const UNIT_PRECIP: &str = "inch";

// ---------------------------------------------------------------------------
// Exceedance curve
// ---------------------------------------------------------------------------

/// One point of a flow-duration curve.
///
/// `probability` is the Weibull plotting position `rank / (n + 1)` and always
/// lies strictly inside (0, 1). Multiply by 100 for the percentage axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExceedancePoint {
    pub probability: f64,
    pub value: f64,
}

impl ExceedancePoint {
    /// Exceedance expressed as a percentage, as drawn on the FDC x axis.
    pub fn percent(&self) -> f64 {
        self.probability * 100.0
    }
}

// ---------------------------------------------------------------------------
// Tabular time series
// ---------------------------------------------------------------------------

/// A named parameter column. Missing observations are `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<f64>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Values with missing (`NaN`) cells removed.
    pub fn finite_values(&self) -> Vec<f64> {
        self.values.iter().copied().filter(|v| !v.is_nan()).collect()
    }
}

/// Date-indexed table: one row per date, one column per parameter.
///
/// Every column has exactly one value per date and column names are unique.
/// Both properties are checked by [`TimeTable::new`] and [`TimeTable::push_column`].
#[derive(Debug, Clone, PartialEq)]
pub struct TimeTable {
    dates: Vec<NaiveDate>,
    columns: Vec<Column>,
}

impl TimeTable {
    pub fn new(dates: Vec<NaiveDate>, columns: Vec<Column>) -> Result<Self, HydroError> {
        let mut table = Self {
            dates,
            columns: Vec::with_capacity(columns.len()),
        };
        for column in columns {
            table.push_column(column)?;
        }
        Ok(table)
    }

    /// Adds a column, rejecting duplicates and length mismatches.
    pub fn push_column(&mut self, column: Column) -> Result<(), HydroError> {
        if column.values.len() != self.dates.len() {
            return Err(HydroError::LengthMismatch {
                column: column.name,
                expected: self.dates.len(),
                actual: column.values.len(),
            });
        }
        if self.column(&column.name).is_some() {
            return Err(HydroError::InvalidInput(format!(
                "duplicate column '{}'",
                column.name
            )));
        }
        self.columns.push(column);
        Ok(())
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Like [`TimeTable::column`], but a missing column is an error.
    pub fn require_column(&self, name: &str) -> Result<&Column, HydroError> {
        self.column(name)
            .ok_or_else(|| HydroError::MissingColumn(name.to_string()))
    }

    /// Number of rows (dates).
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// `(date, value)` pairs for one column, skipping missing cells.
    pub fn series(&self, name: &str) -> Result<Vec<(NaiveDate, f64)>, HydroError> {
        let column = self.require_column(name)?;
        Ok(self
            .dates
            .iter()
            .copied()
            .zip(column.values.iter().copied())
            .filter(|(_, v)| !v.is_nan())
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors raised by the transforms, readers and configuration.
///
/// Rendering failures live in `render::PlotError`, which wraps this type.
#[derive(Error, Debug)]
pub enum HydroError {
    /// The input cannot be transformed, e.g. an empty sample.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A required column is not present in the table.
    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Column '{column}' has {actual} values, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// Malformed input text. `line` is 1-based.
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn test_table_rejects_length_mismatch() {
        let result = TimeTable::new(
            vec![day(1), day(2)],
            vec![Column::new("T-N", vec![1.0])],
        );
        match result {
            Err(HydroError::LengthMismatch { column, expected, actual }) => {
                assert_eq!(column, "T-N");
                assert_eq!(expected, 2);
                assert_eq!(actual, 1);
            }
            other => panic!("expected LengthMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_table_rejects_duplicate_columns() {
        let result = TimeTable::new(
            vec![day(1)],
            vec![Column::new("SS", vec![1.0]), Column::new("SS", vec![2.0])],
        );
        assert!(matches!(result, Err(HydroError::InvalidInput(_))));
    }

    #[test]
    fn test_series_skips_missing_cells() {
        let table = TimeTable::new(
            vec![day(1), day(2), day(3)],
            vec![Column::new("streamflow", vec![1.0, f64::NAN, 3.0])],
        )
        .unwrap();

        let series = table.series("streamflow").unwrap();
        assert_eq!(series, vec![(day(1), 1.0), (day(3), 3.0)]);
    }

    #[test]
    fn test_require_column_reports_name() {
        let table = TimeTable::new(vec![day(1)], vec![]).unwrap();
        let err = table.require_column("precip").unwrap_err();
        assert_eq!(err.to_string(), "Missing column: precip");
    }

    #[test]
    fn test_exceedance_point_percent() {
        let point = ExceedancePoint {
            probability: 0.25,
            value: 30.0,
        };
        assert_eq!(point.percent(), 25.0);
    }
}
