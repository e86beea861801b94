//! CSV readers for date-indexed tables and plain samples.
//!
//! Table layout: a header row whose first field names the date column
//! (any name, usually `Date`) followed by parameter names; one row per date.
//! Dates are `YYYY-MM-DD`, optionally followed by a time of day which is
//! ignored. Empty, `null` and `NaN` cells are missing values.

use std::fs;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};

use crate::logging::{self, Component};
use crate::model::{Column, HydroError, TimeTable};

/// Parse a date cell, accepting a trailing time component.
fn parse_date(field: &str) -> Option<NaiveDate> {
    let field = field.trim();
    NaiveDate::parse_from_str(field, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(field, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(field, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

/// Parse a numeric cell. `Ok(None)` means a missing value.
fn parse_value(field: &str) -> Result<Option<f64>, String> {
    let field = field.trim();
    if field.is_empty() || field.eq_ignore_ascii_case("null") || field.eq_ignore_ascii_case("nan")
    {
        return Ok(None);
    }
    field
        .parse::<f64>()
        .map(Some)
        .map_err(|_| format!("'{}' is not a number", field))
}

/// Parse a date-indexed CSV table.
pub fn parse_table(csv: &str) -> Result<TimeTable, HydroError> {
    let mut lines = csv
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty());

    let (_, header) = lines
        .next()
        .ok_or_else(|| HydroError::InvalidInput("table has no header row".to_string()))?;
    let names: Vec<String> = header
        .split(',')
        .skip(1)
        .map(|name| name.trim().to_string())
        .collect();
    if names.is_empty() {
        return Err(HydroError::Parse {
            line: 1,
            message: "header must name a date column and at least one parameter".to_string(),
        });
    }

    let mut dates = Vec::new();
    let mut values: Vec<Vec<f64>> = vec![Vec::new(); names.len()];

    for (index, line) in lines {
        let line_no = index + 1;
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != names.len() + 1 {
            return Err(HydroError::Parse {
                line: line_no,
                message: format!("expected {} fields, found {}", names.len() + 1, fields.len()),
            });
        }

        let date = parse_date(fields[0]).ok_or_else(|| HydroError::Parse {
            line: line_no,
            message: format!("invalid date '{}'", fields[0].trim()),
        })?;
        dates.push(date);

        for (column, field) in values.iter_mut().zip(&fields[1..]) {
            let value = parse_value(field).map_err(|message| HydroError::Parse {
                line: line_no,
                message,
            })?;
            column.push(value.unwrap_or(f64::NAN));
        }
    }

    let columns = names
        .into_iter()
        .zip(values)
        .map(|(name, values)| Column::new(name, values))
        .collect();
    TimeTable::new(dates, columns)
}

/// Parse a sample file: one number per line. A non-numeric first line is
/// treated as a header; missing values are skipped.
pub fn parse_sample(text: &str) -> Result<Vec<f64>, HydroError> {
    let mut sample = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let field = line.trim();
        if field.is_empty() {
            continue;
        }
        match parse_value(field) {
            Ok(Some(value)) => sample.push(value),
            Ok(None) => {}
            Err(_) if index == 0 => {} // header
            Err(message) => {
                return Err(HydroError::Parse {
                    line: index + 1,
                    message,
                })
            }
        }
    }
    Ok(sample)
}

/// Load a date-indexed CSV table from disk.
pub fn load_table(path: impl AsRef<Path>) -> Result<TimeTable, HydroError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let table = parse_table(&text)?;
    logging::debug(
        Component::Ingest,
        path.to_str(),
        &format!(
            "Loaded {} rows, columns: {}",
            table.len(),
            table.column_names().join(", ")
        ),
    );
    Ok(table)
}

/// Load a sample either from one column of a table (when `column` is given)
/// or from a plain one-value-per-line file.
pub fn load_sample(path: impl AsRef<Path>, column: Option<&str>) -> Result<Vec<f64>, HydroError> {
    let path = path.as_ref();
    let sample = match column {
        Some(name) => load_table(path)?.require_column(name)?.finite_values(),
        None => parse_sample(&fs::read_to_string(path)?)?,
    };
    logging::debug(
        Component::Ingest,
        path.to_str(),
        &format!("Loaded sample of {} values", sample.len()),
    );
    Ok(sample)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
