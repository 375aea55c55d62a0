use std::fs::File;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

use super::model::{CellValue, Column, ColumnType, Table};
use super::schema::SchemaError;

// ---------------------------------------------------------------------------
// LoadError
// ---------------------------------------------------------------------------

/// Everything that can go wrong while turning a file into a table. No
/// partial table survives a failed load.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row}, column 'Date': '{value}' is not a recognizable date")]
    Date { row: usize, value: String },

    #[error("file has no header row")]
    EmptyHeader,

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Parse a comma-delimited file with a header row into a [`Table`].
///
/// Column names come from the header; each column's type is inferred from
/// its values (see [`ColumnType`]). A column literally named `Date` is
/// coerced to calendar dates, and a single unparseable date fails the whole
/// load. Empty cells become [`CellValue::Null`] for the cleaner to impute.
pub fn load(path: &Path) -> Result<Table, LoadError> {
    let file = File::open(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.to_string())
        .collect();
    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(LoadError::EmptyHeader);
    }

    // First pass: collect the raw text of every record. The csv reader
    // rejects records whose width differs from the header.
    let mut raw: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record?;
        raw.push(record.iter().map(|v| v.to_string()).collect());
    }

    // Second pass: per column, settle the type and build typed cells.
    let mut columns = Vec::with_capacity(headers.len());
    let mut cells_by_column: Vec<Vec<CellValue>> = Vec::with_capacity(headers.len());

    for (col_idx, name) in headers.iter().enumerate() {
        let raw_column: Vec<&str> = raw.iter().map(|row| row[col_idx].as_str()).collect();
        let (ty, cells) = if name == "Date" {
            (ColumnType::Date, parse_date_column(&raw_column)?)
        } else {
            infer_column(&raw_column)
        };
        columns.push(Column { name: name.clone(), ty });
        cells_by_column.push(cells);
    }

    // Transpose back to row order.
    let rows: Vec<Vec<CellValue>> = (0..raw.len())
        .map(|row_idx| {
            cells_by_column
                .iter_mut()
                .map(|col| std::mem::replace(&mut col[row_idx], CellValue::Null))
                .collect()
        })
        .collect();

    Ok(Table::new(columns, rows))
}

// ---------------------------------------------------------------------------
// Column typing
// ---------------------------------------------------------------------------

/// Infer a column's type from its non-empty values: all-integers wins,
/// then all-floats, then text.
fn infer_column(raw: &[&str]) -> (ColumnType, Vec<CellValue>) {
    let non_empty = || raw.iter().filter(|v| !v.is_empty());

    if non_empty().count() > 0 && non_empty().all(|v| v.parse::<i64>().is_ok()) {
        let cells = raw
            .iter()
            .map(|v| {
                if v.is_empty() {
                    CellValue::Null
                } else {
                    CellValue::Integer(v.parse().unwrap_or_default())
                }
            })
            .collect();
        return (ColumnType::Integer, cells);
    }

    if non_empty().count() > 0 && non_empty().all(|v| v.parse::<f64>().is_ok()) {
        let cells = raw
            .iter()
            .map(|v| {
                if v.is_empty() {
                    CellValue::Null
                } else {
                    CellValue::Float(v.parse().unwrap_or_default())
                }
            })
            .collect();
        return (ColumnType::Float, cells);
    }

    let cells = raw
        .iter()
        .map(|v| {
            if v.is_empty() {
                CellValue::Null
            } else {
                CellValue::Text(v.to_string())
            }
        })
        .collect();
    (ColumnType::Text, cells)
}

fn parse_date_column(raw: &[&str]) -> Result<Vec<CellValue>, LoadError> {
    raw.iter()
        .enumerate()
        .map(|(row, v)| {
            if v.is_empty() {
                return Ok(CellValue::Null);
            }
            parse_date(v)
                .map(CellValue::Date)
                .ok_or_else(|| LoadError::Date {
                    row,
                    value: v.to_string(),
                })
        })
        .collect()
}

/// Accepted date formats, tried in order. Timestamps keep only the date part.
fn parse_date(value: &str) -> Option<NaiveDate> {
    for fmt in ["%Y-%m-%d", "%m/%d/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(value, fmt) {
            return Some(d);
        }
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt.date());
        }
    }
    None
}
