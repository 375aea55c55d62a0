use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::model::{CellValue, ColumnType, Table};

/// Placeholder for a non-numeric column with no observed values to take a
/// mode from.
pub const UNKNOWN: &str = "Unknown";

// ---------------------------------------------------------------------------
// CleanReport
// ---------------------------------------------------------------------------

/// What the cleaning pass did, for the user-facing preprocessing message.
#[derive(Debug, Clone, Serialize)]
pub struct CleanReport {
    pub rows_before: usize,
    pub rows_after: usize,
    pub duplicates_removed: usize,
    pub cells_imputed: usize,
}

// ---------------------------------------------------------------------------
// Cleaning pass: impute, then deduplicate
// ---------------------------------------------------------------------------

/// Produce a cleaned copy of `table`: every missing cell filled in, then
/// exact-duplicate rows dropped (first occurrence kept, order preserved).
/// The input table is left untouched.
///
/// Fill policy, per column, over the column's current non-missing values:
/// * numeric → median; an integer column keeps integer cells when the
///   median is whole, otherwise the column is promoted to float so filled
///   and original cells still compare equal for deduplication;
/// * non-numeric → mode, ties broken by first occurrence in row order;
/// * no values at all → the `"Unknown"` sentinel (column becomes text).
pub fn clean(table: &Table) -> (Table, CleanReport) {
    let mut cleaned = table.clone();
    let rows_before = cleaned.len();

    let mut cells_imputed = 0;
    for idx in 0..cleaned.columns.len() {
        cells_imputed += impute_column(&mut cleaned, idx);
    }

    let duplicates_removed = drop_duplicates(&mut cleaned);

    let report = CleanReport {
        rows_before,
        rows_after: cleaned.len(),
        duplicates_removed,
        cells_imputed,
    };
    (cleaned, report)
}

/// Fill the missing cells of one column. Returns how many were filled.
fn impute_column(table: &mut Table, idx: usize) -> usize {
    let missing = table.values(idx).filter(|c| c.is_null()).count();
    if missing == 0 {
        return 0;
    }

    let ty = table.column_type(idx);
    let fill = if ty.is_numeric() {
        let med = median(table.numeric_values(idx));
        match med {
            Some(m) if ty == ColumnType::Integer && m.fract() == 0.0 => {
                CellValue::Integer(m as i64)
            }
            Some(m) => {
                promote_to_float(table, idx);
                CellValue::Float(m)
            }
            // Nothing to take a median of.
            None => sentinel(table, idx),
        }
    } else {
        let most_frequent = mode(table.values(idx));
        match most_frequent {
            Some(m) => m,
            None => sentinel(table, idx),
        }
    };

    for row in &mut table.rows {
        if row[idx].is_null() {
            row[idx] = fill.clone();
        }
    }
    missing
}

/// Median of an iterator of values; `None` when empty. Even counts take the
/// mean of the two middle values.
fn median(values: impl Iterator<Item = f64>) -> Option<f64> {
    let mut sorted: Vec<f64> = values.collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

/// Most frequent non-null value; ties go to the value seen first.
fn mode<'a>(values: impl Iterator<Item = &'a CellValue>) -> Option<CellValue> {
    let mut counts: HashMap<&CellValue, usize> = HashMap::new();
    let mut first_seen: Vec<&CellValue> = Vec::new();

    for value in values.filter(|v| !v.is_null()) {
        let count = counts.entry(value).or_insert(0);
        if *count == 0 {
            first_seen.push(value);
        }
        *count += 1;
    }

    let mut best: Option<(&CellValue, usize)> = None;
    for value in first_seen {
        let count = counts[value];
        // Strictly greater keeps the earliest value on a tie.
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value.clone())
}

/// Re-type an all-integer column as float so a fractional median fill does
/// not leave mixed cell types behind.
fn promote_to_float(table: &mut Table, idx: usize) {
    if table.column_type(idx) == ColumnType::Float {
        return;
    }
    table.columns[idx].ty = ColumnType::Float;
    for row in &mut table.rows {
        if let CellValue::Integer(i) = row[idx] {
            row[idx] = CellValue::Float(i as f64);
        }
    }
}

fn sentinel(table: &mut Table, idx: usize) -> CellValue {
    table.columns[idx].ty = ColumnType::Text;
    CellValue::Text(UNKNOWN.to_string())
}

/// Drop rows identical to an earlier row across every column. Returns the
/// number of rows removed.
fn drop_duplicates(table: &mut Table) -> usize {
    let before = table.len();
    let mut seen: HashSet<Vec<CellValue>> = HashSet::with_capacity(before);
    table.rows.retain(|row| seen.insert(row.clone()));
    before - table.len()
}
