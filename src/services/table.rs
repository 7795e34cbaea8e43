//! Spreadsheet table model and the pure row-resolution steps.
//!
//! A table is the raw 2-D value list of one sheet: row 0 is the header, the
//! rest are data rows. Rows are not padded, so a short row simply has no
//! cell at the trailing positions.

use rust_decimal::Decimal;

use crate::helpers::{parse_leading_float, round_to_places};

/// Header of the column holding the observation date.
pub const DATE_COLUMN: &str = "Date";

/// Header of the column holding cumulative in-catchment rainfall.
pub const RAINFALL_COLUMN: &str = "Cumulative_Rainfall_Inside";

/// Decimal places of the average rainfall aggregate.
const AVERAGE_DECIMAL_PLACES: u32 = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Split raw rows into header and data rows. `None` for a table with no
    /// rows at all.
    pub fn from_rows(mut rows: Vec<Vec<String>>) -> Option<Self> {
        if rows.is_empty() {
            return None;
        }
        let header = rows.remove(0);
        Some(Self { header, rows })
    }
}

/// Cell at `idx`, or `None` when the row is too short.
pub fn cell(row: &[String], idx: usize) -> Option<&str> {
    row.get(idx).map(String::as_str)
}

/// Positions of the recognised columns in the header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndex {
    pub date: Option<usize>,
    pub rainfall: Option<usize>,
}

impl ColumnIndex {
    /// Resolve by exact header name; the first occurrence wins.
    pub fn resolve(header: &[String]) -> Self {
        let position = |name: &str| header.iter().position(|h| h == name);
        Self {
            date: position(DATE_COLUMN),
            rainfall: position(RAINFALL_COLUMN),
        }
    }

    /// `(date, rainfall)` when both columns were found.
    pub fn required(&self) -> Option<(usize, usize)> {
        Some((self.date?, self.rainfall?))
    }

    /// Names of the recognised columns that were not found.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.date.is_none() {
            missing.push(DATE_COLUMN);
        }
        if self.rainfall.is_none() {
            missing.push(RAINFALL_COLUMN);
        }
        missing
    }
}

/// Reorder `DD-MM-YYYY` into `YYYY-MM-DD`.
///
/// This is string reordering only; no calendar validation happens. Input with
/// fewer than three `-` separated parts has no normalized form, and parts
/// after the third are ignored.
pub fn normalize_date(date: &str) -> Option<String> {
    let mut parts = date.split('-');
    let day = parts.next()?;
    let month = parts.next()?;
    let year = parts.next()?;
    Some(format!("{}-{}-{}", year, month, day))
}

/// Normalize a sheet's date cell. Cells already in `YYYY-MM-DD` layout are
/// kept as they are; anything else goes through [`normalize_date`].
fn normalize_cell_date(cell: &str) -> Option<String> {
    let cell = cell.trim();
    match cell.split('-').next() {
        Some(first) if first.len() == 4 && cell.split('-').count() >= 3 => {
            Some(cell.to_string())
        }
        _ => normalize_date(cell),
    }
}

/// First data row (top to bottom) whose date matches `target_date`.
///
/// `target_date` is in `DD-MM-YYYY` form; a target without a normalized form
/// matches nothing. Surrounding whitespace is ignored on both the target and
/// the row cells.
pub fn find_record<'a>(table: &'a Table, date_idx: usize, target_date: &str) -> Option<&'a [String]> {
    let target = normalize_date(target_date.trim())?;
    table
        .rows
        .iter()
        .find(|row| {
            cell(row, date_idx)
                .and_then(normalize_cell_date)
                .is_some_and(|d| d == target)
        })
        .map(Vec::as_slice)
}

/// Mean of the rainfall column over every data row, rounded to 2 places.
///
/// Missing and non-numeric cells count as zero but still count as rows.
/// `None` for a table with no data rows.
pub fn average_rainfall(table: &Table, rainfall_idx: usize) -> Option<Decimal> {
    if table.rows.is_empty() {
        return None;
    }
    let total: f64 = table
        .rows
        .iter()
        .map(|row| {
            cell(row, rainfall_idx)
                .and_then(parse_leading_float)
                .unwrap_or(0.0)
        })
        .sum();
    round_to_places(total / table.rows.len() as f64, AVERAGE_DECIMAL_PLACES)
}
