use calamine::{open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use sha2::{Digest, Sha256};
use std::io::Cursor;

use super::types::*;

/// Load every sheet of an xlsx/xls/ods document, in workbook order
pub fn load_workbook(bytes: &[u8]) -> Result<Workbook, ExcelError> {
    let mut workbook: Sheets<_> = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| ExcelError::invalid_format(format!("Failed to open workbook: {}", e)))?;

    let sheet_names = workbook.sheet_names().to_vec();
    let mut sheets = Vec::with_capacity(sheet_names.len());

    for name in sheet_names {
        let grid = match workbook.worksheet_range(&name) {
            Ok(range) => range_to_grid(&range),
            Err(e) => {
                // Chart sheets and similar have no cell range
                tracing::warn!(sheet = %name, "Failed to read sheet, treating it as empty: {}", e);
                Grid::new()
            }
        };
        sheets.push(Sheet::new(name, grid));
    }

    if sheets.is_empty() {
        return Err(ExcelError::read_error("Workbook has no sheets"));
    }

    Ok(Workbook::new(sheets))
}

fn range_to_grid(range: &Range<Data>) -> Grid {
    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    let mut grid = Grid::new();

    for (row_idx, col_idx, data) in range.used_cells() {
        let row = start_row + row_idx as u32 + 1;
        let col = start_col + col_idx as u32 + 1;
        grid.load(row, col, convert_cell_value(data));
    }

    grid
}

/// Convert calamine Data to our Cell
fn convert_cell_value(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        // cleared cells come back as empty strings
        Data::String(s) if s.is_empty() => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => Cell::Other(format_excel_datetime(dt.as_f64())),
        Data::DateTimeIso(s) => Cell::Other(s.clone()),
        Data::DurationIso(s) => Cell::Other(s.clone()),
        Data::Error(e) => Cell::Other(format!("#{:?}", e)),
    }
}

/// Format Excel datetime (days since 1899-12-30) to ISO 8601
fn format_excel_datetime(value: f64) -> String {
    let Some(epoch) = chrono::NaiveDate::from_ymd_opt(1899, 12, 30) else {
        return value.to_string();
    };
    let Some(date) = chrono::Duration::try_days(value.floor() as i64)
        .and_then(|days| epoch.checked_add_signed(days))
    else {
        return value.to_string();
    };

    let total_seconds = (value.fract() * 86400.0).round() as u32;
    let time = chrono::NaiveTime::from_hms_opt(
        total_seconds / 3600,
        (total_seconds % 3600) / 60,
        total_seconds % 60,
    )
    .unwrap_or_default();

    chrono::NaiveDateTime::new(date, time)
        .format("%Y-%m-%dT%H:%M:%S")
        .to_string()
}

/// Convert column index (1-based) to Excel column letter (A, B, ..., Z, AA, AB, ...)
pub fn column_letter(col: u32) -> String {
    let mut result = String::new();
    let mut n = col;

    while n > 0 {
        n -= 1;
        let c = (b'A' + (n % 26) as u8) as char;
        result.insert(0, c);
        n /= 26;
    }

    result
}

/// SHA-256 hex digest of a document
pub fn compute_checksum(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
