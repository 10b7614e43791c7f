use std::io::Cursor;
use umya_spreadsheet::{reader, writer, Worksheet};

use super::types::{Cell, CellEdit, ExcelError, Workbook};

/// Summary of what was replayed onto the template file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub edits_applied: usize,
    pub sheets_renamed: usize,
}

/// Replay the workbook's renames and cell edits onto the original template
/// bytes, preserving formulas and formatting, and return the new xlsx bytes.
pub fn write_merged(
    template_bytes: &[u8],
    workbook: &Workbook,
) -> Result<(Vec<u8>, WriteSummary), ExcelError> {
    let mut book = reader::xlsx::read_reader(Cursor::new(template_bytes), true)
        .map_err(|e| ExcelError::invalid_format(format!("Failed to open template: {}", e)))?;

    let mut summary = WriteSummary::default();

    for worksheet in book.get_sheet_collection_mut().iter_mut() {
        let loaded_name = worksheet.get_name().to_string();
        let Some(sheet) = workbook.sheet_by_loaded_name(&loaded_name) else {
            continue;
        };

        for edit in sheet.grid().edits() {
            apply_single_edit(worksheet, &edit);
            summary.edits_applied += 1;
        }

        if sheet.name() != loaded_name {
            worksheet.set_name(sheet.name());
            summary.sheets_renamed += 1;
        }
    }

    let mut out = Cursor::new(Vec::new());
    writer::xlsx::write_writer(&book, &mut out)
        .map_err(|e| ExcelError::write_error(format!("Failed to save workbook: {}", e)))?;

    tracing::debug!(
        edits = summary.edits_applied,
        renamed = summary.sheets_renamed,
        "Template written"
    );

    Ok((out.into_inner(), summary))
}

fn apply_single_edit(worksheet: &mut Worksheet, edit: &CellEdit) {
    // umya addresses cells as (column, row), both 1-based
    let coordinate = (edit.col, edit.row);

    match &edit.value {
        Cell::Empty => {
            worksheet.remove_cell(coordinate);
        }
        Cell::Text(s) => {
            worksheet.get_cell_mut(coordinate).set_value_string(s);
        }
        Cell::Number(n) => {
            worksheet.get_cell_mut(coordinate).set_value_number(*n);
        }
        Cell::Bool(b) => {
            worksheet.get_cell_mut(coordinate).set_value_bool(*b);
        }
        Cell::Other(s) => {
            worksheet.get_cell_mut(coordinate).set_value(s);
        }
    }
}
