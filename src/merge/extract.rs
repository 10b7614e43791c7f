use super::class_label::detect_class_label;
use super::columns::detect_columns;
use super::names::normalize_name;
use super::types::{ScorePair, ScoreTable};
use crate::excel::{Cell, Grid, Workbook};

/// Rows read below the header of a data sheet
const DATA_SCAN_ROWS: u32 = 300;

/// Scores read from one data workbook
#[derive(Debug, Clone)]
pub struct ClassScores {
    pub label: String,
    /// False when `label` is the fallback first sheet name
    pub detected: bool,
    pub table: ScoreTable,
}

/// Coerce a score cell. Text uses a comma or period as decimal separator;
/// anything unparsable is "no value", never zero.
pub fn parse_score(cell: &Cell) -> Option<f64> {
    let value = match cell {
        Cell::Number(n) => *n,
        Cell::Text(s) => s.trim().replace(',', ".").parse::<f64>().ok()?,
        Cell::Empty | Cell::Bool(_) | Cell::Other(_) => return None,
    };
    value.is_finite().then_some(value)
}

/// Read the score table of a sheet using its detected layout
pub fn read_score_table(grid: &Grid) -> ScoreTable {
    let layout = detect_columns(grid);
    let mut table = ScoreTable::default();

    let Some(name_col) = layout.name else {
        tracing::warn!("No name column found in data sheet");
        return table;
    };

    let score_at = |row: u32, col: Option<u32>| col.and_then(|c| parse_score(grid.get(row, c)));

    for row in layout.header_row + 1..=layout.header_row + DATA_SCAN_ROWS {
        let Some(raw_name) = grid.text(row, name_col) else {
            continue;
        };
        let name = normalize_name(raw_name);
        if name.is_empty() {
            continue;
        }

        table.insert(
            name,
            ScorePair {
                score_a: score_at(row, layout.score_a),
                score_b: score_at(row, layout.score_b),
            },
        );
    }

    table
}

/// Class label and score table of a data workbook, with detection provenance
pub fn extract_class_scores(workbook: &Workbook) -> ClassScores {
    let (label, detected) = match detect_class_label(workbook) {
        Some(label) => (label, true),
        None => (
            workbook.first().map(|s| s.name().to_string()).unwrap_or_default(),
            false,
        ),
    };

    let table = workbook
        .first()
        .map(|sheet| read_score_table(sheet.grid()))
        .unwrap_or_default();

    tracing::debug!(
        class = %label,
        detected,
        students = table.len(),
        duplicates = table.duplicates(),
        "Extracted class scores"
    );

    ClassScores {
        label,
        detected,
        table,
    }
}

/// Class label (or first sheet name) and score table of a data workbook
pub fn extract_scores(workbook: &Workbook) -> (String, ScoreTable) {
    let scores = extract_class_scores(workbook);
    (scores.label, scores.table)
}
