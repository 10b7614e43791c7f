use std::collections::HashMap;

use super::columns::{detect_columns, ColumnLayout};
use super::extract::{extract_class_scores, ClassScores};
use super::keywords::{CLASS_KEYWORDS, TEACHER_KEYWORDS};
use super::labels::inject_label;
use super::names::{normalize_name, shorten_teacher_name};
use super::types::{ClassRecord, FillStats, MergeReport, ScoreTable};
use crate::excel::{Cell, Grid, Workbook};

/// Rows walked below the header of a template sheet
const TEMPLATE_SCAN_ROWS: u32 = 600;

/// Copy scores from the matching rows of `table` into a template sheet.
///
/// A sheet without a name column is left alone and reports zero rows.
pub fn fill_sheet_from_scores(grid: &mut Grid, table: &ScoreTable) -> FillStats {
    let layout = detect_columns(grid);
    fill_rows(grid, &layout, table)
}

fn fill_rows(grid: &mut Grid, layout: &ColumnLayout, table: &ScoreTable) -> FillStats {
    let mut stats = FillStats::default();

    let Some(name_col) = layout.name else {
        tracing::warn!("No name column found in template sheet");
        return stats;
    };

    for row in layout.header_row + 1..=layout.header_row + TEMPLATE_SCAN_ROWS {
        let Some(raw_name) = grid.text(row, name_col) else {
            continue;
        };

        match table.get(&normalize_name(raw_name)).copied() {
            Some(pair) => {
                if let Some(col) = layout.score_a {
                    grid.set(row, col, Cell::from(pair.score_a));
                }
                if let Some(col) = layout.score_b {
                    grid.set(row, col, Cell::from(pair.score_b));
                }
                stats.filled += 1;
            }
            None => stats.skipped += 1,
        }
    }

    stats
}

/// Retitle template sheet `i` to the `i`-th class label. Renames that would
/// clash with another sheet or break Excel's title rules are skipped.
fn rename_positionally(template: &mut Workbook, labels: &[&str]) {
    let count = labels.len().min(template.len());

    for (index, label) in labels.iter().take(count).enumerate() {
        let previous = template.sheets()[index].name().to_string();
        match template.rename_sheet(index, label) {
            Ok(()) => tracing::debug!(from = %previous, to = %label, "Renamed template sheet"),
            Err(e) => tracing::warn!(sheet = %previous, "Template sheet not renamed: {}", e),
        }
    }

    if labels.len() > template.len() {
        tracing::warn!(
            data_files = labels.len(),
            template_sheets = template.len(),
            "More data files than template sheets"
        );
    }
}

/// Merge the scores of every data workbook into the template.
///
/// The template is consumed and returned together with the report.
pub fn merge(
    mut template: Workbook,
    data: &[Workbook],
    teacher_full_name: &str,
) -> (Workbook, MergeReport) {
    let teacher_short = shorten_teacher_name(teacher_full_name);

    let mut class_order: Vec<(String, bool)> = Vec::with_capacity(data.len());
    let mut tables: HashMap<String, ScoreTable> = HashMap::new();

    for workbook in data {
        let ClassScores {
            label,
            detected,
            table,
        } = extract_class_scores(workbook);

        if tables.contains_key(&label) {
            tracing::warn!(class = %label, "Class appears in more than one data file, keeping the last");
        }
        class_order.push((label.clone(), detected));
        tables.insert(label, table);
    }

    let labels: Vec<&str> = class_order.iter().map(|(label, _)| label.as_str()).collect();
    rename_positionally(&mut template, &labels);

    let mut report = MergeReport {
        teacher_short,
        ..Default::default()
    };

    let empty = ScoreTable::default();
    let mut layouts: HashMap<String, ColumnLayout> = HashMap::new();
    for (label, detected) in &class_order {
        let Some(sheet) = template.sheet_mut(label) else {
            tracing::warn!(class = %label, "No template sheet for class");
            report.unmatched_classes.push(label.clone());
            continue;
        };
        let table = tables.get(label).unwrap_or(&empty);
        let grid = sheet.grid_mut();

        // Layout is taken from the sheet before any label is stamped into it
        let layout = *layouts
            .entry(label.clone())
            .or_insert_with(|| detect_columns(grid));
        inject_label(grid, TEACHER_KEYWORDS, &report.teacher_short);
        inject_label(grid, CLASS_KEYWORDS, label);
        let stats = fill_rows(grid, &layout, table);

        tracing::info!(
            class = %label,
            filled = stats.filled,
            skipped = stats.skipped,
            "Filled template sheet"
        );

        report.classes.push(ClassRecord {
            class_label: label.clone(),
            filled: stats.filled,
            skipped: stats.skipped,
            duplicate_names: table.duplicates(),
            label_detected: *detected,
        });
    }

    (template, report)
}
