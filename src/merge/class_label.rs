use once_cell::sync::Lazy;
use regex::Regex;

use crate::excel::Workbook;

/// Size of the top-left block searched when no sheet name carries a class
const CELL_SCAN_SIZE: u32 = 10;

/// Grade (1-2 digits), optional separator, section letter, optional suffix
static CLASS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b([0-9]{1,2})\s*-?\s*([A-ZА-ЯЁ])\s*([0-9]{0,2})\b")
        .expect("class label pattern is valid")
});

/// Extract a canonical class label such as "7-A1" from free text
pub fn parse_class_label(text: &str) -> Option<String> {
    let text = text.replace('_', "-");
    let caps = CLASS_PATTERN.captures(&text)?;
    let grade: u32 = caps[1].parse().ok()?;

    Some(format!("{}-{}{}", grade, caps[2].to_uppercase(), &caps[3]))
}

/// Infer the class a workbook belongs to: sheet names first, then the
/// top-left cells of the first sheet.
pub fn detect_class_label(workbook: &Workbook) -> Option<String> {
    if let Some(label) = workbook
        .sheets()
        .iter()
        .find_map(|sheet| parse_class_label(sheet.name()))
    {
        return Some(label);
    }

    let grid = workbook.first()?.grid();
    for row in 1..=CELL_SCAN_SIZE {
        for col in 1..=CELL_SCAN_SIZE {
            if let Some(label) = grid.text(row, col).and_then(parse_class_label) {
                tracing::debug!(row, col, label = %label, "Class label found in cell");
                return Some(label);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::excel::{Cell, Grid, Sheet};

    fn book(names: &[&str], first_grid: Grid) -> Workbook {
        let mut grid = Some(first_grid);
        Workbook::new(
            names
                .iter()
                .map(|name| Sheet::new(*name, grid.take().unwrap_or_default()))
                .collect(),
        )
    }

    #[test]
    fn test_parse_class_label_shapes() {
        assert_eq!(parse_class_label("7_B2").as_deref(), Some("7-B2"));
        assert_eq!(parse_class_label("7-a").as_deref(), Some("7-A"));
        assert_eq!(parse_class_label("10 - b 1").as_deref(), Some("10-B1"));
        assert_eq!(parse_class_label("07B").as_deref(), Some("7-B"));
        assert_eq!(parse_class_label("5-в").as_deref(), Some("5-В"));
        assert_eq!(parse_class_label("Sinf: 9-A"), Some("9-A".to_string()));
        assert_eq!(parse_class_label("report"), None);
        assert_eq!(parse_class_label("Sheet1"), None);
        assert_eq!(parse_class_label("7-Ab"), None);
    }

    #[test]
    fn test_detect_prefers_sheet_names() {
        let grid = Grid::from_rows(vec![vec![Cell::from("8-C")]]);
        let wb = book(&["Jurnal", "7_B2"], grid);
        assert_eq!(detect_class_label(&wb).as_deref(), Some("7-B2"));
    }

    #[test]
    fn test_detect_falls_back_to_top_left_cells() {
        let mut grid = Grid::new();
        grid.set(3, 4, "Sinf: 6-D");
        grid.set(2, 9, 42.0);
        let wb = book(&["report"], grid);
        assert_eq!(detect_class_label(&wb).as_deref(), Some("6-D"));
    }

    #[test]
    fn test_detect_ignores_cells_outside_the_block() {
        let mut grid = Grid::new();
        grid.set(11, 1, "6-D");
        grid.set(1, 11, "6-D");
        let wb = book(&["report"], grid);
        assert_eq!(detect_class_label(&wb), None);
    }

    #[test]
    fn test_detect_absent() {
        let wb = book(&["report"], Grid::new());
        assert_eq!(detect_class_label(&wb), None);
        assert_eq!(detect_class_label(&Workbook::default()), None);
    }
}
