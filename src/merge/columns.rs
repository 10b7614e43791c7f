use super::keywords::{contains_any, NAME_KEYWORDS, SCORE_A_KEYWORDS, SCORE_B_KEYWORDS};
use crate::excel::{column_letter, Grid};

const HEADER_SCAN_ROWS: u32 = 30;
const HEADER_SCAN_COLS: u32 = 30;
const HEADER_MIN_TEXT_LEN: usize = 2;

const COLUMN_SCAN_COLS: u32 = 60;

const FALLBACK_SCAN_COLS: u32 = 15;
const FALLBACK_SCAN_ROWS: u32 = 60;
const FALLBACK_MIN_TEXT_LEN: usize = 3;
const FALLBACK_MIN_HITS: usize = 3;

/// Where the interesting parts of a sheet live (all 1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub header_row: u32,
    pub name: Option<u32>,
    pub score_a: Option<u32>,
    pub score_b: Option<u32>,
}

fn text_len_at_least(grid: &Grid, row: u32, col: u32, min: usize) -> bool {
    grid.text(row, col)
        .map(|s| s.trim().chars().count() >= min)
        .unwrap_or(false)
}

/// The row among the first 30 with the most text cells; earliest wins ties
pub fn find_header_row(grid: &Grid) -> u32 {
    let mut best_row = 1;
    let mut best_score = None;

    for row in 1..=HEADER_SCAN_ROWS {
        let score = (1..=HEADER_SCAN_COLS)
            .filter(|&col| text_len_at_least(grid, row, col, HEADER_MIN_TEXT_LEN))
            .count();

        if best_score.map_or(true, |best| score > best) {
            best_score = Some(score);
            best_row = row;
        }
    }

    best_row
}

/// Locate the header row and the name / score columns of a sheet
pub fn detect_columns(grid: &Grid) -> ColumnLayout {
    let header_row = find_header_row(grid);
    let mut layout = ColumnLayout {
        header_row,
        name: None,
        score_a: None,
        score_b: None,
    };

    for col in 1..=COLUMN_SCAN_COLS {
        let Some(text) = grid.text(header_row, col) else {
            continue;
        };
        let header = text.trim();

        if layout.name.is_none() && contains_any(header, NAME_KEYWORDS) {
            layout.name = Some(col);
        }
        if layout.score_a.is_none() && contains_any(header, SCORE_A_KEYWORDS) {
            layout.score_a = Some(col);
        }
        if layout.score_b.is_none() && contains_any(header, SCORE_B_KEYWORDS) {
            layout.score_b = Some(col);
        }
    }

    if layout.name.is_none() {
        layout.name = densest_text_column(grid, header_row);
    }

    tracing::debug!(
        header_row,
        name = ?layout.name.map(column_letter),
        score_a = ?layout.score_a.map(column_letter),
        score_b = ?layout.score_b.map(column_letter),
        "Detected column layout"
    );

    layout
}

/// Fallback for sheets without a recognisable name header: the column with
/// the most longer text cells below the header, if there are enough of them.
fn densest_text_column(grid: &Grid, header_row: u32) -> Option<u32> {
    let mut best: Option<(u32, usize)> = None;

    for col in 1..=FALLBACK_SCAN_COLS {
        let hits = (header_row + 1..=header_row + FALLBACK_SCAN_ROWS)
            .filter(|&row| text_len_at_least(grid, row, col, FALLBACK_MIN_TEXT_LEN))
            .count();

        if best.map_or(true, |(_, best_hits)| hits > best_hits) {
            best = Some((col, hits));
        }
    }

    best.filter(|&(_, hits)| hits >= FALLBACK_MIN_HITS)
        .map(|(col, _)| col)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::excel::Cell;

    fn t(s: &str) -> Cell {
        Cell::from(s)
    }

    #[test]
    fn test_header_row_is_the_densest_text_row() {
        let grid = Grid::from_rows(vec![
            vec![t("Jurnal")],
            vec![],
            vec![t("№"), t("F.I.O"), t("BSB"), t("CHSB")],
            vec![Cell::from(1.0), t("Aliyev Vali"), Cell::from(45.0)],
        ]);
        assert_eq!(find_header_row(&grid), 3);
    }

    #[test]
    fn test_header_row_ties_go_to_the_earliest_row() {
        let grid = Grid::from_rows(vec![
            vec![],
            vec![t("ab"), t("cd")],
            vec![t("ef"), t("gh")],
        ]);
        assert_eq!(find_header_row(&grid), 2);
        assert_eq!(find_header_row(&Grid::new()), 1);
    }

    #[test]
    fn test_detect_columns_by_keyword() {
        let grid = Grid::from_rows(vec![
            vec![t("№"), t("F.I.O"), t("BSB"), t("CHSB")],
            vec![Cell::from(1.0), t("Aliyev Vali"), t("45"), t("38")],
        ]);
        assert_eq!(
            detect_columns(&grid),
            ColumnLayout {
                header_row: 1,
                name: Some(2),
                score_a: Some(3),
                score_b: Some(4),
            }
        );
    }

    #[test]
    fn test_first_matching_header_wins() {
        let grid = Grid::from_rows(vec![vec![
            t("Familiya"),
            t("Ismi"),
            t("БСБ"),
            t("BSB 2"),
            t("ЧСБ"),
        ]]);
        let layout = detect_columns(&grid);
        assert_eq!(layout.name, Some(1));
        assert_eq!(layout.score_a, Some(3));
        assert_eq!(layout.score_b, Some(5));
    }

    #[test]
    fn test_name_column_falls_back_to_text_density() {
        let grid = Grid::from_rows(vec![
            vec![t("No"), t("Talaba"), t("Ball")],
            vec![Cell::from(1.0), t("Aliyev Vali"), Cell::from(4.0)],
            vec![Cell::from(2.0), t("Karimov Anvar"), Cell::from(5.0)],
            vec![Cell::from(3.0), t("Saidova Lola"), Cell::from(3.0)],
        ]);
        let layout = detect_columns(&grid);
        assert_eq!(layout.header_row, 1);
        assert_eq!(layout.name, Some(2));
        assert_eq!(layout.score_a, None);
    }

    #[test]
    fn test_fallback_needs_three_text_cells() {
        let grid = Grid::from_rows(vec![
            vec![t("No"), t("Talaba")],
            vec![Cell::from(1.0), t("Aliyev Vali")],
            vec![Cell::from(2.0), t("Karimov Anvar")],
        ]);
        assert_eq!(detect_columns(&grid).name, None);
    }
}
