use super::keywords::contains_any;
use crate::excel::{Cell, Grid};

const ANCHOR_SCAN_ROWS: u32 = 40;
const ANCHOR_SCAN_COLS: u32 = 20;

/// Every cell in the top-left region whose text contains one of `keywords`,
/// in row-major order
pub fn find_anchor_cells(grid: &Grid, keywords: &[&str]) -> Vec<(u32, u32)> {
    let mut found = Vec::new();

    for row in 1..=ANCHOR_SCAN_ROWS {
        for col in 1..=ANCHOR_SCAN_COLS {
            if let Some(text) = grid.text(row, col) {
                if contains_any(text, keywords) {
                    found.push((row, col));
                }
            }
        }
    }

    found
}

/// Write `value` to the right of each anchor, or over the anchor itself when
/// the right-hand cell holds something we do not interpret.
pub fn set_adjacent(grid: &mut Grid, anchors: &[(u32, u32)], value: &str) {
    for &(row, col) in anchors {
        let right_is_plain = matches!(
            grid.get(row, col + 1),
            Cell::Empty | Cell::Text(_) | Cell::Number(_) | Cell::Bool(_)
        );

        if right_is_plain {
            grid.set(row, col + 1, value);
        } else {
            grid.set(row, col, value);
        }
    }
}

/// Find the anchors for `keywords` and stamp `value` next to them.
/// Returns the number of anchors found.
pub fn inject_label(grid: &mut Grid, keywords: &[&str], value: &str) -> usize {
    let anchors = find_anchor_cells(grid, keywords);
    set_adjacent(grid, &anchors, value);
    anchors.len()
}
