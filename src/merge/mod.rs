//! Score merging: structure inference over data and template sheets, and the
//! merge pass that fills a template from per-class data workbooks.
//!
//! Nothing in here performs I/O. Workbooks come in already loaded and the
//! merged template is handed back by value.

pub mod class_label;
pub mod columns;
pub mod extract;
pub mod keywords;
pub mod labels;
pub mod names;
pub mod orchestrator;
pub mod types;

pub use class_label::{detect_class_label, parse_class_label};
pub use columns::{detect_columns, find_header_row, ColumnLayout};
pub use extract::{extract_class_scores, extract_scores, parse_score, ClassScores};
pub use labels::{find_anchor_cells, inject_label, set_adjacent};
pub use names::{normalize_name, shorten_teacher_name};
pub use orchestrator::{fill_sheet_from_scores, merge};
pub use types::*;
