//! Spreadsheet model and file I/O.
//!
//! This module provides:
//! - The in-memory grid model the merge heuristics operate on
//! - Loading xlsx/xls/ods documents into that model
//! - Writing renames and cell edits back onto the original template,
//!   preserving formulas and formatting

pub mod types;
pub mod reader;
pub mod writer;

// Re-export commonly used types and functions
pub use types::*;
pub use reader::{column_letter, compute_checksum, load_workbook};
pub use writer::{write_merged, WriteSummary};
