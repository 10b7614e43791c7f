use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The two assessment scores of one student; `None` means "no value"
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScorePair {
    pub score_a: Option<f64>,
    pub score_b: Option<f64>,
}

/// Scores of one class keyed by normalized student name.
///
/// Rows sharing a normalized name overwrite each other; the number of such
/// overwrites is kept in `duplicates`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreTable {
    entries: HashMap<String, ScorePair>,
    duplicates: usize,
}

impl ScoreTable {
    pub(crate) fn insert(&mut self, name: String, pair: ScorePair) {
        if self.entries.insert(name, pair).is_some() {
            self.duplicates += 1;
        }
    }

    pub fn get(&self, name: &str) -> Option<&ScorePair> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn duplicates(&self) -> usize {
        self.duplicates
    }
}

/// Outcome of filling one template sheet
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillStats {
    pub filled: usize,
    pub skipped: usize,
}

/// Per-class line of the merge report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRecord {
    #[serde(rename = "class")]
    pub class_label: String,
    pub filled: usize,
    pub skipped: usize,
    /// Data rows that overwrote an earlier row with the same normalized name
    pub duplicate_names: usize,
    /// False when the label fell back to the data file's first sheet name
    pub label_detected: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeReport {
    pub teacher_short: String,
    pub classes: Vec<ClassRecord>,
    /// Classes for which no template sheet carried the label
    #[serde(default)]
    pub unmatched_classes: Vec<String>,
}
