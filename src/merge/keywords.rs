//! Header and label keywords recognised in Uzbek (Latin and Cyrillic),
//! Russian and English sheets. All entries are lower-case.

/// Student name column headers
pub const NAME_KEYWORDS: &[&str] = &[
    "ism", "fio", "f.i.o", "ф.и.о", "фио", "name", "familiya", "фамилия",
];

/// Current-period summative assessment (BSB) column headers
pub const SCORE_A_KEYWORDS: &[&str] = &["bsb", "бсб"];

/// Quarter summative assessment (ChSB) column headers
pub const SCORE_B_KEYWORDS: &[&str] = &["chsb", "чсб", "chsб"];

/// Cells next to which the teacher's name belongs
pub const TEACHER_KEYWORDS: &[&str] = &[
    "o‘qituvchi",
    "o'qituvchi",
    "oʻqituvchi",
    "oqituvchi",
    "ўқитувчи",
    "учитель",
    "teacher",
];

/// Cells next to which the class label belongs
pub const CLASS_KEYWORDS: &[&str] = &["sinf", "класс", "class"];

/// True when the lower-cased `text` contains any keyword of `set`
pub fn contains_any(text: &str, set: &[&str]) -> bool {
    let lowered = text.to_lowercase();
    set.iter().any(|k| lowered.contains(k))
}
