use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Characters Excel refuses in a sheet title
const FORBIDDEN_TITLE_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];
const MAX_TITLE_LEN: usize = 31;

/// A single cell of a grid, reduced to what the merge heuristics understand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// Dates and error values: kept for display, never interpreted
    Other(String),
}

impl Default for Cell {
    fn default() -> Self {
        Cell::Empty
    }
}

impl Cell {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<Option<f64>> for Cell {
    fn from(value: Option<f64>) -> Self {
        value.map(Cell::Number).unwrap_or(Cell::Empty)
    }
}

static EMPTY_CELL: Cell = Cell::Empty;

/// A cell write recorded on a grid after it was loaded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellEdit {
    pub row: u32,
    pub col: u32,
    pub value: Cell,
}

/// Sparse, 1-indexed sheet contents.
///
/// Cells written through [`Grid::set`] are remembered so the writer can replay
/// them onto the original file without touching anything else.
#[derive(Debug, Clone, Default)]
pub struct Grid {
    cells: HashMap<(u32, u32), Cell>,
    edits: BTreeSet<(u32, u32)>,
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a grid from row vectors, the first vector landing on row 1
    pub fn from_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator<Item = Cell>,
    {
        let mut grid = Grid::new();
        for (row_idx, row) in rows.into_iter().enumerate() {
            for (col_idx, cell) in row.into_iter().enumerate() {
                grid.load(row_idx as u32 + 1, col_idx as u32 + 1, cell);
            }
        }
        grid
    }

    /// Place a cell without recording it as an edit
    pub(crate) fn load(&mut self, row: u32, col: u32, cell: Cell) {
        if row == 0 || col == 0 || cell.is_empty() {
            return;
        }
        self.cells.insert((row, col), cell);
    }

    pub fn get(&self, row: u32, col: u32) -> &Cell {
        self.cells.get(&(row, col)).unwrap_or(&EMPTY_CELL)
    }

    pub fn text(&self, row: u32, col: u32) -> Option<&str> {
        self.get(row, col).as_text()
    }

    pub fn set(&mut self, row: u32, col: u32, cell: impl Into<Cell>) {
        if row == 0 || col == 0 {
            return;
        }
        let cell = cell.into();
        if cell.is_empty() {
            self.cells.remove(&(row, col));
        } else {
            self.cells.insert((row, col), cell);
        }
        self.edits.insert((row, col));
    }

    /// Writes made since loading, in row-major order
    pub fn edits(&self) -> impl Iterator<Item = CellEdit> + '_ {
        self.edits.iter().map(move |&(row, col)| CellEdit {
            row,
            col,
            value: self.get(row, col).clone(),
        })
    }

    pub fn edit_count(&self) -> usize {
        self.edits.len()
    }
}

/// A named grid. `loaded_name` never changes so renames can be replayed.
#[derive(Debug, Clone)]
pub struct Sheet {
    name: String,
    loaded_name: String,
    grid: Grid,
}

impl Sheet {
    pub fn new(name: impl Into<String>, grid: Grid) -> Self {
        let name = name.into();
        Sheet {
            loaded_name: name.clone(),
            name,
            grid,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn loaded_name(&self) -> &str {
        &self.loaded_name
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }
}

/// Ordered collection of sheets
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Workbook { sheets }
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn first(&self) -> Option<&Sheet> {
        self.sheets.first()
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(Sheet::name).collect()
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_mut(&mut self, name: &str) -> Option<&mut Sheet> {
        self.sheets.iter_mut().find(|s| s.name == name)
    }

    pub fn sheet_by_loaded_name(&self, loaded_name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.loaded_name == loaded_name)
    }

    /// Retitle the sheet at `index`. Titles are unique ignoring case, as in Excel.
    pub fn rename_sheet(&mut self, index: usize, name: &str) -> Result<(), ExcelError> {
        if index >= self.sheets.len() {
            return Err(ExcelError::sheet_not_found(&format!("#{}", index + 1)));
        }
        if self.sheets[index].name == name {
            return Ok(());
        }
        validate_sheet_title(name)?;

        let folded = name.to_lowercase();
        let taken = self
            .sheets
            .iter()
            .enumerate()
            .any(|(i, s)| i != index && s.name.to_lowercase() == folded);
        if taken {
            return Err(ExcelError::new(
                format!("Sheet name already in use: {}", name),
                ExcelErrorType::InvalidSheetName,
            ));
        }

        self.sheets[index].name = name.to_string();
        Ok(())
    }
}

fn validate_sheet_title(name: &str) -> Result<(), ExcelError> {
    let invalid = name.is_empty()
        || name.chars().count() > MAX_TITLE_LEN
        || name.contains(&FORBIDDEN_TITLE_CHARS[..])
        || name.starts_with('\'')
        || name.ends_with('\'');

    if invalid {
        return Err(ExcelError::new(
            format!("Invalid sheet name: {:?}", name),
            ExcelErrorType::InvalidSheetName,
        ));
    }
    Ok(())
}

/// Excel-specific errors
#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct ExcelError {
    pub message: String,
    pub error_type: ExcelErrorType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExcelErrorType {
    InvalidFormat,
    SheetNotFound,
    InvalidSheetName,
    ReadError,
    WriteError,
}

impl ExcelError {
    pub fn new(message: impl Into<String>, error_type: ExcelErrorType) -> Self {
        ExcelError {
            message: message.into(),
            error_type,
        }
    }

    pub fn invalid_format(message: impl Into<String>) -> Self {
        ExcelError::new(message, ExcelErrorType::InvalidFormat)
    }

    pub fn sheet_not_found(sheet: &str) -> Self {
        ExcelError::new(format!("Sheet not found: {}", sheet), ExcelErrorType::SheetNotFound)
    }

    pub fn read_error(message: impl Into<String>) -> Self {
        ExcelError::new(message, ExcelErrorType::ReadError)
    }

    pub fn write_error(message: impl Into<String>) -> Self {
        ExcelError::new(message, ExcelErrorType::WriteError)
    }
}
