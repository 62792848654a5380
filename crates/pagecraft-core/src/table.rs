//! Table grid model.
//!
//! A grid of rows and cells with per-column widths and per-row heights.
//! Every row carries exactly one cell per column. The owning element's size
//! is always the sum of the tracks, see [`TableData::size`].

use kurbo::Size;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minimum width of a column and height of a row.
pub const MIN_TRACK_SIZE: f64 = 20.0;
/// Width of a newly inserted column.
pub const DEFAULT_COLUMN_WIDTH: f64 = 150.0;
/// Height of a newly inserted row.
pub const DEFAULT_ROW_HEIGHT: f64 = 60.0;

/// Where a new row or column goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GridEnd {
    /// Above the first row / left of the first column.
    Start,
    /// Below the last row / right of the last column.
    End,
}

/// A single cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    pub id: Uuid,
    pub content: String,
}

impl TableCell {
    pub fn new(content: impl Into<String>) -> Self {
        Self { id: Uuid::new_v4(), content: content.into() }
    }

    pub fn empty() -> Self {
        Self::new(String::new())
    }
}

/// A row of cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub id: Uuid,
    pub cells: Vec<TableCell>,
}

impl TableRow {
    /// A row of `columns` empty cells.
    pub fn empty(columns: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            cells: (0..columns).map(|_| TableCell::empty()).collect(),
        }
    }

    pub fn from_contents<I, S>(contents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: Uuid::new_v4(),
            cells: contents.into_iter().map(TableCell::new).collect(),
        }
    }
}

/// Grid data owned by a table element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableData {
    pub rows: Vec<TableRow>,
    pub column_widths: Vec<f64>,
    pub row_heights: Vec<f64>,
}

impl Default for TableData {
    /// The 2x2 table inserted from the sidebar.
    fn default() -> Self {
        Self {
            rows: vec![
                TableRow::from_contents(["Header 1", "Header 2"]),
                TableRow::from_contents(["Data 1", "Data 2"]),
            ],
            column_widths: vec![200.0, 200.0],
            row_heights: vec![DEFAULT_ROW_HEIGHT, DEFAULT_ROW_HEIGHT],
        }
    }
}

impl TableData {
    /// An empty grid of `rows` x `columns` with default track sizes.
    /// Both dimensions are raised to at least 1.
    pub fn with_dimensions(rows: usize, columns: usize) -> Self {
        let rows = rows.max(1);
        let columns = columns.max(1);
        Self {
            rows: (0..rows).map(|_| TableRow::empty(columns)).collect(),
            column_widths: vec![DEFAULT_COLUMN_WIDTH; columns],
            row_heights: vec![DEFAULT_ROW_HEIGHT; rows],
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.column_widths.len()
    }

    /// Total size: sum of column widths by sum of row heights.
    pub fn size(&self) -> Size {
        Size::new(
            self.column_widths.iter().sum(),
            self.row_heights.iter().sum(),
        )
    }

    /// Check the grid invariants (shape and non-empty).
    pub fn is_consistent(&self) -> bool {
        let columns = self.column_count();
        columns > 0
            && !self.rows.is_empty()
            && self.rows.len() == self.row_heights.len()
            && self.rows.iter().all(|row| row.cells.len() == columns)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&TableCell> {
        self.rows.get(row)?.cells.get(column)
    }

    pub fn insert_row(&mut self, at: GridEnd) {
        let row = TableRow::empty(self.column_count());
        match at {
            GridEnd::Start => {
                self.rows.insert(0, row);
                self.row_heights.insert(0, DEFAULT_ROW_HEIGHT);
            }
            GridEnd::End => {
                self.rows.push(row);
                self.row_heights.push(DEFAULT_ROW_HEIGHT);
            }
        }
    }

    pub fn insert_column(&mut self, at: GridEnd) {
        match at {
            GridEnd::Start => {
                self.column_widths.insert(0, DEFAULT_COLUMN_WIDTH);
                for row in &mut self.rows {
                    row.cells.insert(0, TableCell::empty());
                }
            }
            GridEnd::End => {
                self.column_widths.push(DEFAULT_COLUMN_WIDTH);
                for row in &mut self.rows {
                    row.cells.push(TableCell::empty());
                }
            }
        }
    }

    /// Remove the last row. Returns false when only one row is left.
    pub fn remove_row(&mut self) -> bool {
        if self.rows.len() <= 1 {
            return false;
        }
        self.rows.pop();
        self.row_heights.pop();
        true
    }

    /// Remove the last column. Returns false when only one column is left.
    pub fn remove_column(&mut self) -> bool {
        if self.column_widths.len() <= 1 {
            return false;
        }
        self.column_widths.pop();
        for row in &mut self.rows {
            row.cells.pop();
        }
        true
    }

    /// Set a column width, clamped to [`MIN_TRACK_SIZE`].
    /// Returns false if the index is out of range.
    pub fn resize_column(&mut self, index: usize, width: f64) -> bool {
        match self.column_widths.get_mut(index) {
            Some(w) => {
                *w = clamp_track(width);
                true
            }
            None => false,
        }
    }

    /// Set a row height, clamped to [`MIN_TRACK_SIZE`].
    /// Returns false if the index is out of range.
    pub fn resize_row(&mut self, index: usize, height: f64) -> bool {
        match self.row_heights.get_mut(index) {
            Some(h) => {
                *h = clamp_track(height);
                true
            }
            None => false,
        }
    }

    /// Replace one cell's content. Returns false if either index is out of range.
    pub fn set_cell_content(&mut self, row: usize, column: usize, text: impl Into<String>) -> bool {
        match self.rows.get_mut(row).and_then(|r| r.cells.get_mut(column)) {
            Some(cell) => {
                cell.content = text.into();
                true
            }
            None => false,
        }
    }

    /// Bring a grid loaded from storage back to a consistent shape: at least
    /// one row and column, one height per row, one cell per column in every
    /// row, every track at least [`MIN_TRACK_SIZE`]. Returns true if anything
    /// had to change.
    pub fn repair(&mut self) -> bool {
        let before = self.clone();

        if self.column_widths.is_empty() {
            let columns = self.rows.iter().map(|r| r.cells.len()).max().unwrap_or(0).max(1);
            self.column_widths = vec![DEFAULT_COLUMN_WIDTH; columns];
        }
        if self.rows.is_empty() {
            self.rows.push(TableRow::empty(self.column_count()));
        }
        self.row_heights.resize(self.rows.len(), DEFAULT_ROW_HEIGHT);

        let columns = self.column_count();
        for row in &mut self.rows {
            row.cells.truncate(columns);
            while row.cells.len() < columns {
                row.cells.push(TableCell::empty());
            }
        }
        for track in self.column_widths.iter_mut().chain(self.row_heights.iter_mut()) {
            *track = clamp_track(*track);
        }

        *self != before
    }

    /// Rescale all tracks proportionally so the grid approaches `target`.
    /// Each track keeps the minimum size, so the result may be larger than
    /// requested; read the real size back with [`TableData::size`].
    pub fn fit_to(&mut self, target: Size) {
        let current = self.size();
        if current.width > 0.0 {
            let factor = target.width / current.width;
            for w in &mut self.column_widths {
                *w = clamp_track(*w * factor);
            }
        }
        if current.height > 0.0 {
            let factor = target.height / current.height;
            for h in &mut self.row_heights {
                *h = clamp_track(*h * factor);
            }
        }
    }
}

fn clamp_track(value: f64) -> f64 {
    if value.is_finite() { value.max(MIN_TRACK_SIZE) } else { MIN_TRACK_SIZE }
}

/// A structural or content edit on a table element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TableEdit {
    InsertRow(GridEnd),
    InsertColumn(GridEnd),
    RemoveRow,
    RemoveColumn,
    ResizeColumn { index: usize, width: f64 },
    ResizeRow { index: usize, height: f64 },
    SetCell { row: usize, column: usize, content: String },
}

impl TableEdit {
    /// Apply the edit. Returns false when it was refused or out of range.
    pub fn apply(self, table: &mut TableData) -> bool {
        match self {
            TableEdit::InsertRow(at) => {
                table.insert_row(at);
                true
            }
            TableEdit::InsertColumn(at) => {
                table.insert_column(at);
                true
            }
            TableEdit::RemoveRow => table.remove_row(),
            TableEdit::RemoveColumn => table.remove_column(),
            TableEdit::ResizeColumn { index, width } => table.resize_column(index, width),
            TableEdit::ResizeRow { index, height } => table.resize_row(index, height),
            TableEdit::SetCell { row, column, content } => {
                table.set_cell_content(row, column, content)
            }
        }
    }
}
