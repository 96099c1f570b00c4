//! The mutable grid of string cells and its structural operations

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A rectangular grid of text cells
///
/// Every row holds the same number of cells. Rows and columns are only added
/// at the end and then moved into place by adjacent swaps, so the relative
/// order of untouched rows and columns never changes. The column count is
/// kept separately so a table with no rows can still have columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    rows: Vec<Row>,
    columns: usize,
}

/// A row of cells
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Cell contents, one per column
    pub cells: Vec<String>,
}

impl Row {
    /// Create a row of `width` empty cells
    pub fn blank(width: usize) -> Result<Self> {
        let mut cells = Vec::new();
        cells.try_reserve_exact(width)?;
        cells.resize_with(width, String::new);
        Ok(Self { cells })
    }

    /// Get a cell by column index
    pub fn get(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(String::as_str)
    }
}

/// Where a new row or column goes relative to its anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Before,
    After,
}

impl Table {
    /// Create a new empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from raw rows, padding short rows with empty cells
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let rows = rows
            .into_iter()
            .map(|mut cells| {
                cells.resize_with(width, String::new);
                Row { cells }
            })
            .collect();
        Self {
            rows,
            columns: width,
        }
    }

    /// Get the number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns
    pub fn column_count(&self) -> usize {
        self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows, top to bottom
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Get a cell's content, `None` outside the table
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Replace a cell's content
    pub fn set(&mut self, row: usize, col: usize, value: &str) -> Result<()> {
        let cell = self
            .rows
            .get_mut(row)
            .and_then(|r| r.cells.get_mut(col))
            .ok_or(Error::OutOfRange { row: row + 1, col: col + 1 })?;
        cell.clear();
        cell.try_reserve(value.len())?;
        cell.push_str(value);
        Ok(())
    }

    /// Exchange the contents of two cells
    pub fn swap_cells(&mut self, a: (usize, usize), b: (usize, usize)) -> Result<()> {
        self.check(a)?;
        self.check(b)?;
        if a == b {
            return Ok(());
        }
        let first = std::mem::take(&mut self.rows[a.0].cells[a.1]);
        let second = std::mem::replace(&mut self.rows[b.0].cells[b.1], first);
        self.rows[a.0].cells[a.1] = second;
        Ok(())
    }

    fn check(&self, (row, col): (usize, usize)) -> Result<()> {
        if row < self.row_count() && col < self.column_count() {
            Ok(())
        } else {
            Err(Error::OutOfRange { row: row + 1, col: col + 1 })
        }
    }

    /// Append `count` empty rows at the bottom
    pub fn append_rows(&mut self, count: usize) -> Result<()> {
        let width = self.column_count();
        self.rows.try_reserve(count)?;
        for _ in 0..count {
            self.rows.push(Row::blank(width)?);
        }
        Ok(())
    }

    /// Append `count` empty columns on the right
    pub fn append_columns(&mut self, count: usize) -> Result<()> {
        for row in &mut self.rows {
            row.cells.try_reserve(count)?;
            row.cells.extend(std::iter::repeat_with(String::new).take(count));
        }
        self.columns += count;
        Ok(())
    }

    /// Grow the table so it has at least `rows` rows and `cols` columns
    ///
    /// Returns whether anything was added.
    pub fn expand_to(&mut self, rows: usize, cols: usize) -> Result<bool> {
        let missing_rows = rows.saturating_sub(self.row_count());
        let missing_cols = cols.saturating_sub(self.column_count());
        if missing_rows > 0 {
            self.append_rows(missing_rows)?;
        }
        if missing_cols > 0 {
            self.append_columns(missing_cols)?;
        }
        Ok(missing_rows > 0 || missing_cols > 0)
    }

    /// Move a row to a new index by swapping it with its neighbours
    pub fn move_row(&mut self, mut from: usize, to: usize) {
        log::trace!("moving row {} to {}", from + 1, to + 1);
        while from > to {
            self.rows.swap(from, from - 1);
            from -= 1;
        }
        while from < to {
            self.rows.swap(from, from + 1);
            from += 1;
        }
    }

    /// Move a column to a new index in every row by adjacent swaps
    pub fn move_column(&mut self, from: usize, to: usize) {
        log::trace!("moving column {} to {}", from + 1, to + 1);
        for row in &mut self.rows {
            let mut at = from;
            while at > to {
                row.cells.swap(at, at - 1);
                at -= 1;
            }
            while at < to {
                row.cells.swap(at, at + 1);
                at += 1;
            }
        }
    }

    /// Insert one empty row next to `anchor`
    pub fn insert_row(&mut self, anchor: usize, placement: Placement) -> Result<()> {
        if anchor >= self.row_count() {
            return Err(Error::OutOfRange { row: anchor + 1, col: 1 });
        }
        let target = match placement {
            Placement::Before => anchor,
            Placement::After => anchor + 1,
        };
        self.append_rows(1)?;
        let last = self.row_count() - 1;
        self.move_row(last, target);
        Ok(())
    }

    /// Insert one empty column next to `anchor`
    pub fn insert_column(&mut self, anchor: usize, placement: Placement) -> Result<()> {
        if anchor >= self.column_count() {
            return Err(Error::OutOfRange { row: 1, col: anchor + 1 });
        }
        let target = match placement {
            Placement::Before => anchor,
            Placement::After => anchor + 1,
        };
        self.append_columns(1)?;
        let last = self.column_count() - 1;
        self.move_column(last, target);
        Ok(())
    }

    /// Insert an empty row next to each of the `count` rows starting at `start`
    pub fn insert_rows_interleaved(
        &mut self,
        start: usize,
        count: usize,
        placement: Placement,
    ) -> Result<()> {
        // Each insertion shifts the next original row down by one.
        for step in 0..count {
            self.insert_row(start + 2 * step, placement)?;
        }
        Ok(())
    }

    /// Insert an empty column next to each of the `count` columns starting at `start`
    pub fn insert_columns_interleaved(
        &mut self,
        start: usize,
        count: usize,
        placement: Placement,
    ) -> Result<()> {
        for step in 0..count {
            self.insert_column(start + 2 * step, placement)?;
        }
        Ok(())
    }

    /// Remove a row, moving it to the bottom first
    pub fn delete_row(&mut self, index: usize) -> Result<()> {
        if index >= self.row_count() {
            return Err(Error::OutOfRange { row: index + 1, col: 1 });
        }
        let last = self.row_count() - 1;
        self.move_row(index, last);
        self.rows.pop();
        Ok(())
    }

    /// Remove a column, moving it to the right edge first
    pub fn delete_column(&mut self, index: usize) -> Result<()> {
        if index >= self.column_count() {
            return Err(Error::OutOfRange { row: 1, col: index + 1 });
        }
        let last = self.column_count() - 1;
        self.move_column(index, last);
        for row in &mut self.rows {
            row.cells.pop();
        }
        self.columns -= 1;
        Ok(())
    }

    /// Remove rows `first..=last`
    pub fn delete_rows(&mut self, first: usize, last: usize) -> Result<()> {
        for _ in first..=last {
            self.delete_row(first)?;
        }
        Ok(())
    }

    /// Remove columns `first..=last`
    pub fn delete_columns(&mut self, first: usize, last: usize) -> Result<()> {
        for _ in first..=last {
            self.delete_column(first)?;
        }
        Ok(())
    }

    /// Drop every row and column
    pub fn clear(&mut self) {
        self.rows.clear();
        self.columns = 0;
    }

    /// Drop columns on the right edge that are empty in every row
    pub fn trim_trailing_columns(&mut self) {
        while self.columns > 0 {
            let last = self.columns - 1;
            if self.rows.iter().any(|r| !r.cells[last].is_empty()) {
                break;
            }
            for row in &mut self.rows {
                row.cells.pop();
            }
            self.columns -= 1;
        }
    }
}

/// Numeric value of a cell, if it holds a number
///
/// A cell is numeric when it is non-empty and, after the leading number,
/// only spaces remain.
pub fn numeric_value(content: &str) -> Option<f64> {
    let trimmed = content.trim_start().trim_end_matches(' ');
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Render a computed number the way it is stored back into a cell
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value == f64::INFINITY {
        "inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-inf".to_string()
    } else {
        value.to_string()
    }
}
