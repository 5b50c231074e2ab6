//! The rectangular table model.

use serde::{Deserialize, Serialize};

use rowcraft_engine::engine::{Cell, Row};

use crate::error::{Result, TableError};

/// A rectangular grid of rich-text cells plus header flags.
///
/// Width equality across rows is a constructor invariant: operations that
/// lengthen rows unevenly pad with empty cells before handing rows back.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub(crate) rows: Vec<Row>,
    pub(crate) width: usize,
    /// Row 0 is a label row.
    pub has_column_header: bool,
    /// Column 0 is a label column.
    pub has_row_header: bool,
}

impl Table {
    /// Build a table from rows of equal length.
    pub fn new(rows: Vec<Row>, has_column_header: bool, has_row_header: bool) -> Result<Table> {
        let Some(first) = rows.first() else {
            return Err(TableError::EmptyTable);
        };
        let width = first.len();
        for row in &rows {
            if row.len() != width {
                return Err(TableError::RaggedRows {
                    expected: width,
                    found: row.len(),
                });
            }
        }
        Ok(Table {
            rows,
            width,
            has_column_header,
            has_row_header,
        })
    }

    /// Build a table from rows of any length, padding short rows with
    /// empty cells.
    pub fn from_ragged(
        mut rows: Vec<Row>,
        has_column_header: bool,
        has_row_header: bool,
    ) -> Result<Table> {
        if rows.is_empty() {
            return Err(TableError::EmptyTable);
        }
        pad_rows(&mut rows);
        Table::new(rows, has_column_header, has_row_header)
    }

    /// Build a table of plain text cells.
    pub fn from_texts(
        texts: &[Vec<String>],
        has_column_header: bool,
        has_row_header: bool,
    ) -> Result<Table> {
        let rows = texts
            .iter()
            .map(|row| row.iter().map(|t| Cell::text(t)).collect())
            .collect();
        Table::from_ragged(rows, has_column_header, has_row_header)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    /// First row index considered data.
    pub fn default_row_idx(&self) -> usize {
        usize::from(self.has_column_header)
    }

    /// First column index considered data.
    pub fn default_col_idx(&self) -> usize {
        usize::from(self.has_row_header)
    }

    /// The plain text of every cell, row-major.
    pub fn plain_texts(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(Cell::plain_text).collect())
            .collect()
    }
}

/// Pad every row to the longest row's length with empty cells.
pub(crate) fn pad_rows(rows: &mut [Row]) {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    for row in rows {
        row.resize(width, Cell::empty());
    }
}
