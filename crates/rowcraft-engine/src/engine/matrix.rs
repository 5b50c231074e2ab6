//! Direction-aware matrix views over table rows.
//!
//! Aggregate operations never walk raw rows directly: they build a slot
//! matrix bounded by the current offsets and evaluation limits, so the
//! header row/column stay out of computation and growth from earlier steps
//! (numbering, appended formula rows) is bounded consistently.

use serde::{Deserialize, Serialize};

use super::cell::{Cell, Row};
use super::error::EngineError;

/// Whether an operation walks the table row-wise or column-wise.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "R")]
    Row,
    #[serde(rename = "C")]
    Column,
}

/// A cell position paired with its extracted plain text.
#[derive(Clone, Debug, PartialEq)]
pub struct CellSlot {
    pub row: usize,
    pub col: usize,
    pub text: String,
}

/// Header cells of a table: the label row (row 0) and label column (col 0).
///
/// Captured before an operation mutates rows; NAME-series statistics copy
/// their result spans out of these.
#[derive(Clone, Debug, Default)]
pub struct HeaderCells {
    pub row: Vec<Cell>,
    pub col: Vec<Cell>,
}

impl HeaderCells {
    pub fn of(rows: &[Row]) -> HeaderCells {
        HeaderCells {
            row: rows.first().cloned().unwrap_or_default(),
            col: rows
                .iter()
                .map(|r| r.first().cloned().unwrap_or_default())
                .collect(),
        }
    }
}

/// Build the slot matrix for `direction`.
///
/// For [`Direction::Row`] the outer list indexes rows in
/// `[row_offset, row_limit)` and the inner list columns in
/// `[col_offset, col_limit)`; [`Direction::Column`] swaps outer and inner.
/// Slot coordinates are absolute table coordinates.
pub fn build_matrix(
    direction: Direction,
    rows: &[Row],
    row_offset: usize,
    col_offset: usize,
    row_limit: usize,
    col_limit: usize,
) -> Vec<Vec<CellSlot>> {
    let row_limit = row_limit.min(rows.len());
    let slot = |rows: &[Row], r: usize, c: usize| CellSlot {
        row: r,
        col: c,
        text: rows[r].get(c).map(Cell::plain_text).unwrap_or_default(),
    };
    match direction {
        Direction::Row => (row_offset..row_limit)
            .map(|r| {
                let col_limit = col_limit.min(rows[r].len());
                (col_offset..col_limit).map(|c| slot(rows, r, c)).collect()
            })
            .collect(),
        Direction::Column => {
            let width = rows.first().map_or(0, Vec::len);
            (col_offset..col_limit.min(width))
                .map(|c| (row_offset..row_limit).map(|r| slot(rows, r, c)).collect())
                .collect()
        }
    }
}

/// Rows or columns referenced either by index or by header label.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Selector {
    Indices(Vec<usize>),
    Labels(Vec<String>),
}

impl Selector {
    fn is_empty(&self) -> bool {
        match self {
            Selector::Indices(list) => list.is_empty(),
            Selector::Labels(list) => list.is_empty(),
        }
    }
}

/// Exclusion filters shared by coloring and formula operations.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetFilter {
    /// Rows/columns the operation skips entirely.
    #[serde(default)]
    pub not_apply_to: Option<Selector>,
    /// Rows/columns whose cells are excluded from aggregate computation only.
    #[serde(default)]
    pub ignore: Option<Selector>,
}

/// Row and column indices that survive the filters.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidIndices {
    pub rows: Vec<usize>,
    pub cols: Vec<usize>,
}

/// Resolve `filter` against a table of `rows`.
///
/// `not_apply_to` names the lanes the operation walks (rows when row-wise),
/// `ignore` names the crossing axis. Labels resolve through the header
/// row/column plain text. A filter that would eliminate every candidate is
/// dropped and the full base set returned, so a faulty selector cannot
/// empty the operation.
pub fn valid_indices(
    rows: &[Row],
    filter: &TargetFilter,
    direction: Direction,
    headers: &HeaderCells,
) -> Result<ValidIndices, EngineError> {
    let width = rows.first().map_or(0, Vec::len);
    let base_rows: Vec<usize> = (0..rows.len()).collect();
    let base_cols: Vec<usize> = (0..width).collect();

    let (row_filter, col_filter) = match direction {
        Direction::Row => (&filter.not_apply_to, &filter.ignore),
        Direction::Column => (&filter.ignore, &filter.not_apply_to),
    };

    let rows = apply_filter(row_filter.as_ref(), base_rows, &headers.col)?;
    let cols = apply_filter(col_filter.as_ref(), base_cols, &headers.row)?;
    Ok(ValidIndices { rows, cols })
}

fn apply_filter(
    selector: Option<&Selector>,
    base: Vec<usize>,
    labels: &[Cell],
) -> Result<Vec<usize>, EngineError> {
    let Some(selector) = selector else {
        return Ok(base);
    };
    if selector.is_empty() {
        return Err(EngineError::InvalidSelector);
    }
    let filtered: Vec<usize> = match selector {
        Selector::Indices(excluded) => base
            .iter()
            .copied()
            .filter(|i| !excluded.contains(i))
            .collect(),
        Selector::Labels(excluded) => {
            let texts: Vec<String> = labels.iter().map(Cell::plain_text).collect();
            base.iter()
                .copied()
                .filter(|&i| {
                    let text = texts.get(i).map(String::as_str).unwrap_or("");
                    !excluded.iter().any(|l| l == text)
                })
                .collect()
        }
    };
    if filtered.is_empty() {
        Ok(base)
    } else {
        Ok(filtered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(texts: &[&[&str]]) -> Vec<Row> {
        texts
            .iter()
            .map(|row| row.iter().map(|t| Cell::text(t)).collect())
            .collect()
    }

    #[test]
    fn test_build_matrix_row_wise_skips_headers() {
        let rows = grid(&[&["", "A", "B"], &["x", "1", "2"], &["y", "3", "4"]]);
        let mat = build_matrix(Direction::Row, &rows, 1, 1, 3, 3);
        assert_eq!(mat.len(), 2);
        assert_eq!(mat[0].len(), 2);
        assert_eq!(mat[0][0].text, "1");
        assert_eq!(mat[0][0].row, 1);
        assert_eq!(mat[0][0].col, 1);
        assert_eq!(mat[1][1].text, "4");
    }

    #[test]
    fn test_build_matrix_column_wise_swaps_axes() {
        let rows = grid(&[&["", "A", "B"], &["x", "1", "2"], &["y", "3", "4"]]);
        let mat = build_matrix(Direction::Column, &rows, 1, 1, 3, 3);
        assert_eq!(mat.len(), 2);
        assert_eq!(mat[0][0].text, "1");
        assert_eq!(mat[0][1].text, "3");
        assert_eq!(mat[1][0].text, "2");
    }

    #[test]
    fn test_build_matrix_respects_limits() {
        let rows = grid(&[&["A", "B", "C"], &["1", "2", "3"], &["4", "5", "6"]]);
        let mat = build_matrix(Direction::Row, &rows, 1, 0, 2, 2);
        assert_eq!(mat.len(), 1);
        assert_eq!(mat[0].len(), 2);
        assert_eq!(mat[0][1].text, "2");
    }

    #[test]
    fn test_valid_indices_by_index() {
        let rows = grid(&[&["", "A", "B"], &["x", "1", "2"], &["y", "3", "4"]]);
        let headers = HeaderCells::of(&rows);
        let filter = TargetFilter {
            not_apply_to: Some(Selector::Indices(vec![2])),
            ignore: None,
        };
        let valid = valid_indices(&rows, &filter, Direction::Row, &headers).unwrap();
        assert_eq!(valid.rows, vec![0, 1]);
        assert_eq!(valid.cols, vec![0, 1, 2]);
    }

    #[test]
    fn test_valid_indices_by_label() {
        let rows = grid(&[&["", "A", "B"], &["x", "1", "2"], &["y", "3", "4"]]);
        let headers = HeaderCells::of(&rows);
        let filter = TargetFilter {
            not_apply_to: None,
            ignore: Some(Selector::Labels(vec!["B".to_string()])),
        };
        let valid = valid_indices(&rows, &filter, Direction::Row, &headers).unwrap();
        assert_eq!(valid.cols, vec![0, 1]);
    }

    #[test]
    fn test_valid_indices_column_direction_swaps_filters() {
        let rows = grid(&[&["", "A", "B"], &["x", "1", "2"], &["y", "3", "4"]]);
        let headers = HeaderCells::of(&rows);
        let filter = TargetFilter {
            not_apply_to: Some(Selector::Labels(vec!["B".to_string()])),
            ignore: None,
        };
        let valid = valid_indices(&rows, &filter, Direction::Column, &headers).unwrap();
        // Column-wise: not_apply_to names columns.
        assert_eq!(valid.cols, vec![0, 1]);
        assert_eq!(valid.rows, vec![0, 1, 2]);
    }

    #[test]
    fn test_filter_that_empties_everything_is_dropped() {
        let rows = grid(&[&["a", "b"], &["c", "d"]]);
        let headers = HeaderCells::of(&rows);
        let filter = TargetFilter {
            not_apply_to: Some(Selector::Indices(vec![0, 1])),
            ignore: None,
        };
        let valid = valid_indices(&rows, &filter, Direction::Row, &headers).unwrap();
        assert_eq!(valid.rows, vec![0, 1]);
    }

    #[test]
    fn test_empty_filter_list_is_invalid() {
        let rows = grid(&[&["a"]]);
        let headers = HeaderCells::of(&rows);
        let filter = TargetFilter {
            not_apply_to: Some(Selector::Indices(Vec::new())),
            ignore: None,
        };
        let err = valid_indices(&rows, &filter, Direction::Row, &headers);
        assert!(matches!(err, Err(EngineError::InvalidSelector)));
    }
}
