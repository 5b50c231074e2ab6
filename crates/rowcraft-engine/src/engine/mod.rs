//! Table computation engine API.
//!
//! This module provides the computation core for table manipulation:
//!
//! - [`Cell`], [`TextSpan`], [`Color`] - Rich-text cell data structures
//! - [`build_matrix`] - Direction-aware slot matrices over table rows
//! - [`valid_indices`] - Filter resolution (indices or header labels)
//! - [`evaluate`] - Aggregate statistics (SUM, AVERAGE, MAX, NAME-series, ...)
//! - [`evaluate_cell_formulas`] - Per-cell `=` formula scanning and evaluation
//! - [`format_number`] - Format values for display

mod cell;
mod error;
mod expr;
mod format;
mod formula;
mod matrix;

pub use cell::{Annotations, Cell, Color, Row, SpanKind, TextSpan};
pub use error::EngineError;
pub use expr::{eval_arithmetic, evaluate_cell_formulas};
pub use format::{format_fixed2, format_number};
pub use formula::{evaluate, parse_number, Statistic};
pub use matrix::{
    build_matrix, valid_indices, CellSlot, Direction, HeaderCells, Selector, TargetFilter,
    ValidIndices,
};
