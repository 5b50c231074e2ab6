//! The multi-step manipulation pipeline.
//!
//! Offsets and evaluation limits are threaded through the steps as one
//! explicit state value: numbering grows the column-side numbers, transpose
//! swaps both pairs, and every later step reads the updated values.

use serde::{Deserialize, Serialize};

use rowcraft_engine::engine::evaluate_cell_formulas;

use crate::error::{Result, TableError};
use crate::table::model::Table;
use crate::table::ops::{
    add_formula_rows, add_numbering, apply_color, sort_rows, transpose_rows, ColorOptions,
    FormulaCall, NumberingOptions, SortOptions,
};

/// One step of a manipulation pipeline.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Numbering {
        #[serde(flatten)]
        options: NumberingOptions,
    },
    Color {
        #[serde(flatten)]
        options: ColorOptions,
    },
    Formula {
        calls: Vec<FormulaCall>,
    },
    CalculateCells,
    Sort {
        #[serde(flatten)]
        options: SortOptions,
    },
    Transpose,
}

/// Offsets and evaluation limits threaded between pipeline steps.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PipelineState {
    pub default_row_idx: usize,
    pub default_col_idx: usize,
    pub limit_row: usize,
    pub limit_col: usize,
}

impl PipelineState {
    /// Seed the state from a table's header flags and dimensions.
    pub fn of(table: &Table) -> PipelineState {
        PipelineState {
            default_row_idx: table.default_row_idx(),
            default_col_idx: table.default_col_idx(),
            limit_row: table.row_count(),
            limit_col: table.width(),
        }
    }
}

/// Run `steps` over `table` in order.
///
/// A transpose among more than two steps must be the first or last step;
/// the pipeline fails before executing anything otherwise. The returned
/// table's header flags are inferred from the final offsets.
pub fn run_pipeline(table: Table, steps: &[Step]) -> Result<Table> {
    if steps.len() > 2 {
        for (i, step) in steps.iter().enumerate() {
            if matches!(step, Step::Transpose) && i != 0 && i != steps.len() - 1 {
                return Err(TableError::TransposeNotAtEdge);
            }
        }
    }

    let mut state = PipelineState::of(&table);
    let mut rows = table.into_rows();
    for step in steps {
        match step {
            Step::Numbering { options } => {
                add_numbering(options, &mut rows, state.default_row_idx);
                state.default_col_idx += 1;
                state.limit_col += 1;
            }
            Step::Color { options } => apply_color(
                options,
                state.default_row_idx,
                state.default_col_idx,
                &mut rows,
                state.limit_row,
                state.limit_col,
            )?,
            Step::Formula { calls } => add_formula_rows(
                calls,
                state.default_row_idx,
                state.default_col_idx,
                &mut rows,
                state.limit_row,
                state.limit_col,
            )?,
            Step::CalculateCells => {
                evaluate_cell_formulas(state.default_row_idx, state.default_col_idx, &mut rows)?
            }
            Step::Sort { options } => {
                sort_rows(options, state.default_row_idx, &mut rows, state.limit_row)?
            }
            Step::Transpose => {
                rows = transpose_rows(&rows);
                state = PipelineState {
                    default_row_idx: state.default_col_idx,
                    default_col_idx: state.default_row_idx,
                    limit_row: state.limit_col,
                    limit_col: state.limit_row,
                };
            }
        }
    }
    Table::from_ragged(rows, state.default_row_idx > 0, state.default_col_idx > 0)
}
