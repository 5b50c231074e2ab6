//! Table model, row/column operations and the pipeline orchestrator.

mod model;
mod ops;
mod pipeline;

pub use model::Table;
pub use ops::{
    add_formula_rows, add_numbering, apply_color, join_tables, sort_rows, split_rows,
    transpose_rows, Append, ColorOptions, FormulaCall, NumberingOptions, SortOptions, SplitMethod,
};
pub use pipeline::{run_pipeline, PipelineState, Step};
