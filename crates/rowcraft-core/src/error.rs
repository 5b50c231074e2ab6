//! Error types for the table model and operations.

use thiserror::Error;

use rowcraft_engine::engine::{EngineError, Statistic};

/// Errors that can occur while building or transforming tables.
#[derive(Error, Debug)]
pub enum TableError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("ragged rows: expected width {expected}, found a row of width {found}")]
    RaggedRows { expected: usize, found: usize },

    #[error("a table needs at least one row")]
    EmptyTable,

    #[error("transpose must be the first or last step of a pipeline")]
    TransposeNotAtEdge,

    #[error("no column labeled {0:?} in the header row")]
    LabelNotFound(String),

    #[error("sort needs a non-empty column label")]
    EmptySortLabel,

    #[error("{statistic} needs a populated label axis")]
    MissingLabelAxis { statistic: Statistic },

    #[error("no cut point found to split the table at")]
    NoCutPoint,

    #[error("when any joined table carries a header row, the first one must too")]
    JoinHeaderMismatch,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("JSON input must be an object of objects")]
    JsonShape,
}

pub type Result<T> = std::result::Result<T, TableError>;
