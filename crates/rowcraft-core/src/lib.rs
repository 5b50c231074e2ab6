//! rowcraft-core - table model, row/column operations and storage.

pub mod error;
pub mod storage;
pub mod table;

pub use error::{Result, TableError};
pub use table::{
    Append, ColorOptions, FormulaCall, NumberingOptions, PipelineState, SortOptions, SplitMethod,
    Step, Table,
};

pub use rowcraft_engine::engine::{Cell, Color, Direction, Row, Selector, Statistic, TargetFilter};
