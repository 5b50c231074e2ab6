//! Engine error types.

use thiserror::Error;

use super::formula::Statistic;

/// Errors raised by matrix filtering, statistics and cell formulas.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("unknown statistic: {0:?}")]
    UnknownStatistic(String),

    #[error("non-numeric operand: {0:?}")]
    NonNumericOperand(String),

    #[error("{0} needs more distinct values than the selection holds")]
    NotEnoughValues(Statistic),

    #[error("invalid selector: an empty filter list excludes nothing and selects nothing")]
    InvalidSelector,

    #[error("malformed expression: {0:?}")]
    MalformedExpression(String),
}
