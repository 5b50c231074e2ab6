//! Aggregate statistics over a selection of cell slots.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::cell::{Cell, TextSpan};
use super::error::EngineError;
use super::format::{format_fixed2, format_number};
use super::matrix::{CellSlot, Direction, HeaderCells};

/// The aggregate statistics a formula call can request.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Statistic {
    Sum,
    Average,
    Count,
    Max,
    SecondMax,
    MaxName,
    SecondMaxName,
    Min,
    SecondMin,
    MinName,
    SecondMinName,
}

impl Statistic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Statistic::Sum => "SUM",
            Statistic::Average => "AVERAGE",
            Statistic::Count => "COUNT",
            Statistic::Max => "MAX",
            Statistic::SecondMax => "SECONDMAX",
            Statistic::MaxName => "MAXNAME",
            Statistic::SecondMaxName => "SECONDMAXNAME",
            Statistic::Min => "MIN",
            Statistic::SecondMin => "SECONDMIN",
            Statistic::MinName => "MINNAME",
            Statistic::SecondMinName => "SECONDMINNAME",
        }
    }

    /// Header label used for a result row or column when the caller does
    /// not provide one.
    pub fn default_label(&self) -> &'static str {
        match self {
            Statistic::Sum => "Sum",
            Statistic::Average => "Average",
            Statistic::Count => "Count",
            Statistic::Max => "Max",
            Statistic::SecondMax => "2nd Max",
            Statistic::MaxName => "Max(name)",
            Statistic::SecondMaxName => "2nd Max(name)",
            Statistic::Min => "Min",
            Statistic::SecondMin => "2nd Min",
            Statistic::MinName => "Min(name)",
            Statistic::SecondMinName => "2nd Min(name)",
        }
    }

    /// Whether the result is header labels rather than a number.
    pub fn is_name_series(&self) -> bool {
        matches!(
            self,
            Statistic::MaxName
                | Statistic::SecondMaxName
                | Statistic::MinName
                | Statistic::SecondMinName
        )
    }

    /// How many distinct numeric values the statistic needs.
    fn required_distinct(&self) -> usize {
        match self {
            Statistic::Sum | Statistic::Average | Statistic::Count => 0,
            Statistic::Max | Statistic::MaxName | Statistic::Min | Statistic::MinName => 1,
            Statistic::SecondMax
            | Statistic::SecondMaxName
            | Statistic::SecondMin
            | Statistic::SecondMinName => 2,
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Statistic {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Statistic, EngineError> {
        match s {
            "SUM" => Ok(Statistic::Sum),
            "AVERAGE" => Ok(Statistic::Average),
            "COUNT" => Ok(Statistic::Count),
            "MAX" => Ok(Statistic::Max),
            "SECONDMAX" => Ok(Statistic::SecondMax),
            "MAXNAME" => Ok(Statistic::MaxName),
            "SECONDMAXNAME" => Ok(Statistic::SecondMaxName),
            "MIN" => Ok(Statistic::Min),
            "SECONDMIN" => Ok(Statistic::SecondMin),
            "MINNAME" => Ok(Statistic::MinName),
            "SECONDMINNAME" => Ok(Statistic::SecondMinName),
            other => Err(EngineError::UnknownStatistic(other.to_string())),
        }
    }
}

/// Parse a cell text as a number. Blank cells count as zero.
pub fn parse_number(text: &str) -> Result<f64, EngineError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    trimmed
        .parse::<f64>()
        .map_err(|_| EngineError::NonNumericOperand(text.to_string()))
}

/// Evaluate `statistic` over `slots`, walked in `direction`.
///
/// Numeric statistics return a plain text cell. NAME-series statistics look
/// up the header label of each slot achieving the extremum: the header row
/// when walking row-wise, the header column when walking column-wise. Ties
/// keep selection order and are joined with `", "`.
pub fn evaluate(
    direction: Direction,
    statistic: Statistic,
    slots: &[CellSlot],
    headers: &HeaderCells,
) -> Result<Cell, EngineError> {
    match statistic {
        Statistic::Sum => {
            let mut total = 0.0;
            for slot in slots {
                total += parse_number(&slot.text)?;
            }
            Ok(Cell::text(&format_number(total)))
        }
        Statistic::Average => {
            if slots.is_empty() {
                return Err(EngineError::NotEnoughValues(statistic));
            }
            let mut total = 0.0;
            for slot in slots {
                total += parse_number(&slot.text)?;
            }
            Ok(Cell::text(&format_fixed2(total / slots.len() as f64)))
        }
        Statistic::Count => Ok(Cell::text(&format_number(slots.len() as f64))),
        _ => {
            let values = distinct_sorted(slots)?;
            if values.len() < statistic.required_distinct() {
                return Err(EngineError::NotEnoughValues(statistic));
            }
            let target = match statistic {
                Statistic::Max | Statistic::MaxName => values[values.len() - 1],
                Statistic::SecondMax | Statistic::SecondMaxName => values[values.len() - 2],
                Statistic::Min | Statistic::MinName => values[0],
                Statistic::SecondMin | Statistic::SecondMinName => values[1],
                _ => unreachable!(),
            };
            if statistic.is_name_series() {
                labels_of(direction, target, slots, headers)
            } else {
                Ok(Cell::text(&format_number(target)))
            }
        }
    }
}

/// Deduplicated ascending numeric values of the slots.
fn distinct_sorted(slots: &[CellSlot]) -> Result<Vec<f64>, EngineError> {
    let mut values = Vec::with_capacity(slots.len());
    for slot in slots {
        let n = parse_number(&slot.text)?;
        if !values.contains(&n) {
            values.push(n);
        }
    }
    values.sort_by(|a, b| a.total_cmp(b));
    Ok(values)
}

/// Header label cells of every slot whose value equals `target`.
fn labels_of(
    direction: Direction,
    target: f64,
    slots: &[CellSlot],
    headers: &HeaderCells,
) -> Result<Cell, EngineError> {
    let mut spans: Vec<TextSpan> = Vec::new();
    for slot in slots {
        if parse_number(&slot.text)? != target {
            continue;
        }
        let label = match direction {
            Direction::Row => headers.row.get(slot.col),
            Direction::Column => headers.col.get(slot.row),
        };
        if !spans.is_empty() {
            spans.push(TextSpan::text(", "));
        }
        if let Some(cell) = label {
            spans.extend(cell.spans.iter().cloned());
        }
    }
    Ok(Cell { spans })
}
