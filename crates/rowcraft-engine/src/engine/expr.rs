//! Per-cell `=` formula scanning and evaluation.
//!
//! Cells whose text starts with `=` may hold an aggregate call such as
//! `R_SUM()` or `C_AVERAGE(1,3)`, bare cell references (`R2`, `C3`), and
//! arithmetic over the results. The scan runs row-major, top-to-bottom and
//! left-to-right, and rewrites cells in place: a later formula that
//! references an earlier cell sees the earlier cell's computed text, while
//! a formula referencing a cell further along in the scan reads its raw,
//! unevaluated text.

use std::sync::OnceLock;

use regex::Regex;

use super::cell::{Cell, Row};
use super::error::EngineError;
use super::format::{format_fixed2, format_number};
use super::formula::{evaluate, Statistic};
use super::matrix::{CellSlot, Direction, HeaderCells};

/// Marker text for an expression that is not pure arithmetic after
/// substitution.
pub const INVALID_FORMULA: &str = "invalid formula";

fn call_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([CR])_([A-Z]+)\(([^)]*)\)").unwrap())
}

fn cell_ref_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[RC]\d+").unwrap())
}

fn non_arithmetic_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\d+\-*/().]").unwrap())
}

/// Scan `rows` and evaluate every `=`-prefixed cell in place.
///
/// `row_offset`/`col_offset` bound the implicit range of calls with empty
/// parentheses: `=R_SUM()` in column `c` sums columns `[col_offset, c)` of
/// its own row.
pub fn evaluate_cell_formulas(
    row_offset: usize,
    col_offset: usize,
    rows: &mut [Row],
) -> Result<(), EngineError> {
    let headers = HeaderCells::of(rows);
    let mut texts: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(Cell::plain_text).collect())
        .collect();

    for r in 0..rows.len() {
        for c in 0..rows[r].len() {
            let text = texts[r][c].clone();
            let Some(body) = text.strip_prefix('=') else {
                continue;
            };

            let mut residue = body.to_string();
            let mut call_only = false;
            if let Some(caps) = call_re().captures(&text) {
                let full_call = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
                let direction = match &caps[1] {
                    "R" => Direction::Row,
                    _ => Direction::Column,
                };
                let statistic: Statistic = caps[2].parse()?;
                let slots = range_slots(direction, &caps[3], r, c, row_offset, col_offset, &texts)?;
                call_only = text.len() == full_call.len() + 1;

                let result = evaluate(direction, statistic, &slots, &headers)?;
                let result_text = result.plain_text();
                rows[r][c] = result;
                residue = body.replacen(full_call, &result_text, 1);
                texts[r][c] = residue.clone();
            }
            if call_only {
                continue;
            }

            // Cell references resolve against the text matrix as it stands
            // mid-scan. Out-of-range references read as empty text.
            let refs: Vec<String> = cell_ref_re()
                .find_iter(&residue)
                .map(|m| m.as_str().to_string())
                .collect();
            for reference in refs {
                let idx: usize = reference[1..].parse().unwrap_or(usize::MAX);
                let replacement = if reference.starts_with('R') {
                    texts.get(idx).and_then(|row| row.get(c))
                } else {
                    texts[r].get(idx)
                };
                let replacement = replacement.cloned().unwrap_or_default();
                residue = residue.replacen(&reference, &replacement, 1);
            }

            let new_text = if non_arithmetic_re().is_match(&residue) {
                INVALID_FORMULA.to_string()
            } else {
                let value = eval_arithmetic(&residue)?;
                if value.fract() == 0.0 {
                    format_number(value)
                } else {
                    format_fixed2(value)
                }
            };
            rows[r][c] = Cell::text(&new_text);
            texts[r][c] = new_text;
        }
    }
    Ok(())
}

/// Resolve a call's range into cell slots.
///
/// An empty range runs from the default offset up to, but excluding, the
/// calling cell's own position; `start,end` is inclusive on both ends.
fn range_slots(
    direction: Direction,
    range: &str,
    r: usize,
    c: usize,
    row_offset: usize,
    col_offset: usize,
    texts: &[Vec<String>],
) -> Result<Vec<CellSlot>, EngineError> {
    let (start, end) = if range.is_empty() {
        match direction {
            Direction::Row => (col_offset, c),
            Direction::Column => (row_offset, r),
        }
    } else {
        let (a, b) = range
            .split_once(',')
            .ok_or_else(|| EngineError::MalformedExpression(range.to_string()))?;
        let parse = |s: &str| {
            s.trim()
                .parse::<usize>()
                .map_err(|_| EngineError::MalformedExpression(range.to_string()))
        };
        (parse(a)?, parse(b)? + 1)
    };

    let slots = match direction {
        Direction::Row => (start..end.min(texts[r].len()))
            .map(|col| CellSlot {
                row: r,
                col,
                text: texts[r][col].clone(),
            })
            .collect(),
        Direction::Column => (start..end.min(texts.len()))
            .map(|row| CellSlot {
                row,
                col: c,
                text: texts[row].get(c).cloned().unwrap_or_default(),
            })
            .collect(),
    };
    Ok(slots)
}

/// Evaluate a plain arithmetic expression over `+ - * / ( )` and numbers.
pub fn eval_arithmetic(input: &str) -> Result<f64, EngineError> {
    let tokens = tokenize(input)?;
    let mut parser = Parser { tokens, pos: 0 };
    let value = parser.expr()?;
    if parser.pos != parser.tokens.len() {
        return Err(EngineError::MalformedExpression(input.to_string()));
    }
    Ok(value)
}

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

fn tokenize(input: &str) -> Result<Vec<Token>, EngineError> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = input.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let ch = chars[i];
        match ch {
            ' ' => i += 1,
            '+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            '*' => {
                tokens.push(Token::Star);
                i += 1;
            }
            '/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let literal: String = chars[start..i].iter().collect();
                let number = literal
                    .parse::<f64>()
                    .map_err(|_| EngineError::MalformedExpression(input.to_string()))?;
                tokens.push(Token::Number(number));
            }
            _ => return Err(EngineError::MalformedExpression(input.to_string())),
        }
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expr(&mut self) -> Result<f64, EngineError> {
        let mut value = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.pos += 1;
                    value += self.term()?;
                }
                Some(Token::Minus) => {
                    self.pos += 1;
                    value -= self.term()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn term(&mut self) -> Result<f64, EngineError> {
        let mut value = self.factor()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.pos += 1;
                    value *= self.factor()?;
                }
                Some(Token::Slash) => {
                    self.pos += 1;
                    value /= self.factor()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn factor(&mut self) -> Result<f64, EngineError> {
        match self.bump() {
            Some(Token::Number(n)) => Ok(n),
            Some(Token::Minus) => Ok(-self.factor()?),
            Some(Token::LParen) => {
                let value = self.expr()?;
                match self.bump() {
                    Some(Token::RParen) => Ok(value),
                    _ => Err(EngineError::MalformedExpression(
                        "missing closing parenthesis".to_string(),
                    )),
                }
            }
            other => Err(EngineError::MalformedExpression(format!("{:?}", other))),
        }
    }
}
