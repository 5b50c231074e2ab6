//! Row/column operations: sort, transpose, numbering, coloring, formula
//! rows, split and join.
//!
//! The free functions operate on a raw row list plus the current offsets
//! and evaluation limits; the pipeline threads those through. The methods
//! on [`Table`] are the standalone entry points, seeded from the table's
//! own header flags and dimensions.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use rowcraft_engine::engine::{
    build_matrix, evaluate, evaluate_cell_formulas, parse_number, valid_indices, Cell, CellSlot,
    Color, Direction, HeaderCells, Row, Statistic, TargetFilter,
};

use crate::error::{Result, TableError};
use crate::table::model::{pad_rows, Table};

fn default_true() -> bool {
    true
}

/// Options for sorting rows by one column.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SortOptions {
    /// Header label of the sort column. Exact match required.
    pub label: String,
    /// Compare cell texts as numbers rather than strings.
    #[serde(default = "default_true")]
    pub as_number: bool,
    /// Descending order.
    #[serde(default = "default_true")]
    pub high_to_low: bool,
}

/// Options for the numbering column.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberingOptions {
    /// Text of the header row's numbering cell.
    pub label: String,
    /// Cell template; `{num}` is replaced by the computed number.
    pub text_format: String,
    pub start_number: i64,
    pub step: i64,
}

impl Default for NumberingOptions {
    fn default() -> NumberingOptions {
        NumberingOptions {
            label: String::new(),
            text_format: "{num}".to_string(),
            start_number: 1,
            step: 1,
        }
    }
}

/// Options for max/min cell coloring.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ColorOptions {
    pub direction: Direction,
    #[serde(flatten)]
    pub filter: TargetFilter,
    #[serde(default)]
    pub max: Option<Color>,
    #[serde(default)]
    pub min: Option<Color>,
}

/// Where a formula call's results land.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Append {
    #[serde(rename = "newRow")]
    NewRow,
    #[serde(rename = "newColumn")]
    NewColumn,
}

impl Append {
    /// The evaluator direction a placement implies. A new row holds one
    /// result per column, so it aggregates column-wise; a new column
    /// aggregates row-wise.
    pub fn statistic_direction(self) -> Direction {
        match self {
            Append::NewRow => Direction::Column,
            Append::NewColumn => Direction::Row,
        }
    }
}

/// One table-wide formula request.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FormulaCall {
    pub append: Append,
    pub statistic: Statistic,
    /// Label of the new row/column; defaults to the statistic name.
    #[serde(default)]
    pub label: Option<String>,
    #[serde(flatten)]
    pub filter: TargetFilter,
    /// Color for the extremal result cell(s).
    #[serde(default)]
    pub max: Option<Color>,
    #[serde(default)]
    pub min: Option<Color>,
}

/// How to partition a table's rows into groups.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "method", content = "options", rename_all = "snake_case")]
pub enum SplitMethod {
    /// An all-empty row starts a new group and is consumed.
    ByBlank,
    /// Every `number` data rows start a new group.
    ByNumber { number: usize },
    /// A row whose first cell matches one of these labels starts a new
    /// group and becomes its first data row.
    ByLabels { row_labels: Vec<String> },
}

/// Reorder the data rows `[default_row_idx, limit_row)` by one column.
///
/// Numeric comparison puts rows with unparsable or empty key text before
/// all numeric keys (so they trail the result under the default descending
/// order); among themselves they compare as strings. The sort is stable.
pub fn sort_rows(
    options: &SortOptions,
    default_row_idx: usize,
    rows: &mut Vec<Row>,
    limit_row: usize,
) -> Result<()> {
    if options.label.is_empty() {
        return Err(TableError::EmptySortLabel);
    }
    let labels: Vec<String> = rows
        .first()
        .map(|row| row.iter().map(Cell::plain_text).collect())
        .unwrap_or_default();
    let col = labels
        .iter()
        .position(|lb| *lb == options.label)
        .ok_or_else(|| TableError::LabelNotFound(options.label.clone()))?;

    struct Record {
        index: usize,
        text: String,
        value: Option<f64>,
    }
    let limit = limit_row.min(rows.len());
    let mut records: Vec<Record> = (default_row_idx..limit)
        .map(|r| {
            let text = rows[r].get(col).map(Cell::plain_text).unwrap_or_default();
            let value = options
                .as_number
                .then(|| text.trim().parse::<f64>().ok())
                .flatten();
            Record {
                index: r,
                text,
                value,
            }
        })
        .collect();
    records.sort_by(|a, b| match (a.value, b.value) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => a.text.cmp(&b.text),
    });
    if options.high_to_low {
        records.reverse();
    }

    let mut reordered: Vec<Row> = Vec::with_capacity(rows.len());
    reordered.extend(rows[..default_row_idx].iter().cloned());
    reordered.extend(records.iter().map(|rec| rows[rec.index].clone()));
    reordered.extend(rows[limit..].iter().cloned());
    *rows = reordered;
    Ok(())
}

/// New row `i` = old column `i`. Input must be rectangular.
pub fn transpose_rows(rows: &[Row]) -> Vec<Row> {
    let width = rows.first().map_or(0, Vec::len);
    (0..width)
        .map(|c| rows.iter().map(|row| row[c].clone()).collect())
        .collect()
}

/// Insert a leading numbering cell into every row.
pub fn add_numbering(options: &NumberingOptions, rows: &mut [Row], default_row_idx: usize) {
    for (idx, row) in rows.iter_mut().enumerate() {
        let cell = if default_row_idx > 0 && idx == default_row_idx - 1 {
            Cell::text(&options.label)
        } else {
            let n = options.start_number + (idx as i64 - default_row_idx as i64) * options.step;
            Cell::text(&options.text_format.replace("{num}", &n.to_string()))
        };
        row.insert(0, cell);
    }
}

/// Color the extremal cell(s) of each row or column.
///
/// Every other non-empty evaluated cell is reset to the default color, so
/// re-running after a value change clears stale highlights.
pub fn apply_color(
    options: &ColorOptions,
    default_row_idx: usize,
    default_col_idx: usize,
    rows: &mut [Row],
    limit_row: usize,
    limit_col: usize,
) -> Result<()> {
    if options.max.is_none() && options.min.is_none() {
        return Ok(());
    }
    let headers = HeaderCells::of(rows);
    let matrix = build_matrix(
        options.direction,
        rows,
        default_row_idx,
        default_col_idx,
        limit_row,
        limit_col,
    );
    let valid = valid_indices(rows, &options.filter, options.direction, &headers)?;

    for lane in &matrix {
        let Some(first) = lane.first() else {
            continue;
        };
        let lane_ok = match options.direction {
            Direction::Row => valid.rows.contains(&first.row),
            Direction::Column => valid.cols.contains(&first.col),
        };
        if !lane_ok {
            continue;
        }
        let cells: Vec<&CellSlot> = lane
            .iter()
            .filter(|slot| match options.direction {
                Direction::Row => valid.cols.contains(&slot.col),
                Direction::Column => valid.rows.contains(&slot.row),
            })
            .collect();

        let mut values = Vec::with_capacity(cells.len());
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for slot in &cells {
            let v = parse_number(&slot.text)?;
            lo = lo.min(v);
            hi = hi.max(v);
            values.push(v);
        }
        for (slot, value) in cells.iter().zip(&values) {
            let cell = &mut rows[slot.row][slot.col];
            if cell.is_empty() {
                continue;
            }
            let color = match (options.max, options.min) {
                (Some(c), _) if *value == hi => c,
                (_, Some(c)) if *value == lo => c,
                _ => Color::Default,
            };
            cell.set_color(color);
        }
    }
    Ok(())
}

/// Append one result row or column per formula call, then pad to the new
/// width.
pub fn add_formula_rows(
    calls: &[FormulaCall],
    default_row_idx: usize,
    default_col_idx: usize,
    rows: &mut Vec<Row>,
    limit_row: usize,
    limit_col: usize,
) -> Result<()> {
    for call in calls {
        if call.statistic.is_name_series() {
            let has_axis = match call.append.statistic_direction() {
                Direction::Row => default_row_idx > 0,
                Direction::Column => default_col_idx > 0,
            };
            if !has_axis {
                return Err(TableError::MissingLabelAxis {
                    statistic: call.statistic,
                });
            }
        }
    }

    // Both matrices cover the table before any result is appended, so the
    // calls of one batch all aggregate the original cells.
    let mat_by_row = build_matrix(
        Direction::Row,
        rows,
        default_row_idx,
        default_col_idx,
        limit_row,
        limit_col,
    );
    let mat_by_col = build_matrix(
        Direction::Column,
        rows,
        default_row_idx,
        default_col_idx,
        limit_row,
        limit_col,
    );
    let headers = HeaderCells::of(rows);

    for call in calls {
        let direction = call.append.statistic_direction();
        let label = call
            .label
            .clone()
            .unwrap_or_else(|| call.statistic.default_label().to_string());
        let valid = valid_indices(rows, &call.filter, direction, &headers)?;

        let mut result_positions: Vec<(usize, usize)> = Vec::new();
        match direction {
            Direction::Row => {
                for lane in &mat_by_row {
                    let Some(first) = lane.first() else {
                        continue;
                    };
                    if !valid.rows.contains(&first.row) {
                        continue;
                    }
                    let slots: Vec<CellSlot> = lane
                        .iter()
                        .filter(|slot| valid.cols.contains(&slot.col))
                        .cloned()
                        .collect();
                    let result = evaluate(Direction::Row, call.statistic, &slots, &headers)?;
                    rows[first.row].push(result);
                    result_positions.push((first.row, rows[first.row].len() - 1));
                }
                if default_row_idx > 0 {
                    rows[0].push(Cell::text(&label));
                }
            }
            Direction::Column => {
                let mut results: Vec<Cell> = Vec::new();
                for lane in &mat_by_col {
                    let Some(first) = lane.first() else {
                        continue;
                    };
                    if valid.cols.contains(&first.col) {
                        let slots: Vec<CellSlot> = lane
                            .iter()
                            .filter(|slot| valid.rows.contains(&slot.row))
                            .cloned()
                            .collect();
                        results.push(evaluate(Direction::Column, call.statistic, &slots, &headers)?);
                    } else {
                        results.push(Cell::empty());
                    }
                }
                let mut new_row: Row = Vec::new();
                if default_col_idx > 0 {
                    new_row.push(Cell::text(&label));
                    new_row.extend(std::iter::repeat_with(Cell::empty).take(default_col_idx - 1));
                }
                let lead = new_row.len();
                new_row.extend(results);
                rows.push(new_row);
                let r = rows.len() - 1;
                result_positions.extend((lead..rows[r].len()).map(|c| (r, c)));
            }
        }

        if call.max.is_some() || call.min.is_some() {
            color_results(rows, &result_positions, call.max, call.min);
        }
    }
    pad_rows(rows);
    Ok(())
}

/// Color the extremal result cells of one formula call. Cells whose text
/// is empty or non-numeric (NAME-series labels) are skipped.
fn color_results(
    rows: &mut [Row],
    positions: &[(usize, usize)],
    max: Option<Color>,
    min: Option<Color>,
) {
    let mut scored: Vec<((usize, usize), f64)> = Vec::new();
    for &(r, c) in positions {
        let cell = &rows[r][c];
        if cell.is_empty() {
            continue;
        }
        if let Ok(v) = parse_number(&cell.plain_text()) {
            scored.push(((r, c), v));
        }
    }
    if scored.is_empty() {
        return;
    }
    let hi = scored.iter().map(|(_, v)| *v).fold(f64::NEG_INFINITY, f64::max);
    let lo = scored.iter().map(|(_, v)| *v).fold(f64::INFINITY, f64::min);
    for ((r, c), v) in scored {
        if let Some(color) = max {
            if v == hi {
                rows[r][c].set_color(color);
            }
        }
        if let Some(color) = min {
            if v == lo {
                rows[r][c].set_color(color);
            }
        }
    }
}

/// Partition rows into groups. The header row, when present, opens every
/// group.
pub fn split_rows(
    rows: &[Row],
    method: &SplitMethod,
    default_row_idx: usize,
) -> Result<Vec<Vec<Row>>> {
    let is_cut: Vec<bool> = match method {
        SplitMethod::ByNumber { number } => {
            if *number == 0 {
                return Err(TableError::NoCutPoint);
            }
            (0..rows.len())
                .map(|i| {
                    let data_pos = i as i64 - default_row_idx as i64;
                    data_pos > 0 && (data_pos as usize) % number == 0
                })
                .collect()
        }
        SplitMethod::ByBlank => rows
            .iter()
            .map(|row| row.iter().all(Cell::is_empty))
            .collect(),
        SplitMethod::ByLabels { row_labels } => rows
            .iter()
            .map(|row| {
                let label = row.first().map(Cell::plain_text).unwrap_or_default();
                row_labels.iter().any(|lb| *lb == label)
            })
            .collect(),
    };
    if !is_cut[default_row_idx..].iter().any(|&cut| cut) {
        return Err(TableError::NoCutPoint);
    }

    let header: Option<Row> = (default_row_idx != 0).then(|| rows[0].clone());
    let new_group = |header: &Option<Row>| match header {
        Some(h) => vec![h.clone()],
        None => Vec::new(),
    };
    let mut groups: Vec<Vec<Row>> = vec![new_group(&header)];
    for (i, row) in rows.iter().enumerate().skip(default_row_idx) {
        if is_cut[i] {
            let mut group = new_group(&header);
            // A blank cut row is consumed; any other cut row opens its group.
            if !matches!(method, SplitMethod::ByBlank) {
                group.push(row.clone());
            }
            groups.push(group);
        } else if let Some(last) = groups.last_mut() {
            last.push(row.clone());
        }
    }
    Ok(groups)
}

/// Concatenate tables, aligning columns by header label when headers are
/// present.
pub fn join_tables(tables: &[Table]) -> Result<Table> {
    let Some(first) = tables.first() else {
        return Err(TableError::EmptyTable);
    };
    if tables.iter().all(|t| !t.has_column_header) {
        let rows: Vec<Row> = tables.iter().flat_map(|t| t.rows.iter().cloned()).collect();
        return Table::from_ragged(rows, false, first.has_row_header);
    }
    if !first.has_column_header {
        return Err(TableError::JoinHeaderMismatch);
    }

    // Ordered label -> header-cell records; a headerless table inherits the
    // record of the nearest table above it.
    type LabelRecord = Vec<(String, Cell)>;
    let lookup = |rec: &[(String, Cell)], label: &str| {
        rec.iter()
            .find(|(lb, _)| lb == label)
            .map(|(_, cell)| cell.clone())
    };

    let mut label_records: Vec<LabelRecord> = Vec::new();
    let mut row_records: Vec<LabelRecord> = Vec::new();
    for table in tables {
        let (labels, body): (LabelRecord, &[Row]) = if table.has_column_header {
            let rec: LabelRecord = table.rows[0]
                .iter()
                .map(|cell| (cell.plain_text(), cell.clone()))
                .collect();
            label_records.push(rec.clone());
            (rec, &table.rows[1..])
        } else {
            (label_records.last().cloned().unwrap_or_default(), &table.rows[..])
        };
        for row in body {
            let rec: LabelRecord = labels
                .iter()
                .map(|(lb, _)| lb.clone())
                .zip(row.iter().cloned())
                .collect();
            row_records.push(rec);
        }
    }

    let mut unique_labels: Vec<String> = Vec::new();
    for rec in &label_records {
        for (label, _) in rec {
            if !unique_labels.contains(label) {
                unique_labels.push(label.clone());
            }
        }
    }

    let header_row: Row = if unique_labels.len() == first.width {
        unique_labels
            .iter()
            .map(|lb| lookup(&label_records[0], lb).unwrap_or_default())
            .collect()
    } else {
        // Labels disagree across tables: merge their header records, the
        // later table winning for a shared label.
        let mut merged: LabelRecord = Vec::new();
        for rec in &label_records {
            for (label, cell) in rec {
                if let Some(slot) = merged.iter_mut().find(|(lb, _)| lb == label) {
                    slot.1 = cell.clone();
                } else {
                    merged.push((label.clone(), cell.clone()));
                }
            }
        }
        unique_labels
            .iter()
            .map(|lb| lookup(&merged, lb).unwrap_or_default())
            .collect()
    };

    let mut rows = vec![header_row];
    rows.extend(row_records.iter().map(|rec| {
        unique_labels
            .iter()
            .map(|lb| lookup(rec, lb).unwrap_or_default())
            .collect::<Row>()
    }));
    Table::from_ragged(rows, true, first.has_row_header)
}

impl Table {
    /// Sort data rows by one column's values.
    pub fn sort(mut self, options: &SortOptions) -> Result<Table> {
        let offset = self.default_row_idx();
        let limit = self.rows.len();
        sort_rows(options, offset, &mut self.rows, limit)?;
        Ok(self)
    }

    /// Swap rows and columns, header flags included.
    pub fn transpose(self) -> Table {
        let height = self.rows.len();
        Table {
            rows: transpose_rows(&self.rows),
            width: height,
            has_column_header: self.has_row_header,
            has_row_header: self.has_column_header,
        }
    }

    /// Prepend a numbering column. It joins the label region, so later
    /// operations skip it.
    pub fn number(mut self, options: &NumberingOptions) -> Table {
        let offset = self.default_row_idx();
        add_numbering(options, &mut self.rows, offset);
        self.width += 1;
        self.has_row_header = true;
        self
    }

    /// Color max/min cells per row or column.
    pub fn color(mut self, options: &ColorOptions) -> Result<Table> {
        let (row_offset, col_offset) = (self.default_row_idx(), self.default_col_idx());
        let (limit_row, limit_col) = (self.rows.len(), self.width);
        apply_color(
            options,
            row_offset,
            col_offset,
            &mut self.rows,
            limit_row,
            limit_col,
        )?;
        Ok(self)
    }

    /// Append aggregate result rows/columns.
    pub fn add_formulas(mut self, calls: &[FormulaCall]) -> Result<Table> {
        let (row_offset, col_offset) = (self.default_row_idx(), self.default_col_idx());
        let (limit_row, limit_col) = (self.rows.len(), self.width);
        add_formula_rows(
            calls,
            row_offset,
            col_offset,
            &mut self.rows,
            limit_row,
            limit_col,
        )?;
        self.width = self.rows.first().map_or(0, Vec::len);
        Ok(self)
    }

    /// Evaluate every `=`-prefixed cell formula in place.
    pub fn calculate_cells(mut self) -> Result<Table> {
        let (row_offset, col_offset) = (self.default_row_idx(), self.default_col_idx());
        evaluate_cell_formulas(row_offset, col_offset, &mut self.rows)?;
        Ok(self)
    }

    /// Partition into several tables sharing this table's header flags.
    /// Groups left without any row are dropped.
    pub fn split(&self, method: &SplitMethod) -> Result<Vec<Table>> {
        let groups = split_rows(&self.rows, method, self.default_row_idx())?;
        groups
            .into_iter()
            .filter(|group| !group.is_empty())
            .map(|group| Table::new(group, self.has_column_header, self.has_row_header))
            .collect()
    }

    /// Concatenate several tables into one.
    pub fn join(tables: &[Table]) -> Result<Table> {
        join_tables(tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(texts: &[&[&str]], col_header: bool, row_header: bool) -> Table {
        let rows = texts
            .iter()
            .map(|row| row.iter().map(|t| Cell::text(t)).collect())
            .collect();
        Table::new(rows, col_header, row_header).unwrap()
    }

    fn texts(table: &Table) -> Vec<Vec<String>> {
        table.plain_texts()
    }

    #[test]
    fn test_sort_descending_numeric() {
        let t = table(
            &[&["Name", "Score"], &["A", "3"], &["B", "9"], &["C", "5"]],
            true,
            false,
        );
        let sorted = t
            .sort(&SortOptions {
                label: "Score".to_string(),
                as_number: true,
                high_to_low: true,
            })
            .unwrap();
        let got: Vec<String> = texts(&sorted).iter().map(|r| r[0].clone()).collect();
        assert_eq!(got, vec!["Name", "B", "C", "A"]);
    }

    #[test]
    fn test_sort_is_idempotent() {
        let options = SortOptions {
            label: "Score".to_string(),
            as_number: true,
            high_to_low: true,
        };
        let t = table(
            &[&["Name", "Score"], &["A", "3"], &["B", "9"], &["C", "5"]],
            true,
            false,
        );
        let once = t.sort(&options).unwrap();
        let twice = once.clone().sort(&options).unwrap();
        assert_eq!(texts(&once), texts(&twice));
    }

    #[test]
    fn test_sort_lexicographic() {
        let t = table(
            &[&["Name", "Tag"], &["A", "b"], &["B", "a"], &["C", "c"]],
            true,
            false,
        );
        let sorted = t
            .sort(&SortOptions {
                label: "Tag".to_string(),
                as_number: false,
                high_to_low: false,
            })
            .unwrap();
        let got: Vec<String> = texts(&sorted).iter().map(|r| r[0].clone()).collect();
        assert_eq!(got, vec!["Name", "B", "A", "C"]);
    }

    #[test]
    fn test_sort_unknown_label_fails() {
        let t = table(&[&["Name"], &["A"]], true, false);
        let err = t.sort(&SortOptions {
            label: "Missing".to_string(),
            as_number: true,
            high_to_low: true,
        });
        assert!(matches!(err, Err(TableError::LabelNotFound(_))));
    }

    #[test]
    fn test_transpose_is_an_involution() {
        let t = table(&[&["", "a", "b"], &["x", "1", "2"]], true, true);
        let back = t.clone().transpose().transpose();
        assert_eq!(texts(&t), texts(&back));
        assert_eq!(back.has_column_header, t.has_column_header);
        assert_eq!(back.has_row_header, t.has_row_header);
    }

    #[test]
    fn test_transpose_swaps_header_flags() {
        let t = table(&[&["h1", "h2"], &["1", "2"]], true, false);
        let flipped = t.transpose();
        assert!(!flipped.has_column_header);
        assert!(flipped.has_row_header);
        assert_eq!(texts(&flipped), vec![vec!["h1", "1"], vec!["h2", "2"]]);
    }

    #[test]
    fn test_numbering_monotonicity() {
        let t = table(&[&["Name"], &["A"], &["B"], &["C"]], true, false);
        let numbered = t.number(&NumberingOptions {
            start_number: 5,
            step: 2,
            ..NumberingOptions::default()
        });
        let got = texts(&numbered);
        assert_eq!(got[0][0], "");
        assert_eq!(got[1][0], "5");
        assert_eq!(got[2][0], "7");
        assert_eq!(got[3][0], "9");
        assert_eq!(numbered.width(), 2);
    }

    #[test]
    fn test_numbering_text_format() {
        let t = table(&[&["A"], &["B"]], false, false);
        let numbered = t.number(&NumberingOptions {
            text_format: "#{num}.".to_string(),
            ..NumberingOptions::default()
        });
        assert_eq!(texts(&numbered)[0][0], "#1.");
        assert_eq!(texts(&numbered)[1][0], "#2.");
    }

    #[test]
    fn test_color_max_min_with_ties() {
        let t = table(
            &[&["v"], &["3"], &["7"], &["7"], &["1"]],
            true,
            false,
        );
        let colored = t
            .color(&ColorOptions {
                direction: Direction::Column,
                filter: TargetFilter::default(),
                max: Some(Color::Red),
                min: Some(Color::Blue),
            })
            .unwrap();
        let color_of = |r: usize| colored.rows()[r][0].spans[0].annotations.color;
        assert_eq!(color_of(1), Color::Default);
        assert_eq!(color_of(2), Color::Red);
        assert_eq!(color_of(3), Color::Red);
        assert_eq!(color_of(4), Color::Blue);
    }

    #[test]
    fn test_color_without_colors_is_a_no_op() {
        let t = table(&[&["1"], &["2"]], false, false);
        let colored = t
            .clone()
            .color(&ColorOptions {
                direction: Direction::Column,
                filter: TargetFilter::default(),
                max: None,
                min: None,
            })
            .unwrap();
        assert_eq!(t, colored);
    }

    #[test]
    fn test_new_column_aggregates_each_row() {
        // Direction inversion: appending a column means row-wise sums.
        let t = table(
            &[&["Name", "a", "b"], &["x", "1", "2"], &["y", "3", "4"]],
            true,
            true,
        );
        let summed = t
            .add_formulas(&[FormulaCall {
                append: Append::NewColumn,
                statistic: Statistic::Sum,
                label: None,
                filter: TargetFilter::default(),
                max: None,
                min: None,
            }])
            .unwrap();
        let got = texts(&summed);
        assert_eq!(got[0][3], "Sum");
        assert_eq!(got[1][3], "3");
        assert_eq!(got[2][3], "7");
    }

    #[test]
    fn test_unlabeled_calls_get_friendly_default_labels() {
        let t = table(
            &[&["Name", "a", "b"], &["x", "1", "2"], &["y", "3", "4"]],
            true,
            true,
        );
        let call = |statistic| FormulaCall {
            append: Append::NewColumn,
            statistic,
            label: None,
            filter: TargetFilter::default(),
            max: None,
            min: None,
        };
        let out = t
            .add_formulas(&[call(Statistic::SecondMax), call(Statistic::MaxName)])
            .unwrap();
        let got = texts(&out);
        assert_eq!(got[0][3], "2nd Max");
        assert_eq!(got[0][4], "Max(name)");
    }

    #[test]
    fn test_new_row_aggregates_each_column() {
        let t = table(
            &[&["Name", "a", "b"], &["x", "1", "2"], &["y", "3", "4"]],
            true,
            true,
        );
        let summed = t
            .add_formulas(&[FormulaCall {
                append: Append::NewRow,
                statistic: Statistic::Sum,
                label: Some("Total".to_string()),
                filter: TargetFilter::default(),
                max: None,
                min: None,
            }])
            .unwrap();
        let got = texts(&summed);
        let last = got.last().unwrap();
        assert_eq!(last, &vec!["Total", "4", "6"]);
    }

    #[test]
    fn test_formula_results_can_be_colored() {
        let t = table(
            &[&["Name", "a", "b"], &["x", "1", "2"], &["y", "3", "4"]],
            true,
            true,
        );
        let summed = t
            .add_formulas(&[FormulaCall {
                append: Append::NewColumn,
                statistic: Statistic::Sum,
                label: None,
                filter: TargetFilter::default(),
                max: Some(Color::Green),
                min: None,
            }])
            .unwrap();
        // Row sums are 3 and 7; the 7 cell gets the max color.
        assert_eq!(
            summed.rows()[2][3].spans[0].annotations.color,
            Color::Green
        );
        assert_eq!(
            summed.rows()[1][3].spans[0].annotations.color,
            Color::Default
        );
    }

    #[test]
    fn test_name_series_needs_label_axis() {
        let t = table(&[&["1", "2"], &["3", "4"]], false, false);
        let err = t.add_formulas(&[FormulaCall {
            append: Append::NewRow,
            statistic: Statistic::MaxName,
            label: None,
            filter: TargetFilter::default(),
            max: None,
            min: None,
        }]);
        assert!(matches!(err, Err(TableError::MissingLabelAxis { .. })));
    }

    #[test]
    fn test_split_by_blank_round_trip() {
        let t = table(
            &[
                &["Name", "v"],
                &["a", "1"],
                &["b", "2"],
                &["", ""],
                &["c", "3"],
                &["d", "4"],
            ],
            true,
            false,
        );
        let parts = t.split(&SplitMethod::ByBlank).unwrap();
        assert_eq!(parts.len(), 2);
        for part in &parts {
            assert_eq!(part.row_count(), 3);
            assert_eq!(texts(part)[0], vec!["Name", "v"]);
        }
        assert_eq!(texts(&parts[1])[1], vec!["c", "3"]);
    }

    #[test]
    fn test_split_by_number() {
        let t = table(
            &[&["h"], &["a"], &["b"], &["c"], &["d"]],
            true,
            false,
        );
        let parts = t.split(&SplitMethod::ByNumber { number: 2 }).unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(texts(&parts[0]), vec![vec!["h"], vec!["a"], vec!["b"]]);
        assert_eq!(texts(&parts[1]), vec![vec!["h"], vec!["c"], vec!["d"]]);
    }

    #[test]
    fn test_split_by_labels_keeps_cut_row() {
        let t = table(
            &[&["h"], &["a"], &["b"], &["c"]],
            true,
            false,
        );
        let parts = t
            .split(&SplitMethod::ByLabels {
                row_labels: vec!["b".to_string()],
            })
            .unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(texts(&parts[1]), vec![vec!["h"], vec!["b"], vec!["c"]]);
    }

    #[test]
    fn test_split_without_boundary_fails() {
        let t = table(&[&["h"], &["a"]], true, false);
        let err = t.split(&SplitMethod::ByBlank);
        assert!(matches!(err, Err(TableError::NoCutPoint)));
    }

    #[test]
    fn test_join_label_union() {
        let a = table(&[&["a", "b"], &["1", "2"]], true, false);
        let b = table(&[&["b", "c"], &["3", "4"]], true, false);
        let joined = Table::join(&[a, b]).unwrap();
        let got = texts(&joined);
        assert_eq!(got[0], vec!["a", "b", "c"]);
        assert_eq!(got[1], vec!["1", "2", ""]);
        assert_eq!(got[2], vec!["", "3", "4"]);
        assert_eq!(joined.width(), 3);
    }

    #[test]
    fn test_join_headerless_tables_concatenate() {
        let a = table(&[&["1", "2"]], false, false);
        let b = table(&[&["3", "4"]], false, false);
        let joined = Table::join(&[a, b]).unwrap();
        assert_eq!(texts(&joined), vec![vec!["1", "2"], vec!["3", "4"]]);
        assert!(!joined.has_column_header);
    }

    #[test]
    fn test_join_headerless_follows_table_above() {
        let a = table(&[&["a", "b"], &["1", "2"]], true, false);
        let b = table(&[&["3", "4"]], false, false);
        let joined = Table::join(&[a, b]).unwrap();
        let got = texts(&joined);
        assert_eq!(got[0], vec!["a", "b"]);
        assert_eq!(got[2], vec!["3", "4"]);
    }

    #[test]
    fn test_join_requires_header_on_first_table() {
        let a = table(&[&["1", "2"]], false, false);
        let b = table(&[&["a", "b"], &["3", "4"]], true, false);
        let err = Table::join(&[a, b]);
        assert!(matches!(err, Err(TableError::JoinHeaderMismatch)));
    }
}
