//! Text-line import/export and plain rendering.

use crate::error::Result;
use crate::table::Table;

/// How flat text lines become a table.
#[derive(Clone, Debug)]
pub struct TextImportOptions {
    /// Separator between cells within one line.
    pub cell_separator: String,
    /// If set, each cell text is split into `label<sep>value` and the
    /// labels synthesize a header row.
    pub label_separator: Option<String>,
}

/// Build a table from flat text lines.
///
/// Without a label separator, each line becomes one row and its first cell
/// is treated as a row label. With one, cells are `label<sep>value` pairs:
/// the first-seen label order forms a header row, and each line's values
/// land under their labels, missing labels filling with empty cells.
pub fn from_lines(lines: &[String], options: &TextImportOptions) -> Result<Table> {
    let Some(label_sep) = &options.label_separator else {
        let texts: Vec<Vec<String>> = lines
            .iter()
            .map(|line| {
                line.split(options.cell_separator.as_str())
                    .map(str::to_string)
                    .collect()
            })
            .collect();
        return Table::from_texts(&texts, true, true);
    };

    let records: Vec<Vec<(String, String)>> = lines
        .iter()
        .map(|line| {
            line.split(options.cell_separator.as_str())
                .map(|item| match item.split_once(label_sep.as_str()) {
                    Some((label, value)) => (label.to_string(), value.to_string()),
                    None => (String::new(), item.to_string()),
                })
                .collect()
        })
        .collect();

    let mut labels: Vec<String> = Vec::new();
    for record in &records {
        for (label, _) in record {
            if !labels.contains(label) {
                labels.push(label.clone());
            }
        }
    }
    let mut texts: Vec<Vec<String>> = vec![labels.clone()];
    for record in &records {
        texts.push(
            labels
                .iter()
                .map(|lb| {
                    record
                        .iter()
                        .find(|(label, _)| label == lb)
                        .map(|(_, value)| value.clone())
                        .unwrap_or_default()
                })
                .collect(),
        );
    }
    Table::from_texts(&texts, true, false)
}

/// One line of joined plain texts per row.
pub fn to_lines(table: &Table, cell_separator: &str) -> Vec<String> {
    table
        .plain_texts()
        .iter()
        .map(|row| row.join(cell_separator))
        .collect()
}

/// Render the table as a column-aligned text block.
pub fn to_aligned_string(table: &Table) -> String {
    let texts = table.plain_texts();
    let mut widths = vec![0usize; table.width()];
    for row in &texts {
        for (i, text) in row.iter().enumerate() {
            widths[i] = widths[i].max(text.chars().count());
        }
    }
    let mut out = String::new();
    for row in &texts {
        let line: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, text)| format!("{:<width$}", text, width = widths[i]))
            .collect();
        out.push_str(line.join(" | ").trim_end());
        out.push('\n');
    }
    out
}
