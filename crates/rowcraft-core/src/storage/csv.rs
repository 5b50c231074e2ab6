//! CSV import/export.

use rowcraft_engine::engine::Cell;

use crate::error::Result;
use crate::table::Table;

/// Parse CSV text into a table. Short rows are padded to the widest row.
pub fn parse_csv(content: &str, has_column_header: bool, has_row_header: bool) -> Result<Table> {
    let texts: Vec<Vec<String>> = content
        .lines()
        .filter(|line| !line.is_empty())
        .map(parse_csv_line)
        .collect();
    Table::from_texts(&texts, has_column_header, has_row_header)
}

/// Parse a single CSV line, handling quoted fields.
pub(crate) fn parse_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut field_was_quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                // Check for escaped quote
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(c);
            }
        } else {
            match c {
                '"' => {
                    in_quotes = true;
                    field_was_quoted = true;
                }
                ',' => {
                    if field_was_quoted {
                        fields.push(current.clone());
                    } else {
                        fields.push(current.trim().to_string());
                    }
                    current = String::new();
                    field_was_quoted = false;
                }
                _ => current.push(c),
            }
        }
    }
    if field_was_quoted {
        fields.push(current);
    } else {
        fields.push(current.trim().to_string());
    }
    fields
}

/// Serialize the table's plain texts as CSV.
pub fn write_csv(table: &Table) -> String {
    let mut out = String::new();
    for row in table.rows() {
        let line: Vec<String> = row.iter().map(Cell::plain_text).map(quote_field).collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }
    out
}

fn quote_field(field: String) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_basic() {
        let table = parse_csv("a,b\n1,2\n", true, false).unwrap();
        assert_eq!(table.width(), 2);
        assert!(table.has_column_header);
        assert_eq!(table.plain_texts()[1], vec!["1", "2"]);
    }

    #[test]
    fn test_parse_csv_line_quoted_fields() {
        assert_eq!(
            parse_csv_line(r#"a,"b,c",d"#),
            vec!["a".to_string(), "b,c".to_string(), "d".to_string()]
        );
        assert_eq!(
            parse_csv_line(r#""say ""hi""",x"#),
            vec!["say \"hi\"".to_string(), "x".to_string()]
        );
    }

    #[test]
    fn test_parse_csv_line_trims_unquoted() {
        assert_eq!(
            parse_csv_line(" a , b "),
            vec!["a".to_string(), "b".to_string()]
        );
        assert_eq!(parse_csv_line(r#"" a ""#), vec![" a ".to_string()]);
    }

    #[test]
    fn test_parse_csv_pads_short_rows() {
        let table = parse_csv("a,b,c\n1\n", false, false).unwrap();
        assert_eq!(table.width(), 3);
        assert!(table.rows()[1][2].is_empty());
    }

    #[test]
    fn test_write_csv_quotes_when_needed() {
        let table = parse_csv("a,\"b,c\"\n1,2\n", false, false).unwrap();
        assert_eq!(write_csv(&table), "a,\"b,c\"\n1,2\n");
    }
}
