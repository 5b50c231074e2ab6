//! JSON import: an object of objects becomes a labeled table.

use serde_json::Value;

use crate::error::{Result, TableError};
use crate::table::Table;

/// Build a table from a JSON object whose values are objects.
///
/// Inner keys form the header row in first-seen order; each inner object
/// becomes one row, missing keys filling with empty cells. With
/// `key_as_cell`, the outer keys become a leading label column and the
/// table carries a row header.
pub fn import_json(content: &str, key_as_cell: bool) -> Result<Table> {
    let data: Value = serde_json::from_str(content)?;
    let Value::Object(entries) = data else {
        return Err(TableError::JsonShape);
    };

    let mut records: Vec<Vec<(String, String)>> = Vec::new();
    for (key, value) in &entries {
        let Value::Object(fields) = value else {
            return Err(TableError::JsonShape);
        };
        let mut record: Vec<(String, String)> = Vec::new();
        if key_as_cell {
            record.push((String::new(), key.clone()));
        }
        for (k, v) in fields {
            record.push((k.clone(), value_text(v)));
        }
        records.push(record);
    }

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
                        .map(|(_, text)| text.clone())
                        .unwrap_or_default()
                })
                .collect(),
        );
    }
    Table::from_texts(&texts, true, key_as_cell)
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_object_of_objects() {
        let src = r#"{"r1": {"a": 1, "b": "x"}, "r2": {"b": "y", "c": true}}"#;
        let table = import_json(src, false).unwrap();
        let got = table.plain_texts();
        assert_eq!(got[0], vec!["a", "b", "c"]);
        assert_eq!(got[1], vec!["1", "x", ""]);
        assert_eq!(got[2], vec!["", "y", "true"]);
        assert!(table.has_column_header);
        assert!(!table.has_row_header);
    }

    #[test]
    fn test_import_with_keys_as_cells() {
        let src = r#"{"r1": {"a": 1}}"#;
        let table = import_json(src, true).unwrap();
        let got = table.plain_texts();
        assert_eq!(got[0], vec!["", "a"]);
        assert_eq!(got[1], vec!["r1", "1"]);
        assert!(table.has_row_header);
    }

    #[test]
    fn test_non_object_input_fails() {
        assert!(matches!(
            import_json("[1,2,3]", false),
            Err(TableError::JsonShape)
        ));
        assert!(matches!(
            import_json(r#"{"a": 1}"#, false),
            Err(TableError::JsonShape)
        ));
    }

    #[test]
    fn test_null_becomes_empty_cell() {
        let src = r#"{"r": {"a": null}}"#;
        let table = import_json(src, false).unwrap();
        assert!(table.rows()[1][0].is_empty());
    }
}
