//! Storage adapters: text lines, CSV and JSON in, CSV and text out.

pub mod csv;
pub mod json;
pub mod text;

pub use csv::{parse_csv, write_csv};
pub use json::import_json;
pub use text::{from_lines, to_aligned_string, to_lines, TextImportOptions};
