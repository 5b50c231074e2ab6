//! Rich-text cell data structures.
//!
//! A cell is a sequence of styled text spans; a blank cell is the empty
//! sequence and carries no style. The plain text of a cell is the
//! concatenation of its span texts.

use serde::{Deserialize, Serialize};

/// Text colors available to span annotations.
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    #[default]
    Default,
    Gray,
    Brown,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Pink,
    Red,
}

/// Styling of a single span.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub code: bool,
    pub color: Color,
}

/// The kind of content a span holds.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanKind {
    Text,
    Equation,
}

/// One styled run of text within a cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextSpan {
    pub kind: SpanKind,
    pub text: String,
    pub href: Option<String>,
    pub annotations: Annotations,
}

impl TextSpan {
    /// A plain text span with default styling.
    pub fn text(content: &str) -> TextSpan {
        TextSpan {
            kind: SpanKind::Text,
            text: content.to_string(),
            href: None,
            annotations: Annotations::default(),
        }
    }

    /// An equation span with default styling.
    pub fn equation(expression: &str) -> TextSpan {
        TextSpan {
            kind: SpanKind::Equation,
            text: expression.to_string(),
            href: None,
            annotations: Annotations::default(),
        }
    }
}

/// A table cell: zero or more styled spans.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub spans: Vec<TextSpan>,
}

impl Cell {
    /// The blank cell.
    pub fn empty() -> Cell {
        Cell { spans: Vec::new() }
    }

    /// A single-span text cell. Empty input yields the blank cell.
    pub fn text(content: &str) -> Cell {
        if content.is_empty() {
            return Cell::empty();
        }
        Cell {
            spans: vec![TextSpan::text(content)],
        }
    }

    /// A single-span equation cell. Empty input yields the blank cell.
    pub fn equation(expression: &str) -> Cell {
        if expression.is_empty() {
            return Cell::empty();
        }
        Cell {
            spans: vec![TextSpan::equation(expression)],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Concatenation of span texts; the blank cell yields `""`.
    pub fn plain_text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    /// Set the color annotation on every span.
    pub fn set_color(&mut self, color: Color) {
        for span in &mut self.spans {
            span.annotations.color = color;
        }
    }
}

/// One table row.
pub type Row = Vec<Cell>;
