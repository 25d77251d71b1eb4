//! Document element types for representing ordered content.

use super::FontStyle;

/// A single styled run of text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    text: String,
    font_style: Option<FontStyle>,
}

impl TextRun {
    /// Create a text run with an optional font style.
    pub fn new(text: String, font_style: Option<FontStyle>) -> Self {
        Self { text, font_style }
    }

    /// The run's text content.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The run's font style, if any attribute was specified.
    pub fn font_style(&self) -> Option<&FontStyle> {
        self.font_style.as_ref()
    }
}

/// A paragraph: an ordered group of text runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    runs: Vec<TextRun>,
}

impl Paragraph {
    /// Create an empty paragraph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a run to the paragraph.
    pub fn add_run(&mut self, run: TextRun) {
        self.runs.push(run);
    }

    /// Runs in paragraph order.
    pub fn runs(&self) -> &[TextRun] {
        &self.runs
    }
}

/// A document element.
///
/// This is a closed set: consumers match exhaustively instead of probing
/// elements for capabilities at runtime. Elements with no text-bearing
/// content are represented by [`DocumentElement::Other`].
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentElement {
    /// A styled text run
    Text(TextRun),
    /// A paragraph of runs
    Paragraph(Paragraph),
    /// Content this reader does not interpret
    Other,
}

impl DocumentElement {
    /// Check if this element is a text run.
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self, DocumentElement::Text(_))
    }

    /// Get a reference to the text run, if this is a text element.
    #[inline]
    pub fn as_text(&self) -> Option<&TextRun> {
        match self {
            DocumentElement::Text(run) => Some(run),
            _ => None,
        }
    }

    /// Get a reference to the paragraph, if this is a paragraph element.
    #[inline]
    pub fn as_paragraph(&self) -> Option<&Paragraph> {
        match self {
            DocumentElement::Paragraph(para) => Some(para),
            _ => None,
        }
    }
}
