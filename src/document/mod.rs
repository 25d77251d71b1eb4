//! Generic document model.
//!
//! The model is the output side of every reader: sections holding an ordered
//! sequence of elements. Readers only ever append to it (`add_section`,
//! `Section::add_text_run`); nothing in the pipeline reads it back, and it is
//! never cached between load calls.

mod element;

pub use element::{DocumentElement, Paragraph, TextRun};

/// Font style attached to a text run.
///
/// Sizes are stored as half-point integers, the unit the binary formats use
/// on disk (stored 39 = 19.5pt). A stored value of 0 means "unspecified" and
/// never becomes a `FontStyle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FontStyle {
    size_half_points: u16,
    bold: bool,
    italic: bool,
}

impl FontStyle {
    /// Create a style from a half-point size and flag pair.
    ///
    /// Returns `None` for an all-default style (size 0, no flags), so callers
    /// can attach `Option<FontStyle>` directly.
    pub fn from_half_points(size_half_points: u16, bold: bool, italic: bool) -> Option<Self> {
        if size_half_points == 0 && !bold && !italic {
            return None;
        }
        Some(Self {
            size_half_points,
            bold,
            italic,
        })
    }

    /// Font size in points, at half-point granularity (e.g. 19.5).
    ///
    /// Returns 0.0 when the size is unspecified but the style carries other
    /// attributes; see [`FontStyle::size_half_points`] to distinguish.
    pub fn size(&self) -> f64 {
        f64::from(self.size_half_points) / 2.0
    }

    /// Raw stored size in half-points (0 = unspecified).
    pub fn size_half_points(&self) -> u16 {
        self.size_half_points
    }

    /// Whether the run is bold.
    pub fn bold(&self) -> bool {
        self.bold
    }

    /// Whether the run is italic.
    pub fn italic(&self) -> bool {
        self.italic
    }
}

/// An ordered run of elements under one section.
#[derive(Debug, Clone, Default)]
pub struct Section {
    elements: Vec<DocumentElement>,
}

impl Section {
    /// Create an empty section.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a plain text element with no font style.
    pub fn add_text(&mut self, text: impl Into<String>) {
        self.elements
            .push(DocumentElement::Text(TextRun::new(text.into(), None)));
    }

    /// Append a styled text element.
    pub fn add_text_run(&mut self, run: TextRun) {
        self.elements.push(DocumentElement::Text(run));
    }

    /// Append any element.
    pub fn add_element(&mut self, element: DocumentElement) {
        self.elements.push(element);
    }

    /// Elements in document order.
    pub fn elements(&self) -> &[DocumentElement] {
        &self.elements
    }
}

/// A loaded document: one or more sections.
///
/// A loaded document always exposes at least one section, even when the
/// source yielded no text at all.
#[derive(Debug, Clone, Default)]
pub struct Document {
    sections: Vec<Section>,
}

impl Document {
    /// Create a document with no sections.
    ///
    /// Readers must add at least one section before publishing the model;
    /// [`crate::wps::assemble`] guarantees this for the binary pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new empty section and return a mutable handle to it.
    pub fn add_section(&mut self) -> &mut Section {
        self.sections.push(Section::new());
        self.sections
            .last_mut()
            .unwrap_or_else(|| unreachable!("section was just pushed"))
    }

    /// Sections in document order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// All text content concatenated in document order.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for section in &self.sections {
            for element in section.elements() {
                match element {
                    DocumentElement::Text(run) => out.push_str(run.text()),
                    DocumentElement::Paragraph(para) => {
                        for run in para.runs() {
                            out.push_str(run.text());
                        }
                    }
                    DocumentElement::Other => {}
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_style_half_points() {
        let style = FontStyle::from_half_points(39, false, false).unwrap();
        assert_eq!(style.size(), 19.5);
        let style = FontStyle::from_half_points(24, false, false).unwrap();
        assert_eq!(style.size(), 12.0);
    }

    #[test]
    fn test_font_style_zero_size_is_unspecified() {
        assert!(FontStyle::from_half_points(0, false, false).is_none());
        // Flags alone still produce a style
        let style = FontStyle::from_half_points(0, true, false).unwrap();
        assert!(style.bold());
        assert_eq!(style.size_half_points(), 0);
    }

    #[test]
    fn test_document_text_concatenation() {
        let mut doc = Document::new();
        let section = doc.add_section();
        section.add_text("Hello ");
        section.add_text_run(TextRun::new(
            "world".to_string(),
            FontStyle::from_half_points(20, true, false),
        ));
        assert_eq!(doc.text(), "Hello world");
    }
}
