//! Document assembler.
//!
//! Converts the extractor's decoded runs into the generic document model.
//! Consecutive runs with identical style collapse into one text element; the
//! result always contains exactly one section, even for an empty run list,
//! matching the contract that a loaded document exposes at least one
//! section.

use crate::document::{Document, TextRun};

use super::extract::{DecodedRun, RunStyle};

/// Assemble decoded runs into a fresh document model.
pub fn assemble(runs: Vec<DecodedRun>) -> Document {
    let mut doc = Document::new();
    let section = doc.add_section();

    let mut pending: Option<(RunStyle, String)> = None;
    for run in runs {
        match &mut pending {
            Some((style, text)) if *style == run.style => text.push_str(&run.text),
            _ => {
                if let Some((style, text)) = pending.take() {
                    section.add_text_run(TextRun::new(text, style.font_style()));
                }
                pending = Some((run.style, run.text));
            }
        }
    }
    if let Some((style, text)) = pending {
        section.add_text_run(TextRun::new(text, style.font_style()));
    }

    doc
}
