//! Text and style extractor.
//!
//! Walks the CONTENTS text region under the CHP formatting-run table and
//! decodes each run into Unicode text. Decoding never fails on malformed
//! content: unmappable byte sequences become U+FFFD and extraction
//! continues. Only structural corruption propagated from the container
//! aborts; a missing stream degrades to an empty run list.

use encoding_rs::Encoding;

use crate::cfb::Container;
use crate::common::error::Result;
use crate::document::FontStyle;

use super::chp::{self, CharFlags, FormattingRun};
use super::codepage::CodepageTable;
use super::contents::{CONTENTS_STREAM, ContentsText};
use super::props::{DocProperties, PROPS_STREAM};

/// Character-level style of one decoded run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunStyle {
    /// Font size in half-points (0 = unspecified)
    pub size_half_points: u16,
    /// Bold text
    pub bold: bool,
    /// Italic text
    pub italic: bool,
}

impl RunStyle {
    /// Convert to a model font style; an all-default style yields `None`.
    pub fn font_style(&self) -> Option<FontStyle> {
        FontStyle::from_half_points(self.size_half_points, self.bold, self.italic)
    }
}

impl From<&FormattingRun> for RunStyle {
    fn from(run: &FormattingRun) -> Self {
        Self {
            size_half_points: run.size_half_points,
            bold: run.flags.contains(CharFlags::BOLD),
            italic: run.flags.contains(CharFlags::ITALIC),
        }
    }
}

/// One decoded run: Unicode text plus its style, in text-offset order.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRun {
    /// Decoded text (replacement characters for unmappable sequences)
    pub text: String,
    /// Style shared by the whole run
    pub style: RunStyle,
}

/// Extract the ordered decoded-run sequence from a container.
///
/// Missing streams degrade: no CONTENTS (or an unrecognizable one) yields an
/// empty sequence, no CHP table yields one implicit default run, no Props
/// stream selects the default codepage. Errors surface only for structural
/// corruption encountered while materializing a stream.
pub fn extract(container: &Container, codepages: &CodepageTable) -> Result<Vec<DecodedRun>> {
    let Some(handle) = container.find_stream(CONTENTS_STREAM) else {
        return Ok(Vec::new());
    };
    let stream = handle.read()?;
    let Some(contents) = ContentsText::parse(&stream) else {
        return Ok(Vec::new());
    };

    let raw_runs = match container.find_stream(chp::CHP_STREAM) {
        Some(handle) => chp::parse_runs(&handle.read()?),
        None => Vec::new(),
    };
    let runs = chp::normalize_runs(raw_runs, contents.text.len() as u32);

    let props = match container.find_stream(PROPS_STREAM) {
        Some(handle) => DocProperties::parse(&handle.read()?),
        None => DocProperties::default(),
    };

    let encoding = if contents.utf16 {
        encoding_rs::UTF_16LE
    } else {
        codepages.encoding_or_default(props.codepage)
    };

    Ok(runs
        .iter()
        .map(|run| DecodedRun {
            text: decode_range(contents.text, run, encoding),
            style: RunStyle::from(run),
        })
        .collect())
}

/// Decode one run's byte range. Bounds were established by run
/// normalization; unmappable sequences become U+FFFD.
fn decode_range(text: &[u8], run: &FormattingRun, encoding: &'static Encoding) -> String {
    let bytes = &text[run.start as usize..run.end as usize];
    encoding.decode_without_bom_handling(bytes).0.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_range_windows_1252() {
        let text = b"caf\xE9";
        let run = FormattingRun::default_over(0, 4);
        assert_eq!(
            decode_range(text, &run, encoding_rs::WINDOWS_1252),
            "café"
        );
    }

    #[test]
    fn test_decode_range_utf16le() {
        let text = b"W\x00e\x00l\x00c\x00o\x00m\x00e\x00";
        let run = FormattingRun::default_over(0, 14);
        assert_eq!(decode_range(text, &run, encoding_rs::UTF_16LE), "Welcome");
    }

    #[test]
    fn test_decode_range_gbk() {
        // GBK bytes for 客户 (0xBFCD 0xBBA7)
        let text = b"\xBF\xCD\xBB\xA7";
        let run = FormattingRun::default_over(0, 4);
        assert_eq!(decode_range(text, &run, encoding_rs::GBK), "客户");
    }

    #[test]
    fn test_decode_range_replaces_unmappable() {
        // A lone DBCS lead byte cannot map; the run must still decode
        let text = b"ok\x81";
        let run = FormattingRun::default_over(0, 3);
        let decoded = decode_range(text, &run, encoding_rs::GBK);
        assert!(decoded.starts_with("ok"));
        assert!(decoded.contains('\u{FFFD}'));
    }

    #[test]
    fn test_run_style_font_style() {
        let style = RunStyle {
            size_half_points: 39,
            bold: false,
            italic: false,
        };
        assert_eq!(style.font_style().unwrap().size(), 19.5);

        let unstyled = RunStyle::default();
        assert!(unstyled.font_style().is_none());
    }
}
