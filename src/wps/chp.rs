//! CHP stream: the character-properties (formatting run) table.
//!
//! The table is a flat sequence of 12-byte little-endian records:
//!
//! ```text
//! offset  size  field
//! 0       4     run start (byte offset into the text region)
//! 4       4     run end (exclusive)
//! 8       2     font size in half-points (0 = unspecified)
//! 10      2     flags (bit 0: bold, bit 1: italic)
//! ```
//!
//! Ranges are half-open `[start, end)`. A trailing partial record is ignored.
//! [`normalize_runs`] repairs whatever a damaged table throws at us so the
//! extractor always sees a sorted, non-overlapping cover of the text region.

use bitflags::bitflags;
use zerocopy::{FromBytes, LE, U16, U32};
use zerocopy_derive::FromBytes as DeriveFromBytes;

/// Name of the formatting-run table stream.
pub const CHP_STREAM: &str = "CHP";

/// Size of one formatting-run record.
pub const CHP_RECORD_LEN: usize = 12;

bitflags! {
    /// Character-level formatting flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CharFlags: u16 {
        /// Bold text
        const BOLD = 0x0001;
        /// Italic text
        const ITALIC = 0x0002;
    }
}

#[derive(Debug, Clone, DeriveFromBytes)]
#[repr(C)]
struct RawChpRecord {
    start: U32<LE>,
    end: U32<LE>,
    size_half_points: U16<LE>,
    flags: U16<LE>,
}

/// A formatting run: a half-open byte range of the text region plus its
/// character attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormattingRun {
    /// Byte offset of the first byte of the run
    pub start: u32,
    /// Byte offset one past the last byte of the run
    pub end: u32,
    /// Font size in half-points (0 = unspecified)
    pub size_half_points: u16,
    /// Bold/italic flags
    pub flags: CharFlags,
}

impl FormattingRun {
    /// An implicit default-style run covering `[start, end)`.
    pub fn default_over(start: u32, end: u32) -> Self {
        Self {
            start,
            end,
            size_half_points: 0,
            flags: CharFlags::empty(),
        }
    }
}

/// Parse the raw record sequence of a CHP stream.
///
/// Unknown flag bits are dropped; a trailing partial record is ignored.
pub fn parse_runs(stream: &[u8]) -> Vec<FormattingRun> {
    let mut runs = Vec::with_capacity(stream.len() / CHP_RECORD_LEN);
    for record in stream.chunks_exact(CHP_RECORD_LEN) {
        let Ok(raw) = RawChpRecord::read_from_bytes(record) else {
            break;
        };
        runs.push(FormattingRun {
            start: raw.start.get(),
            end: raw.end.get(),
            size_half_points: raw.size_half_points.get(),
            flags: CharFlags::from_bits_truncate(raw.flags.get()),
        });
    }
    runs
}

/// Normalize a run table against the text region length.
///
/// The result is sorted, non-overlapping, and covers `[0, text_len)` exactly:
/// out-of-range runs are clamped, overlaps are resolved in favor of the
/// earlier run, and gaps are filled with implicit default-style runs. An
/// empty table over non-empty text becomes one default run covering it all.
pub fn normalize_runs(mut runs: Vec<FormattingRun>, text_len: u32) -> Vec<FormattingRun> {
    if text_len == 0 {
        return Vec::new();
    }

    runs.sort_by_key(|run| (run.start, run.end));

    let mut normalized: Vec<FormattingRun> = Vec::with_capacity(runs.len() + 1);
    let mut cursor = 0u32;

    for mut run in runs {
        run.end = run.end.min(text_len);
        run.start = run.start.max(cursor);
        if run.start >= run.end {
            continue;
        }
        if run.start > cursor {
            normalized.push(FormattingRun::default_over(cursor, run.start));
        }
        cursor = run.end;
        normalized.push(run);
    }

    if cursor < text_len {
        normalized.push(FormattingRun::default_over(cursor, text_len));
    }

    normalized
}
