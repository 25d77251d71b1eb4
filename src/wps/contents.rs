//! CONTENTS stream: the chunk header and text region.
//!
//! Layout (little-endian):
//!
//! ```text
//! offset  size  field
//! 0       7     chunk magic ("CHNKWKS" or "CHNKINK")
//! 7       1     version
//! 8       2     flags (bit 0: text region is UTF-16LE)
//! 10      2     reserved
//! 12      4     text length in bytes
//! 16      ..    text region
//! ```
//!
//! The declared text length is clamped to the bytes actually present, so a
//! truncated stream still yields its partial text.

use bitflags::bitflags;
use zerocopy::{FromBytes, LE, U16, U32};
use zerocopy_derive::FromBytes as DeriveFromBytes;

use crate::common::detection::BINARY_MAGIC_TOKENS;

/// Name of the main text stream.
pub const CONTENTS_STREAM: &str = "CONTENTS";

/// Size of the chunk header preceding the text region.
pub const CONTENTS_HEADER_LEN: usize = 16;

bitflags! {
    /// Flag word of the CONTENTS header.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ContentsFlags: u16 {
        /// Text region is UTF-16LE rather than codepage-encoded
        const UTF16 = 0x0001;
    }
}

#[derive(Debug, Clone, DeriveFromBytes)]
#[repr(C)]
struct RawContentsHeader {
    magic: [u8; 7],
    version: u8,
    flags: U16<LE>,
    reserved: U16<LE>,
    text_len: U32<LE>,
}

/// The parsed text region of a CONTENTS stream.
#[derive(Debug, Clone, Copy)]
pub struct ContentsText<'a> {
    /// Whether the text is UTF-16LE
    pub utf16: bool,
    /// The text region bytes (already clamped to the declared length)
    pub text: &'a [u8],
}

impl<'a> ContentsText<'a> {
    /// Parse a CONTENTS stream.
    ///
    /// Returns `None` when the stream is too short for a header or does not
    /// start with a chunk magic token; both degrade to "no text" rather than
    /// failing the load.
    pub fn parse(stream: &'a [u8]) -> Option<Self> {
        if stream.len() < CONTENTS_HEADER_LEN {
            return None;
        }
        let header = RawContentsHeader::read_from_bytes(&stream[..CONTENTS_HEADER_LEN]).ok()?;

        if !BINARY_MAGIC_TOKENS
            .iter()
            .any(|token| header.magic == **token)
        {
            return None;
        }

        let region = &stream[CONTENTS_HEADER_LEN..];
        let declared = header.text_len.get() as usize;
        let text = &region[..declared.min(region.len())];
        let flags = ContentsFlags::from_bits_truncate(header.flags.get());

        Some(Self {
            utf16: flags.contains(ContentsFlags::UTF16),
            text,
        })
    }
}

/// Serialize a CONTENTS header (used by fixtures and round-trip checks).
pub fn encode_header(magic: &[u8; 7], utf16: bool, text_len: u32) -> [u8; CONTENTS_HEADER_LEN] {
    let mut header = [0u8; CONTENTS_HEADER_LEN];
    header[..7].copy_from_slice(magic);
    header[7] = 1; // version
    let flags = if utf16 { ContentsFlags::UTF16.bits() } else { 0 };
    header[8..10].copy_from_slice(&flags.to_le_bytes());
    header[12..16].copy_from_slice(&text_len.to_le_bytes());
    header
}
