//! Props stream: document-level properties.
//!
//! An 8-byte little-endian record:
//!
//! ```text
//! offset  size  field
//! 0       2     version
//! 2       2     codepage (0 = unspecified)
//! 4       2     language id (0 = unspecified)
//! 6       2     reserved
//! ```
//!
//! The stream is optional and parsing is tolerant: anything short or
//! malformed just yields empty properties and the default codepage applies.

use zerocopy::{FromBytes, LE, U16};
use zerocopy_derive::FromBytes as DeriveFromBytes;

/// Name of the properties stream.
pub const PROPS_STREAM: &str = "Props";

/// Size of the properties record.
pub const PROPS_RECORD_LEN: usize = 8;

#[derive(Debug, Clone, DeriveFromBytes)]
#[repr(C)]
struct RawProps {
    version: U16<LE>,
    codepage: U16<LE>,
    language_id: U16<LE>,
    reserved: U16<LE>,
}

/// Parsed document properties.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocProperties {
    /// Declared codepage, when present and non-zero
    pub codepage: Option<u16>,
    /// Declared language id, when present and non-zero
    pub language_id: Option<u16>,
}

impl DocProperties {
    /// Parse a Props stream. Short or absent data yields empty properties.
    pub fn parse(stream: &[u8]) -> Self {
        let Ok(raw) = RawProps::read_from_bytes(&stream[..PROPS_RECORD_LEN.min(stream.len())])
        else {
            return Self::default();
        };
        Self {
            codepage: non_zero(raw.codepage.get()),
            language_id: non_zero(raw.language_id.get()),
        }
    }
}

fn non_zero(value: u16) -> Option<u16> {
    (value != 0).then_some(value)
}
