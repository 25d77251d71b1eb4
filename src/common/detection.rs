//! Format sniffer: classify a byte stream from a bounded prefix.
//!
//! Classification is signature-based, never name-based. The sniffer looks at
//! no more than the first [`CLASSIFY_PREFIX_LEN`] bytes, so it can run before
//! a large file is fully loaded.

use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;

/// Maximum number of bytes the sniffer inspects.
pub const CLASSIFY_PREFIX_LEN: usize = 1024;

/// Chunk magic tokens identifying the binary WPS family. Either token may
/// appear anywhere in the classification prefix; container headers vary, so
/// the match is not anchored to offset 0.
pub const BINARY_MAGIC_TOKENS: [&[u8; 7]; 2] = [b"CHNKWKS", b"CHNKINK"];

/// ZIP local-file header signature ("PK\x03\x04").
const ZIP_LOCAL_HEADER: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

static BINARY_MAGIC: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::new(BINARY_MAGIC_TOKENS)
        .unwrap_or_else(|e| unreachable!("fixed pattern set must compile: {e}"))
});

/// Result of classifying a byte stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Legacy binary compound container (chunk magic found in the prefix)
    Binary,
    /// ZIP-based XML package, handled by the package branch
    Package,
    /// Neither signature matched; the caller decides whether this is an error
    Unknown,
}

/// Classify a byte stream by its leading bytes.
///
/// Returns [`FileKind::Unknown`] rather than failing: absence of a match is a
/// valid classification, and inputs shorter than any signature are simply
/// `Unknown`.
///
/// # Examples
///
/// ```
/// use wpsread::{FileKind, classify};
///
/// let mut data = vec![0u8; 64];
/// data[20..27].copy_from_slice(b"CHNKWKS");
/// assert_eq!(classify(&data), FileKind::Binary);
///
/// assert_eq!(classify(b"PK\x03\x04rest"), FileKind::Package);
/// assert_eq!(classify(b""), FileKind::Unknown);
/// ```
pub fn classify(bytes: &[u8]) -> FileKind {
    let prefix = &bytes[..bytes.len().min(CLASSIFY_PREFIX_LEN)];

    if BINARY_MAGIC.find(prefix).is_some() {
        return FileKind::Binary;
    }

    if prefix.len() >= ZIP_LOCAL_HEADER.len() && prefix[..4] == ZIP_LOCAL_HEADER {
        return FileKind::Package;
    }

    FileKind::Unknown
}
