//! Codepage decoding table for legacy text streams.
//!
//! Legacy containers declare text encoding as a Windows codepage identifier.
//! The exact set a document family can carry is not fixed, so the mapping is
//! a configurable table rather than hard-coded logic: the built-in entries
//! cover the codepages exercised by known documents, and callers can extend
//! or override them per reader.

use encoding_rs::Encoding;

/// Default codepage when a document declares none: windows-1252 (Western).
pub const DEFAULT_CODEPAGE: u16 = 1252;

/// Map a Windows codepage identifier to an encoding.
///
/// Compiles to a jump table; the returned encoding references are static.
/// Returns `None` for codepages outside the built-in set.
pub fn builtin_encoding(codepage: u16) -> Option<&'static Encoding> {
    match codepage {
        // Windows codepages (Western scripts)
        874 => Some(encoding_rs::WINDOWS_874),   // Thai
        1250 => Some(encoding_rs::WINDOWS_1250), // Central European (Czech, Slovak)
        1251 => Some(encoding_rs::WINDOWS_1251), // Cyrillic
        1252 => Some(encoding_rs::WINDOWS_1252), // Western European (most common)
        1253 => Some(encoding_rs::WINDOWS_1253), // Greek
        1254 => Some(encoding_rs::WINDOWS_1254), // Turkish
        1255 => Some(encoding_rs::WINDOWS_1255), // Hebrew
        1256 => Some(encoding_rs::WINDOWS_1256), // Arabic
        1257 => Some(encoding_rs::WINDOWS_1257), // Baltic
        1258 => Some(encoding_rs::WINDOWS_1258), // Vietnamese

        // East Asian DBCS codepages
        932 => Some(encoding_rs::SHIFT_JIS), // Japanese Shift-JIS
        936 => Some(encoding_rs::GBK),       // Simplified Chinese (GB2312/GBK)
        949 => Some(encoding_rs::EUC_KR),    // Korean
        950 => Some(encoding_rs::BIG5),      // Traditional Chinese (Big5)
        54936 => Some(encoding_rs::GB18030), // Chinese GB18030

        // ISO 8859 series
        28592 => Some(encoding_rs::ISO_8859_2), // Latin 2 (Central European)
        28595 => Some(encoding_rs::ISO_8859_5), // Cyrillic
        28605 => Some(encoding_rs::ISO_8859_15), // Latin 9 (Western European with Euro)

        // Unicode
        1200 => Some(encoding_rs::UTF_16LE),
        1201 => Some(encoding_rs::UTF_16BE),
        65001 => Some(encoding_rs::UTF_8),

        // Unsupported codepage
        _ => None,
    }
}

/// Configurable codepage → encoding table.
///
/// Custom mappings take precedence over the built-in set, so a caller can
/// both add codepages and override defaults.
#[derive(Debug, Clone, Default)]
pub struct CodepageTable {
    custom: Vec<(u16, &'static Encoding)>,
}

impl CodepageTable {
    /// Create a table with only the built-in mappings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or override a mapping.
    pub fn with_mapping(mut self, codepage: u16, encoding: &'static Encoding) -> Self {
        self.custom.retain(|(cp, _)| *cp != codepage);
        self.custom.push((codepage, encoding));
        self
    }

    /// Resolve a codepage to an encoding, if the table knows it.
    pub fn encoding_for(&self, codepage: u16) -> Option<&'static Encoding> {
        self.custom
            .iter()
            .find(|(cp, _)| *cp == codepage)
            .map(|(_, enc)| *enc)
            .or_else(|| builtin_encoding(codepage))
    }

    /// Resolve a declared codepage to an encoding, falling back to the
    /// windows-1252 default for absent or unknown declarations.
    pub fn encoding_or_default(&self, codepage: Option<u16>) -> &'static Encoding {
        codepage
            .and_then(|cp| self.encoding_for(cp))
            .unwrap_or(encoding_rs::WINDOWS_1252)
    }
}
