//! Binary WPS reader: stream layouts, extraction pipeline, and the format
//! dispatcher.
//!
//! The dispatcher is a single linear pass per load call:
//!
//! ```text
//! Start --read prefix--> Sniffed --+--> binary pipeline  (cfb -> extract -> assemble)
//!                                  +--> package pipeline (manifest -> collaborator)
//!                                  +--> UnrecognizedFormat
//! ```
//!
//! There is no retry and no cross-branch fallback: a fatal error in either
//! pipeline terminates the call. Each call owns its container and document;
//! nothing is shared or cached across calls, so concurrent loads need no
//! locking.

pub mod assemble;
pub mod chp;
pub mod codepage;
pub mod contents;
pub mod extract;
pub mod props;

pub use assemble::assemble;
pub use extract::{DecodedRun, RunStyle, extract};

use std::fs::File;
use std::io::Read;
use std::path::Path;

use bytes::Bytes;

use crate::cfb::Container;
use crate::common::detection::{CLASSIFY_PREFIX_LEN, FileKind, classify};
use crate::common::error::{Error, Result};
use crate::document::Document;
use crate::package::{self, PackageReader};
use codepage::CodepageTable;

/// Reader for binary WPS documents (with a ZIP-package fallback branch).
///
/// The reader is a pure function from bytes to document model per call; it
/// carries only configuration (the codepage table and the optional package
/// collaborator), never per-document state.
///
/// # Examples
///
/// ```no_run
/// use wpsread::Reader;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let reader = Reader::new();
/// if reader.can_read("letter.wps") {
///     let doc = reader.load("letter.wps")?;
///     println!("{}", doc.text());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct Reader {
    codepages: CodepageTable,
    package_reader: Option<Box<dyn PackageReader>>,
}

impl Reader {
    /// Create a reader with the built-in codepage table and no package
    /// collaborator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the codepage table used for legacy text decoding.
    pub fn with_codepage_table(mut self, codepages: CodepageTable) -> Self {
        self.codepages = codepages;
        self
    }

    /// Install the collaborator that handles the ZIP/XML package branch.
    ///
    /// Without one, package-classified inputs fail with
    /// [`Error::Unsupported`]; they never fall through to container parsing.
    pub fn with_package_reader(mut self, package_reader: Box<dyn PackageReader>) -> Self {
        self.package_reader = Some(package_reader);
        self
    }

    /// Probe whether a file looks loadable, without loading it.
    ///
    /// Reads at most the classification prefix. Never fails: an unreadable
    /// or unrecognized file is simply `false`.
    pub fn can_read(&self, path: impl AsRef<Path>) -> bool {
        let Ok(file) = File::open(path) else {
            return false;
        };
        let mut prefix = Vec::with_capacity(CLASSIFY_PREFIX_LEN);
        if file
            .take(CLASSIFY_PREFIX_LEN as u64)
            .read_to_end(&mut prefix)
            .is_err()
        {
            return false;
        }
        classify(&prefix) != FileKind::Unknown
    }

    /// Load a document from a file path.
    ///
    /// An unreadable path is fatal and surfaces before any parsing.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Document> {
        let data = std::fs::read(path)?;
        self.from_bytes(data)
    }

    /// Load a document from an in-memory buffer.
    pub fn from_bytes(&self, bytes: Vec<u8>) -> Result<Document> {
        let data = Bytes::from(bytes);
        match classify(&data) {
            FileKind::Binary => self.load_binary(data),
            FileKind::Package => self.load_package(&data),
            FileKind::Unknown => Err(Error::UnrecognizedFormat),
        }
    }

    /// The binary pipeline: container -> extractor -> assembler.
    ///
    /// The model is only published after extraction fully succeeds; a fatal
    /// structural error never leaves a partially filled document behind.
    fn load_binary(&self, data: Bytes) -> Result<Document> {
        let container = Container::open(data)?;
        let runs = extract(&container, &self.codepages)?;
        Ok(assemble(runs))
    }

    /// The package branch: parse the manifest relationship listing and hand
    /// off to the installed collaborator.
    fn load_package(&self, data: &[u8]) -> Result<Document> {
        let relationships = package::read_relationships(data)?;
        match &self.package_reader {
            Some(reader) => reader.read(data, &relationships),
            None => Err(Error::Unsupported(
                "no package reader installed for ZIP-based input".to_string(),
            )),
        }
    }
}
