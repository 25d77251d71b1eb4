//! wpsread - A Rust library for reading legacy binary WPS word-processor files
//!
//! This library parses the pre-XML "binary WPS" family of documents: compound
//! binary containers (structurally related to the legacy MS Word format) whose
//! text lives in sector-chained internal streams, encoded under a per-document
//! legacy codepage or UTF-16LE.
//!
//! # Features
//!
//! - **Format sniffing**: Classify a byte stream as binary container, ZIP
//!   package, or unknown from a bounded prefix (no extension checks)
//! - **Compound container navigation**: Sector-chain/FAT/mini-FAT parsing with
//!   cycle protection, exposing named streams
//! - **Text extraction**: Formatting-run aware decoding (codepage or UTF-16LE)
//!   that substitutes U+FFFD for unmappable bytes instead of failing
//! - **Document assembly**: A generic section/text-run model with half-point
//!   font sizes
//!
//! # Example - Reading a binary WPS file
//!
//! ```no_run
//! use wpsread::Reader;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let doc = Reader::new().load("document.wps")?;
//!
//! // Extract all text
//! println!("Document text: {}", doc.text());
//!
//! // Walk sections and elements
//! for section in doc.sections() {
//!     for element in section.elements() {
//!         if let wpsread::DocumentElement::Text(run) = element {
//!             match run.font_style() {
//!                 Some(style) => println!("{} ({}pt)", run.text(), style.size()),
//!                 None => println!("{}", run.text()),
//!             }
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Low-level container access
//!
//! ```no_run
//! use bytes::Bytes;
//! use wpsread::cfb::Container;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = Bytes::from(std::fs::read("document.wps")?);
//! let container = Container::open(data)?;
//!
//! for name in container.stream_names() {
//!     println!("Stream: {}", name);
//! }
//!
//! if let Some(stream) = container.find_stream("CONTENTS") {
//!     println!("Stream size: {} bytes", stream.len());
//! }
//! # Ok(())
//! # }
//! ```

/// Shared support types: error handling and format detection.
pub mod common;

/// Compound binary container (sector-chained structured storage) parser.
///
/// The container holds named streams located through FAT/mini-FAT sector
/// chains, analogous to a small filesystem embedded in one file.
pub mod cfb;

/// Generic document model produced by the readers.
pub mod document;

/// ZIP/XML package branch: manifest relationships and the collaborator seam.
pub mod package;

/// Binary WPS reader: stream parsing, text extraction, and the dispatcher.
pub mod wps;

// Re-export commonly used types for convenience
pub use common::detection::{FileKind, classify};
pub use common::error::{Error, Result};
pub use document::{Document, DocumentElement, FontStyle, Section, TextRun};
pub use package::{PackageReader, Relationship};
pub use wps::Reader;
pub use wps::codepage::CodepageTable;
