//! Unified error types for wpsread.
//!
//! Only fatal conditions are represented here. Non-fatal conditions (a missing
//! stream, an unmappable byte sequence) are absorbed by the pipeline and show
//! up as degraded output instead: fewer runs, a replacement character, an
//! empty section.
use thiserror::Error;

/// Main error type for wpsread operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The underlying byte source could not be opened or read
    #[error("source unreadable: {0}")]
    Io(#[from] std::io::Error),

    /// Neither binary nor package signature matched the classification prefix
    #[error("unrecognized document format")]
    UnrecognizedFormat,

    /// Input is not a compound binary container
    #[error("not a compound binary container")]
    NotCompoundFile,

    /// Directory or sector structure of the container is inconsistent
    #[error("corrupted container: {0}")]
    Corrupted(String),

    /// Invalid container format
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    /// XML parsing error in the package branch
    #[error("XML error: {0}")]
    Xml(String),

    /// ZIP archive error in the package branch
    #[error("ZIP error: {0}")]
    Zip(String),

    /// Requested operation has no installed handler
    #[error("unsupported: {0}")]
    Unsupported(String),
}

/// Result type for wpsread operations.
pub type Result<T> = std::result::Result<T, Error>;
