//! Error types for tabedit-core

use crate::codec::{CodecError, Encoding};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Which end of the pipeline a path belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Source,
    Destination,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Source => write!(f, "source"),
            Role::Destination => write!(f, "destination"),
        }
    }
}

/// Errors that can occur while loading, editing or writing a table
#[derive(Debug, Error)]
pub enum Error {
    /// Source path is missing or not a regular file
    #[error("source file not found or is not a file: {}", path.display())]
    SourceNotFound { path: PathBuf },

    /// Source file exists but has no content
    #[error("source file is empty: {}", path.display())]
    SourceEmpty { path: PathBuf },

    /// File suffix does not map to a known encoding
    #[error("unsupported {role} file type: {}", path.display())]
    UnsupportedEncoding { path: PathBuf, role: Role },

    /// Failed to read a file
    #[error("failed to read file '{}': {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Source bytes are not a valid table in the detected encoding
    #[error("error decoding {encoding} in '{}': {source}", path.display())]
    Decode {
        path: PathBuf,
        encoding: Encoding,
        #[source]
        source: CodecError,
    },

    /// Table could not be serialized to the destination encoding
    #[error("error encoding table as {encoding}: {source}")]
    Encode {
        encoding: Encoding,
        #[source]
        source: CodecError,
    },

    /// An edit token was malformed or out of range; the whole batch is discarded
    #[error("invalid change, please retry")]
    InvalidEdit,

    /// A stage was asked to run without a table from the stage before it
    #[error("cannot apply changes, data not available")]
    NoTable,

    /// I/O failure on the destination
    #[error("error writing to file '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal error
    #[error("failed to list directory: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
