use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while encoding or decoding a packed tileset.
///
/// The format has no resynchronization points, so every error aborts the whole
/// tileset. Callers are expected to attach the asset path when reporting.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The stream does not describe a valid tileset: a negative or inconsistent
    /// count, a truncated record, invalid UTF-8, or an empty reference token.
    #[error("Malformed input while reading {field}: {reason}")]
    MalformedInput { field: &'static str, reason: String },

    /// The encoder was asked to reference an image that was never registered as
    /// a build dependency.
    #[error("Unresolved external reference: {0:?} was not registered as a dependency")]
    UnresolvedReference(PathBuf),

    /// Unknown map-object tag.
    #[error("Invalid map object variant tag: {0}")]
    InvalidVariant(u8),

    /// The in-memory value cannot be expressed in the wire format.
    #[error("Unsupported tileset geometry: {0}")]
    UnsupportedGeometry(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl CodecError {
    pub(crate) fn malformed(field: &'static str, reason: impl Into<String>) -> Self {
        CodecError::MalformedInput {
            field,
            reason: reason.into(),
        }
    }

    /// Maps a failed read of `field` into a codec error. A premature end of
    /// stream becomes [`CodecError::MalformedInput`] so truncation reports the
    /// field it happened in.
    pub(crate) fn from_read(field: &'static str, err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            CodecError::malformed(field, "unexpected end of stream")
        } else {
            CodecError::Io(err)
        }
    }
}
