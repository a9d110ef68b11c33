use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias for array codec operations.
pub type NpyResult<T> = Result<T, NpyError>;

/// Error type surfaced by the array codec.
#[derive(Debug, Error)]
pub enum NpyError {
    /// The file could not be opened or created.
    #[error("cannot access {}: {source}", path.display())]
    Open {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The underlying stream failed mid-read or mid-write.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    /// The bytes do not form a recognized array file.
    #[error("not a recognized array file: {0}")]
    Format(String),
    /// The header describes an array this codec does not handle.
    #[error("unsupported array header: {0}")]
    UnsupportedHeader(String),
    /// The file parsed correctly but holds no elements.
    #[error("array file contains no data")]
    Empty,
    /// Strict reads reject payload bytes beyond the declared shape.
    #[error("{count} unexpected trailing payload bytes")]
    TrailingBytes {
        /// Number of bytes left after the last declared element.
        count: usize,
    },
}

impl NpyError {
    pub(crate) fn format(message: impl Into<String>) -> Self {
        Self::Format(message.into())
    }

    pub(crate) fn unsupported(message: impl Into<String>) -> Self {
        Self::UnsupportedHeader(message.into())
    }

    /// Returns `true` for failures to reach the underlying storage.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Open { .. } | Self::Io(_))
    }

    /// Returns `true` when the stream is not a valid array file.
    pub fn is_format(&self) -> bool {
        matches!(
            self,
            Self::Format(_) | Self::UnsupportedHeader(_) | Self::TrailingBytes { .. }
        )
    }
}

/// Maps an early end-of-stream to a format error; other i/o failures pass through.
pub(crate) fn eof_as_format<T>(result: io::Result<T>, what: &str) -> NpyResult<T> {
    result.map_err(|err| match err.kind() {
        io::ErrorKind::UnexpectedEof => NpyError::format(format!("truncated {what}")),
        _ => NpyError::Io(err),
    })
}
