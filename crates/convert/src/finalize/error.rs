//! Error types for the [`finalize`](super) module.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A finalize error with automatic location tracking via [`exn::Exn`].
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for finalize operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The working directory has no name or no parent to place the served
    /// layout next to.
    #[display("working directory has no usable name: {}", _0.display())]
    InvalidWorkingDirectory(#[error(not(source))] PathBuf),
    /// The scene layer's index document was not decompressed.
    #[display("scene layer index document missing: {}", _0.display())]
    MissingIndexDocument(#[error(not(source))] PathBuf),
    /// The served layout already exists and is never overwritten.
    #[display("served layout already exists: {}", _0.display())]
    OutputExists(#[error(not(source))] PathBuf),
    /// Copying, creating or moving entries failed.
    #[display("filesystem operation failed")]
    Storage,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage)
    }
}
