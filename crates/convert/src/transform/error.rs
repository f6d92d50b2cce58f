//! Error types for the [`transform`](super) module.
//!
//! Uses [`exn`] for automatic location tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A transform error with automatic location tracking via [`exn::Exn`].
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for transform operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Classifies the origin of a single file's transform failure.
///
/// ### Operational Errors
/// - [`ErrorKind::Collision`]
///
/// ### Dependency Errors
/// - [`ErrorKind::Decompress`]
/// - [`ErrorKind::Storage`]
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The file is not valid gzip, or its content is corrupt.
    #[display("invalid or corrupt gzip data")]
    Decompress,
    /// Creating the output directory, writing the output or removing the
    /// source failed.
    #[display("filesystem operation failed")]
    Storage,
    /// Another node file earlier in walk order already targets this output.
    #[display("output already produced by another node file: {}", _0.display())]
    Collision(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage)
    }
}
