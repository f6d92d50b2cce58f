//! Archive Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// An archive error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for archive operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// ### Usage Errors
/// Detected before anything on disk is touched.
/// - [`ErrorKind::NotFound`]
/// - [`ErrorKind::NotAPackage`]
///
/// ### Operational Errors
/// - [`ErrorKind::WorkingDirectoryExists`]
/// - [`ErrorKind::InvalidArchive`]
/// - [`ErrorKind::Storage`]
/// - [`ErrorKind::Task`]
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The input path does not exist or is not a regular file.
    #[display("package not found: {}", _0.display())]
    NotFound(#[error(not(source))] PathBuf),
    /// The input file does not carry the package extension.
    #[display("not a scene layer package (expected a .slpk file): {}", _0.display())]
    NotAPackage(#[error(not(source))] PathBuf),
    /// Debris from an earlier run occupies the working directory.
    #[display("working directory already exists: {}", _0.display())]
    WorkingDirectoryExists(#[error(not(source))] PathBuf),
    /// The package is not a readable zip container, or an entry is corrupt.
    #[display("invalid or corrupted package")]
    InvalidArchive,
    /// Writing the extracted entries failed.
    #[display("could not write extracted entries")]
    Storage,
    /// The blocking extraction task panicked or was cancelled.
    #[display("extraction task failed")]
    Task,
}

impl ErrorKind {
    /// Returns `true` for errors caused by how the program was invoked.
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::NotAPackage(_))
    }

    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage | Self::Task)
    }
}
