//! Conversion Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction. Stage-specific kinds ([`transform`](crate::transform::error),
//! [`finalize`](crate::finalize::error)) are raised into the kinds below.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A conversion error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for conversion operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Classifies the stage a conversion failed in.
///
/// ### Refused Before Mutation
/// - [`ErrorKind::OutputExists`]
///
/// ### Per-Item Errors
/// - [`ErrorKind::Transform`] - one node file; the others are unaffected.
/// - [`ErrorKind::Walk`] - a directory of the working tree could not be read.
///
/// ### Run Errors
/// - [`ErrorKind::Extract`]
/// - [`ErrorKind::Failures`] - aggregate of every per-item error of the run.
/// - [`ErrorKind::Finalize`]
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The served layout of this package already exists; a previous run's
    /// output is never overwritten.
    #[display("served layout already exists: {}", _0.display())]
    OutputExists(#[error(not(source))] PathBuf),
    /// The package could not be extracted into its working directory.
    #[display("could not extract package")]
    Extract,
    /// The working tree could not be walked.
    #[display("could not walk working directory")]
    Walk,
    /// A single node file could not be transformed.
    #[display("could not transform {}", _0.display())]
    Transform(#[error(not(source))] PathBuf),
    /// One or more items failed during the transform stage.
    #[display("{_0} file(s) could not be transformed")]
    Failures(#[error(not(source))] usize),
    /// The transformed tree could not be moved into the served layout.
    #[display("could not finalize served layout")]
    Finalize,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
