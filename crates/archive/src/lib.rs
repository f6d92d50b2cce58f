//! Scene layer packages (`.slpk`).
//!
//! A package is a zip container whose entries are the (individually gzipped)
//! resources of one scene layer. [`Package`] enforces the input contract (an
//! existing file with the `slpk` extension) and derives the working directory
//! the package is unpacked into; [`extract`] performs the unpacking.

pub mod error;
mod extract;
mod package;

pub use crate::extract::{Extraction, extract};
pub use crate::package::{PACKAGE_EXTENSION, Package};
