//! Conversion of extracted scene layer packages into the served layout.
//!
//! A package holds one gzipped file per node resource. A scene server wants
//! the same tree uncompressed, with every resource in a directory of its own
//! named `index.json` / `index.bin`, below `SceneServer/layers/0`. The
//! conversion runs in three stages:
//!
//! 1. **Extract** the package into a working directory ([`slpk_archive`]).
//! 2. **Transform** every node file in place ([`transform`]): classify it by
//!    name ([`classify`]), decompress it to its normalized location and remove
//!    the original. Sequentially, or with a bounded number of files in flight
//!    ([`Strategy`]).
//! 3. **Finalize** ([`finalize`]): promote the scene layer's index document to
//!    the root of the working directory, then relocate the whole tree into
//!    `<name>_converted/SceneServer/layers/0`.
//!
//! [`convert`] runs all three and returns a [`Report`].

pub mod classify;
pub mod error;
pub mod finalize;
mod pipeline;
mod report;
pub mod transform;

pub use crate::pipeline::{Context, convert};
pub use crate::report::Report;
pub use crate::transform::{ConvertEvent, Outcome, Strategy, transform, transform_all, transform_file};
pub use slpk_archive::Package;
