//! In-place transformation of a working tree's node files.
//!
//! Every regular file found by the walk is classified by name; node files
//! are decompressed into their normalized location and then removed, all
//! other files are left where they are. See [`classify`](crate::classify) for
//! the naming rules.
//!
//! [`transform`] streams one [`ConvertEvent`] per file, running either
//! sequentially or with a bounded number of files in flight ([`Strategy`]).
//! Both produce the same tree. [`transform_all`] drives the stream to
//! completion and tallies the result into a [`Report`](crate::Report).

pub mod error;
mod file;
mod stream;

pub use self::file::{Outcome, transform_file};
pub use self::stream::{ConvertEvent, Strategy, transform, transform_all};
