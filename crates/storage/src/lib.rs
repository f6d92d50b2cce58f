//! Filesystem layer for a conversion's working tree.
//!
//! The working tree is the directory a package is extracted into. It is owned
//! exclusively by one conversion run: files are discovered with
//! [`WorkTree::walk`], rewritten in place by the [`ops`] helpers, and finally
//! relocated wholesale into the served layout.

pub mod error;
mod models;
pub mod ops;
mod tree;

pub use crate::models::WorkItem;
pub use crate::tree::{WorkItemStream, WorkTree};
