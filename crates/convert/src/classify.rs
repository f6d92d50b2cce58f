//! Node file naming.
//!
//! A node file's name decides where its decompressed content goes. The name is
//! read component-wise, split on `.`:
//!
//! | Name                          | Classification             | Output (same directory) |
//! |-------------------------------|----------------------------|-------------------------|
//! | `3dNodeIndexDocument.json.gz` | [`IndexDocument`]          | `index.json`            |
//! | `0.bin.gz`                    | [`Node`] `0` / `bin`       | `0/index.bin`           |
//! | `a.b.json.gz`                 | [`Node`] `a` / `b`         | `a/index.b`             |
//! | `x.gz`, `.json.gz`, `a.json`  | [`Other`]                  | left untouched          |
//! | `0.bin.GZ`                    | [`Other`]                  | left untouched          |
//!
//! Only the first two components count; anything between the extension and
//! the trailing `gz` is dropped. Whether a file is gzipped at all is taken from
//! the [`WorkItem`]'s detected compression, which matches `.gz` exactly.
//!
//! [`IndexDocument`]: Classification::IndexDocument
//! [`Node`]: Classification::Node
//! [`Other`]: Classification::Other

use slpk_compress::Compression;
use slpk_storage::WorkItem;
use std::path::{Path, PathBuf};

/// File name of a node's gzipped index document.
pub const INDEX_DOCUMENT_NAME: &str = "3dNodeIndexDocument.json.gz";
/// File name an index document is decompressed to.
pub const INDEX_DOCUMENT_OUTPUT: &str = "index.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification<'a> {
    /// A node's index document, decompressed next to itself as `index.json`.
    IndexDocument,
    /// Any other gzipped resource, decompressed to `<base>/index.<extension>`.
    Node { base: &'a str, extension: &'a str },
    /// Not a node file.
    Other,
}

impl Classification<'_> {
    /// Output path for a file of this classification living in `directory`,
    /// or `None` for [`Other`](Self::Other).
    pub fn output_in(&self, directory: &Path) -> Option<PathBuf> {
        match self {
            Self::IndexDocument => Some(directory.join(INDEX_DOCUMENT_OUTPUT)),
            Self::Node { base, extension } => Some(directory.join(base).join(format!("index.{extension}"))),
            Self::Other => None,
        }
    }
}

/// Classify a walked file by its name and detected compression.
pub fn classify(item: &WorkItem) -> Classification<'_> {
    let name = item.name.as_str();
    if name == INDEX_DOCUMENT_NAME {
        return Classification::IndexDocument;
    }
    if item.compression != Compression::Gzip {
        return Classification::Other;
    }
    // At least `<base>.<extension>.gz`; for `x.gz` the second component would
    // be the compression suffix itself.
    let mut components = name.split('.');
    match (components.next(), components.next(), components.next()) {
        (Some(base), Some(extension), Some(_)) if !base.is_empty() && !extension.is_empty() => {
            Classification::Node { base, extension }
        },
        _ => Classification::Other,
    }
}
