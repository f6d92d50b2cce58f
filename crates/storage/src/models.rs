//! Storage models.

use slpk_compress::Compression;
use std::path::{Path, PathBuf};

/// A regular file discovered in the working tree.
///
/// Work items are independent of each other: transforming one never reads or
/// writes another item's source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    /// Absolute path of the directory containing the file
    pub directory: PathBuf,
    /// File name within `directory`
    pub name: String,
    /// Compression format detected from the file extension; decides whether
    /// the file is a candidate for decompression at all
    pub compression: Compression,
}
impl WorkItem {
    pub fn new(directory: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        let name = name.into();
        let compression = Compression::from_path(&name);
        Self { directory: directory.into(), name, compression }
    }

    /// Full path of the file.
    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.name)
    }

    /// Path of a sibling entry, in the same directory as this file.
    pub fn sibling(&self, name: impl AsRef<Path>) -> PathBuf {
        self.directory.join(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_compression_from_name() {
        let item = WorkItem::new("/work/Scene/3dSceneLayer", "3dNodeIndexDocument.json.gz");
        assert_eq!(item.compression, Compression::Gzip);
        assert_eq!(item.path(), Path::new("/work/Scene/3dSceneLayer/3dNodeIndexDocument.json.gz"));
        let item = WorkItem::new("/work/Scene", "metadata.json");
        assert_eq!(item.compression, Compression::None);
        assert_eq!(item.sibling("index.json"), Path::new("/work/Scene/index.json"));
    }
}
