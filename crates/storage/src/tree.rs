//! Working tree discovery.

use crate::WorkItem;
use crate::error::{ErrorKind, Result};
use async_stream::stream;
use futures::Stream;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use tokio::fs::{self, DirEntry};

pub type WorkItemStream<'a> = Pin<Box<dyn Stream<Item = Result<WorkItem>> + Send + 'a>>;

enum WalkEntry {
    File(WorkItem),
    Descend(PathBuf),
    Skip,
}

/// The root directory of an extracted package.
///
/// # Examples
///
/// ```no_run
/// use futures::TryStreamExt;
/// use slpk_storage::WorkTree;
///
/// # async fn example() -> slpk_storage::error::Result<()> {
/// let tree = WorkTree::open("/data/Scene").await?;
/// let items: Vec<_> = tree.walk().try_collect().await?;
/// println!("{} files to inspect", items.len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct WorkTree {
    root: PathBuf,
}
impl WorkTree {
    /// Open an existing working tree.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPath`](ErrorKind::InvalidPath) if the path is relative
    /// or not a directory, and [`NotFound`](ErrorKind::NotFound) if it does
    /// not exist.
    pub async fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_absolute() {
            exn::bail!(ErrorKind::InvalidPath(root));
        }
        let metadata = fs::metadata(&root).await.map_err(|e| ErrorKind::from_io(e, &root))?;
        if !metadata.is_dir() {
            exn::bail!(ErrorKind::InvalidPath(root));
        }
        Ok(Self { root })
    }

    /// Recursively stream every regular file below the root.
    ///
    /// Each directory is listed in full (sorted by name) before any of its
    /// files are yielded; files come before the directory's subdirectories,
    /// which are then descended into in name order. The order is therefore
    /// deterministic for a given tree, although callers must not rely on it
    /// for correctness.
    ///
    /// Because a directory is read before its entries are yielded, files a
    /// consumer creates while the stream is suspended only show up if they
    /// land in an already existing directory that hasn't been listed yet.
    /// Directories created next to an already listed entry are never visited.
    ///
    /// Symlinks and other special files are skipped. An unreadable directory
    /// yields an `Err` item and the walk continues with the next directory.
    pub fn walk(&self) -> WorkItemStream<'_> {
        let mut stack = vec![self.root.clone()];

        Box::pin(stream! {
            while let Some(current) = stack.pop() {
                let entries = match Self::read_sorted(&current).await {
                    Ok(entries) => entries,
                    Err(e) => {
                        yield Err(e);
                        continue;
                    },
                };
                let mut descend = Vec::new();
                for entry in entries {
                    match Self::process_entry(entry).await {
                        Ok(WalkEntry::File(item)) => yield Ok(item),
                        Ok(WalkEntry::Descend(dir)) => descend.push(dir),
                        Ok(WalkEntry::Skip) => {},
                        Err(e) => yield Err(e),
                    }
                }
                // Reversed so the stack pops them in name order.
                stack.extend(descend.into_iter().rev());
            }
        })
    }

    async fn read_sorted(directory: &Path) -> Result<Vec<DirEntry>> {
        let mut reader = fs::read_dir(directory).await.map_err(|e| ErrorKind::from_io(e, directory))?;
        let mut entries = Vec::new();
        while let Some(entry) = reader.next_entry().await.map_err(|e| ErrorKind::from_io(e, directory))? {
            entries.push(entry);
        }
        entries.sort_by_key(DirEntry::file_name);
        Ok(entries)
    }

    async fn process_entry(entry: DirEntry) -> Result<WalkEntry> {
        let path = entry.path();
        // Does not follow symlinks.
        let metadata = entry.metadata().await.map_err(|e| ErrorKind::from_io(e, &path))?;
        if metadata.is_dir() {
            return Ok(WalkEntry::Descend(path));
        }
        if !metadata.is_file() {
            tracing::debug!(path = %path.display(), "Skipping special file");
            return Ok(WalkEntry::Skip);
        }
        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            tracing::warn!(path = %path.display(), "Skipping file with non UTF-8 name");
            return Ok(WalkEntry::Skip);
        };
        let directory = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(WalkEntry::File(WorkItem::new(directory, name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use futures::TryStreamExt;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, b"data").unwrap();
    }

    #[tokio::test]
    async fn test_open_requires_absolute_existing_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(WorkTree::open(temp_dir.path()).await.is_ok());
        assert!(WorkTree::open("relative/path").await.is_err());

        let missing = WorkTree::open(temp_dir.path().join("missing")).await.unwrap_err();
        assert!(matches!(&*missing, ErrorKind::NotFound(_)));

        touch(temp_dir.path(), "file.txt");
        let file = WorkTree::open(temp_dir.path().join("file.txt")).await.unwrap_err();
        assert!(matches!(&*file, ErrorKind::InvalidPath(_)));
    }

    #[tokio::test]
    async fn test_walk_empty_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let tree = WorkTree::open(temp_dir.path()).await.unwrap();
        let items: Vec<WorkItem> = tree.walk().try_collect().await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_walk_finds_every_file_in_order() {
        let temp_dir = tempfile::tempdir().unwrap();
        touch(temp_dir.path(), "metadata.json");
        touch(temp_dir.path(), "3dSceneLayer/3dNodeIndexDocument.json.gz");
        touch(temp_dir.path(), "3dSceneLayer/nodes/1/geometries/0.bin.gz");
        touch(temp_dir.path(), "3dSceneLayer/nodes/1/3dNodeIndexDocument.json.gz");
        touch(temp_dir.path(), "3dSceneLayer/nodes/root/3dNodeIndexDocument.json.gz");
        std::fs::create_dir_all(temp_dir.path().join("empty/nested")).unwrap();

        let tree = WorkTree::open(temp_dir.path()).await.unwrap();
        let items: Vec<WorkItem> = tree.walk().try_collect().await.unwrap();
        let paths: Vec<_> =
            items.iter().map(|i| i.path().strip_prefix(temp_dir.path()).unwrap().to_path_buf()).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("metadata.json"),
                PathBuf::from("3dSceneLayer/3dNodeIndexDocument.json.gz"),
                PathBuf::from("3dSceneLayer/nodes/1/3dNodeIndexDocument.json.gz"),
                PathBuf::from("3dSceneLayer/nodes/1/geometries/0.bin.gz"),
                PathBuf::from("3dSceneLayer/nodes/root/3dNodeIndexDocument.json.gz"),
            ]
        );
        assert_eq!(items[1].directory, temp_dir.path().join("3dSceneLayer"));
        assert_eq!(items[1].name, "3dNodeIndexDocument.json.gz");
    }

    #[tokio::test]
    async fn test_walk_interleaves_with_consumer() {
        let temp_dir = tempfile::tempdir().unwrap();
        touch(temp_dir.path(), "a.json.gz");
        touch(temp_dir.path(), "nested/b.json.gz");
        let tree = WorkTree::open(temp_dir.path()).await.unwrap();
        let mut stream = tree.walk();
        let first = stream.try_next().await.unwrap().unwrap();
        assert_eq!(first.name, "a.json.gz");
        // Created inside an already listed directory: never visited.
        touch(temp_dir.path(), "a/index.json");
        // Created inside a directory that is still pending: visited.
        touch(temp_dir.path(), "nested/a.txt");
        let names: Vec<String> = stream.map_ok(|item| item.name).try_collect().await.unwrap();
        assert_eq!(names, vec!["a.txt".to_string(), "b.json.gz".to_string()]);
    }

    #[tokio::test]
    async fn test_walk_missing_root_yields_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path().join("Scene");
        std::fs::create_dir(&root).unwrap();
        let tree = WorkTree::open(&root).await.unwrap();
        std::fs::remove_dir(&root).unwrap();
        let result: Result<Vec<WorkItem>> = tree.walk().try_collect().await;
        assert!(matches!(&*result.unwrap_err(), ErrorKind::NotFound(_)));
    }
}
