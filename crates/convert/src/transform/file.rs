use crate::classify::{Classification, classify};
use crate::error::{ErrorKind as LibraryErrorKind, Result as LibraryResult};
use crate::transform::error::{ErrorKind as TransformErrorKind, Result as TransformResult};
use exn::ResultExt;
use slpk_storage::WorkItem;
use slpk_storage::error::ErrorKind as StorageErrorKind;
use slpk_storage::ops;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// The outcome of (successfully) transforming a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A node resource was decompressed into its own directory.
    Node { source: PathBuf, output: PathBuf },
    /// A node index document was decompressed to `index.json` beside it.
    IndexDocument { source: PathBuf, output: PathBuf },
    /// Not a node file; left untouched.
    Skipped(PathBuf),
}

impl Outcome {
    /// Path of the file that was examined.
    pub fn source(&self) -> &Path {
        match self {
            Self::Node { source, .. } | Self::IndexDocument { source, .. } | Self::Skipped(source) => source,
        }
    }
}

/// Transforms a single file of the working tree.
///
/// Node files are decompressed to the location their name maps to (see
/// [`classify`](crate::classify)) and the gzipped original is deleted once
/// the output is complete. Anything else is reported as
/// [`Outcome::Skipped`] without touching the filesystem.
///
/// On failure the source file is left in place, and no partial output
/// remains. An output directory created for a node resource may remain.
///
/// # Errors
/// Returns [`Exn<LibraryErrorKind::Transform>`](LibraryErrorKind::Transform)
/// raised from an inner [`Exn<TransformErrorKind>`](TransformErrorKind).
pub async fn transform_file(item: &WorkItem) -> LibraryResult<Outcome> {
    transform_file_inner(item).await.or_raise(|| LibraryErrorKind::Transform(item.path()))
}

#[instrument(skip_all, fields(file = %item.path().display()))]
pub(crate) async fn transform_file_inner(item: &WorkItem) -> TransformResult<Outcome> {
    let source = item.path();
    let classification = classify(item);
    let Some(output) = classification.output_in(&item.directory) else {
        tracing::trace!("Not a node file");
        return Ok(Outcome::Skipped(source));
    };

    if let Classification::Node { base, .. } = classification {
        ops::ensure_dir(&item.sibling(base)).await.or_raise(|| TransformErrorKind::Storage)?;
    }
    let bytes = match ops::decompress_file(&source, &output, item.compression).await {
        Ok(bytes) => bytes,
        Err(err) if matches!(&*err, StorageErrorKind::Compression(_)) => {
            return Err(err.raise(TransformErrorKind::Decompress));
        },
        Err(err) => return Err(err.raise(TransformErrorKind::Storage)),
    };
    ops::remove_file(&source).await.or_raise(|| TransformErrorKind::Storage)?;
    tracing::debug!(output = %output.display(), bytes, "Decompressed node file");

    Ok(match classification {
        Classification::IndexDocument => Outcome::IndexDocument { source, output },
        _ => Outcome::Node { source, output },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use slpk_compress::Compression;
    use std::fs;

    fn gzip(content: &[u8]) -> Vec<u8> {
        Compression::Gzip.compress(content).unwrap()
    }

    fn item_for(dir: &Path, name: &str, content: &[u8]) -> WorkItem {
        fs::write(dir.join(name), content).unwrap();
        WorkItem::new(dir, name)
    }

    #[tokio::test]
    async fn test_node_resource() {
        let temp_dir = tempfile::tempdir().unwrap();
        let item = item_for(temp_dir.path(), "0.bin.gz", &gzip(b"\x00\x01\x02geometry"));

        let outcome = transform_file(&item).await.unwrap();

        let output = temp_dir.path().join("0/index.bin");
        assert_eq!(outcome, Outcome::Node { source: item.path(), output: output.clone() });
        assert_eq!(fs::read(&output).unwrap(), b"\x00\x01\x02geometry");
        assert!(!item.path().exists());
    }

    #[tokio::test]
    async fn test_index_document() {
        let temp_dir = tempfile::tempdir().unwrap();
        let item = item_for(temp_dir.path(), "3dNodeIndexDocument.json.gz", &gzip(br#"{"id":"1"}"#));

        let outcome = transform_file(&item).await.unwrap();

        let output = temp_dir.path().join("index.json");
        assert_eq!(outcome, Outcome::IndexDocument { source: item.path(), output: output.clone() });
        assert_eq!(fs::read_to_string(&output).unwrap(), r#"{"id":"1"}"#);
        assert!(!item.path().exists());
    }

    #[tokio::test]
    async fn test_existing_output_directory_is_reused() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::create_dir(temp_dir.path().join("0")).unwrap();
        fs::write(temp_dir.path().join("0/index.json"), b"{}").unwrap();
        let item = item_for(temp_dir.path(), "0.bin.gz", &gzip(b"geometry"));

        transform_file(&item).await.unwrap();

        assert_eq!(fs::read(temp_dir.path().join("0/index.json")).unwrap(), b"{}");
        assert_eq!(fs::read(temp_dir.path().join("0/index.bin")).unwrap(), b"geometry");
    }

    #[tokio::test]
    async fn test_other_file_is_untouched() {
        let temp_dir = tempfile::tempdir().unwrap();
        let item = item_for(temp_dir.path(), "x.gz", &gzip(b"not a node"));

        let outcome = transform_file(&item).await.unwrap();

        assert_eq!(outcome, Outcome::Skipped(item.path()));
        assert_eq!(outcome.source(), item.path());
        assert!(item.path().exists());
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_invalid_gzip_keeps_source() {
        let temp_dir = tempfile::tempdir().unwrap();
        let item = item_for(temp_dir.path(), "0.bin.gz", b"plain text, not gzip");

        let err = transform_file(&item).await.unwrap_err();

        assert!(matches!(&*err, LibraryErrorKind::Transform(path) if path == &item.path()));
        assert!(item.path().exists());
        assert!(!temp_dir.path().join("0/index.bin").exists());
    }
}
