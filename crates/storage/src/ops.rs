//! Filesystem operations on the working tree.
//!
//! All helpers classify failures against the path they happened on (see
//! [`ErrorKind::from_io`]), so callers can tell a missing source from a
//! pre-existing target without inspecting raw [`std::io::Error`]s.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use slpk_compress::Compression;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::instrument;

/// Create a directory and all of its parents, succeeding if it already exists.
///
/// Safe under concurrent callers racing on the same path: losing the race to
/// create any component is not an error.
pub async fn ensure_dir(path: &Path) -> Result<()> {
    Ok(fs::create_dir_all(path).await.map_err(|e| ErrorKind::from_io(e, path))?)
}

/// Create a directory (and any missing parents), failing with
/// [`AlreadyExists`](ErrorKind::AlreadyExists) if the leaf directory is
/// already present.
///
/// The existence check and the creation are a single atomic `mkdir`, so two
/// callers can never both believe they created the directory.
pub async fn create_new_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent).await?;
    }
    Ok(fs::create_dir(path).await.map_err(|e| ErrorKind::from_io(e, path))?)
}

pub async fn exists(path: &Path) -> Result<bool> {
    Ok(fs::try_exists(path).await.map_err(|e| ErrorKind::from_io(e, path))?)
}

pub async fn copy(from: &Path, to: &Path) -> Result<u64> {
    Ok(fs::copy(from, to).await.map_err(|e| ErrorKind::from_io(e, from))?)
}

pub async fn remove_file(path: &Path) -> Result<()> {
    Ok(fs::remove_file(path).await.map_err(|e| ErrorKind::from_io(e, path))?)
}

/// Remove a directory that is expected to be empty.
///
/// Fails instead of deleting anything that is still inside it.
pub async fn remove_empty_dir(path: &Path) -> Result<()> {
    Ok(fs::remove_dir(path).await.map_err(|e| ErrorKind::from_io(e, path))?)
}

/// Move every top-level entry of `from` into the existing directory `to`,
/// returning the moved entries' new paths.
///
/// Entries are renamed, not copied: both directories must be on the same
/// filesystem. An entry that already exists in `to` is reported as
/// [`AlreadyExists`](ErrorKind::AlreadyExists) and nothing is overwritten.
#[instrument(skip_all, fields(from = %from.display(), to = %to.display()))]
pub async fn move_children(from: &Path, to: &Path) -> Result<Vec<PathBuf>> {
    let mut reader = fs::read_dir(from).await.map_err(|e| ErrorKind::from_io(e, from))?;
    let mut moved = Vec::new();
    while let Some(entry) = reader.next_entry().await.map_err(|e| ErrorKind::from_io(e, from))? {
        let target = to.join(entry.file_name());
        if exists(&target).await? {
            exn::bail!(ErrorKind::AlreadyExists(target));
        }
        fs::rename(entry.path(), &target).await.map_err(|e| ErrorKind::from_io(e, &entry.path()))?;
        tracing::debug!(entry = %target.display(), "Moved entry");
        moved.push(target);
    }
    Ok(moved)
}

/// Decompress `source` into `target`, returning the number of bytes written.
///
/// The leading bytes of `source` are checked against `format`'s magic number
/// before anything is written; a mismatch is reported as
/// [`Compression(InvalidData)`](ErrorKind::Compression). If decoding fails
/// part way, the partially written `target` is removed. An existing `target`
/// is overwritten.
///
/// Decoding runs on Tokio's blocking pool.
#[instrument(skip_all, fields(source = %source.display(), target = %target.display(), %format))]
pub async fn decompress_file(source: &Path, target: &Path, format: Compression) -> Result<u64> {
    let (source, target) = (source.to_path_buf(), target.to_path_buf());
    tokio::task::spawn_blocking(move || decompress_file_blocking(&source, &target, format))
        .await
        .or_raise(|| ErrorKind::Task)?
}

fn decompress_file_blocking(source: &Path, target: &Path, format: Compression) -> Result<u64> {
    let input = File::open(source).map_err(|e| ErrorKind::from_io(e, source))?;
    let mut reader = BufReader::new(input);
    let head = reader.fill_buf().map_err(|e| ErrorKind::from_io(e, source))?;
    if !format.check_magic_bytes(head) {
        let err = exn::Exn::from(slpk_compress::error::ErrorKind::InvalidData);
        return Err(ErrorKind::compression(err));
    }
    let output = File::create(target).map_err(|e| ErrorKind::from_io(e, target))?;
    match format.decompress_stream(reader, BufWriter::new(output)) {
        Ok(bytes) => Ok(bytes),
        Err(err) => {
            if let Err(cleanup) = std::fs::remove_file(target) {
                tracing::warn!(target = %target.display(), error = %cleanup, "Could not remove partial output");
            }
            Err(ErrorKind::compression(err))
        },
    }
}
