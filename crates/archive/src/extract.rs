use crate::Package;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use slpk_storage::error::ErrorKind as StorageErrorKind;
use slpk_storage::ops;
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::Path;
use tracing::instrument;

/// What [`extract`] did with the working directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extraction {
    /// The package was unpacked; carries the number of files written.
    Extracted(usize),
    /// The working directory already existed and was used as-is.
    Reused,
}

/// Unpack `package` into its working directory.
///
/// The working directory must not exist yet: leftovers from an earlier run
/// are reported as [`WorkingDirectoryExists`](ErrorKind::WorkingDirectoryExists)
/// rather than silently mixed with fresh content. Pass `reuse_existing` to
/// skip extraction and carry on with whatever the directory holds instead.
///
/// Entries whose names would escape the working directory are skipped.
/// Extraction is not transactional; on failure the working directory is left
/// partially populated.
#[instrument(skip_all, fields(package = %package.path().display()))]
pub async fn extract(package: &Package, reuse_existing: bool) -> Result<Extraction> {
    let working_dir = package.working_dir();
    match ops::create_new_dir(working_dir).await {
        Ok(()) => {},
        Err(e) if matches!(&*e, StorageErrorKind::AlreadyExists(_)) => {
            if reuse_existing {
                tracing::warn!(
                    working_dir = %working_dir.display(),
                    "Reusing existing working directory; skipping extraction"
                );
                return Ok(Extraction::Reused);
            }
            exn::bail!(ErrorKind::WorkingDirectoryExists(working_dir.to_path_buf()));
        },
        Err(e) => return Err(e).or_raise(|| ErrorKind::Storage),
    }

    let (source, target) = (package.path().to_path_buf(), working_dir.to_path_buf());
    let files = tokio::task::spawn_blocking(move || extract_blocking(&source, &target))
        .await
        .or_raise(|| ErrorKind::Task)??;
    tracing::debug!(files, "Extracted package");
    Ok(Extraction::Extracted(files))
}

fn extract_blocking(source: &Path, target: &Path) -> Result<usize> {
    let file =
        File::open(source).map_err(|e| StorageErrorKind::from_io(e, source)).or_raise(|| ErrorKind::Storage)?;
    let mut archive = zip::ZipArchive::new(BufReader::new(file)).or_raise(|| ErrorKind::InvalidArchive)?;

    let mut count = 0;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).or_raise(|| ErrorKind::InvalidArchive)?;
        let Some(relative) = entry.enclosed_name() else {
            tracing::warn!(entry = entry.name(), "Skipping entry with unsafe path");
            continue;
        };
        let output = target.join(relative);
        if entry.is_dir() {
            fs::create_dir_all(&output)
                .map_err(|e| StorageErrorKind::from_io(e, &output))
                .or_raise(|| ErrorKind::Storage)?;
            continue;
        }
        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| StorageErrorKind::from_io(e, parent))
                .or_raise(|| ErrorKind::Storage)?;
        }
        let mut writer = File::create(&output)
            .map_err(|e| StorageErrorKind::from_io(e, &output))
            .or_raise(|| ErrorKind::Storage)?;
        match io::copy(&mut entry, &mut writer) {
            Ok(_) => count += 1,
            // Checksum mismatches and broken entry streams.
            Err(e) if e.kind() == io::ErrorKind::InvalidData => return Err(e).or_raise(|| ErrorKind::InvalidArchive),
            Err(e) => return Err(StorageErrorKind::from_io(e, &output)).or_raise(|| ErrorKind::Storage),
        }
    }
    Ok(count)
}
