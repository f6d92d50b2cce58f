//! Relocation of a transformed working directory into the served layout.
//!
//! For a working directory `<parent>/<name>` the served layout is
//! `<parent>/<name>_converted/SceneServer/layers/0`. Finalizing first copies
//! the scene layer's decompressed index document from `3dSceneLayer/index.json`
//! to the root of the working directory, then moves every top-level entry into
//! the served layout and removes the emptied working directory.

pub mod error;

use crate::classify::INDEX_DOCUMENT_OUTPUT;
use crate::error::{ErrorKind as LibraryErrorKind, Result as LibraryResult};
use crate::finalize::error::{ErrorKind as FinalizeErrorKind, Result as FinalizeResult};
use exn::ResultExt;
use slpk_storage::error::ErrorKind as StorageErrorKind;
use slpk_storage::ops;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Directory of the scene layer within a package.
pub const SCENE_LAYER_DIR: &str = "3dSceneLayer";
/// Suffix of the directory the served layout is created in.
pub const CONVERTED_SUFFIX: &str = "_converted";
/// Path of the layer below the converted directory, as a scene server serves it.
pub const SERVED_LAYER_PATH: &str = "SceneServer/layers/0";

/// Path the working directory's content is moved to.
pub fn served_layout_path(working_dir: &Path) -> FinalizeResult<PathBuf> {
    let invalid = || FinalizeErrorKind::InvalidWorkingDirectory(working_dir.to_path_buf());
    let name = working_dir.file_name().ok_or_else(invalid)?;
    let parent = working_dir.parent().ok_or_else(invalid)?;
    let mut converted = name.to_os_string();
    converted.push(CONVERTED_SUFFIX);
    Ok(parent.join(converted).join(SERVED_LAYER_PATH))
}

/// Copy `3dSceneLayer/index.json` to the root of the working directory.
pub async fn promote_index_document(working_dir: &Path) -> FinalizeResult<PathBuf> {
    let source = working_dir.join(SCENE_LAYER_DIR).join(INDEX_DOCUMENT_OUTPUT);
    let target = working_dir.join(INDEX_DOCUMENT_OUTPUT);
    match ops::copy(&source, &target).await {
        Ok(_) => Ok(target),
        Err(err) if matches!(&*err, StorageErrorKind::NotFound(_)) => {
            Err(err.raise(FinalizeErrorKind::MissingIndexDocument(source)))
        },
        Err(err) => Err(err.raise(FinalizeErrorKind::Storage)),
    }
}

/// Move every top-level entry of `working_dir` into the served layout, then
/// remove `working_dir`.
///
/// Refuses to run when the served layout already exists. Entries moved
/// before a failure stay in the served layout.
pub async fn relocate(working_dir: &Path) -> FinalizeResult<PathBuf> {
    let target = served_layout_path(working_dir)?;
    match ops::create_new_dir(&target).await {
        Ok(()) => {},
        Err(err) if matches!(&*err, StorageErrorKind::AlreadyExists(_)) => {
            return Err(err.raise(FinalizeErrorKind::OutputExists(target)));
        },
        Err(err) => return Err(err.raise(FinalizeErrorKind::Storage)),
    }
    let moved = ops::move_children(working_dir, &target).await.or_raise(|| FinalizeErrorKind::Storage)?;
    ops::remove_empty_dir(working_dir).await.or_raise(|| FinalizeErrorKind::Storage)?;
    tracing::debug!(entries = moved.len(), "Relocated working directory");
    Ok(target)
}

/// Promote the index document and relocate the working directory, returning
/// the served layout path.
///
/// # Errors
/// Returns [`Exn<LibraryErrorKind::Finalize>`](LibraryErrorKind::Finalize)
/// raised from an inner [`Exn<FinalizeErrorKind>`](FinalizeErrorKind).
#[instrument(skip_all, fields(working_dir = %working_dir.display()))]
pub async fn finalize(working_dir: &Path) -> LibraryResult<PathBuf> {
    promote_index_document(working_dir).await.or_raise(|| LibraryErrorKind::Finalize)?;
    relocate(working_dir).await.or_raise(|| LibraryErrorKind::Finalize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// A transformed working directory, as the transform stage leaves it.
    fn transformed_tree(root: &Path) -> PathBuf {
        let working_dir = root.join("Scene");
        fs::create_dir_all(working_dir.join("3dSceneLayer/nodes/1/geometries/0")).unwrap();
        fs::write(working_dir.join("3dSceneLayer/index.json"), br#"{"layerType":"3DObject"}"#).unwrap();
        fs::write(working_dir.join("3dSceneLayer/nodes/1/geometries/0/index.bin"), b"geometry").unwrap();
        fs::write(working_dir.join("metadata.json"), b"{}").unwrap();
        working_dir
    }

    #[test]
    fn test_served_layout_path() {
        assert_eq!(
            served_layout_path(Path::new("/data/Scene")).unwrap(),
            Path::new("/data/Scene_converted/SceneServer/layers/0")
        );
        assert!(matches!(
            &*served_layout_path(Path::new("/")).unwrap_err(),
            FinalizeErrorKind::InvalidWorkingDirectory(_)
        ));
    }

    #[tokio::test]
    async fn test_finalize() {
        let temp_dir = tempfile::tempdir().unwrap();
        let working_dir = transformed_tree(temp_dir.path());

        let layout = finalize(&working_dir).await.unwrap();

        assert_eq!(layout, temp_dir.path().join("Scene_converted/SceneServer/layers/0"));
        assert!(!working_dir.exists());
        assert_eq!(fs::read_to_string(layout.join("index.json")).unwrap(), r#"{"layerType":"3DObject"}"#);
        assert!(layout.join("3dSceneLayer/index.json").is_file());
        assert_eq!(fs::read(layout.join("3dSceneLayer/nodes/1/geometries/0/index.bin")).unwrap(), b"geometry");
        assert!(layout.join("metadata.json").is_file());
    }

    #[tokio::test]
    async fn test_missing_index_document() {
        let temp_dir = tempfile::tempdir().unwrap();
        let working_dir = transformed_tree(temp_dir.path());
        fs::remove_file(working_dir.join("3dSceneLayer/index.json")).unwrap();

        let err = promote_index_document(&working_dir).await.unwrap_err();

        assert!(matches!(&*err, FinalizeErrorKind::MissingIndexDocument(_)));
        assert!(working_dir.join("metadata.json").exists());
    }

    #[tokio::test]
    async fn test_relocate_refuses_existing_layout() {
        let temp_dir = tempfile::tempdir().unwrap();
        let working_dir = transformed_tree(temp_dir.path());
        let layout = temp_dir.path().join("Scene_converted/SceneServer/layers/0");
        fs::create_dir_all(&layout).unwrap();
        fs::write(layout.join("index.json"), b"previous run").unwrap();

        let err = relocate(&working_dir).await.unwrap_err();

        assert!(matches!(&*err, FinalizeErrorKind::OutputExists(path) if path == &layout));
        assert_eq!(fs::read(layout.join("index.json")).unwrap(), b"previous run");
        assert!(working_dir.join("3dSceneLayer/index.json").exists());
    }

    #[tokio::test]
    async fn test_relocate_into_existing_converted_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let working_dir = transformed_tree(temp_dir.path());
        fs::create_dir_all(temp_dir.path().join("Scene_converted/SceneServer")).unwrap();

        let layout = relocate(&working_dir).await.unwrap();

        assert!(layout.join("metadata.json").is_file());
    }
}
