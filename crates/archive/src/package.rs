use crate::error::{ErrorKind, Result};
use std::path::{Path, PathBuf};

/// File extension of scene layer packages.
pub const PACKAGE_EXTENSION: &str = "slpk";

/// A validated scene layer package on disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Package {
    path: PathBuf,
    working_dir: PathBuf,
}
impl Package {
    /// Validate `path` as a package.
    ///
    /// The path is made absolute (without resolving symlinks) so every
    /// derived location is independent of the current directory.
    ///
    /// # Errors
    ///
    /// [`NotFound`](ErrorKind::NotFound) if `path` isn't an existing regular
    /// file, [`NotAPackage`](ErrorKind::NotAPackage) if its extension isn't
    /// `slpk` (compared ASCII case-insensitively).
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let path = std::path::absolute(path).map_err(|_| ErrorKind::NotFound(path.to_path_buf()))?;
        if !path.is_file() {
            exn::bail!(ErrorKind::NotFound(path));
        }
        let is_package = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case(PACKAGE_EXTENSION));
        if !is_package || path.file_stem().is_none() {
            exn::bail!(ErrorKind::NotAPackage(path));
        }
        let working_dir = path.with_extension("");
        Ok(Self { path, working_dir })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory the package is extracted into: the package path without its
    /// extension (`/data/Scene.slpk` → `/data/Scene`).
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Scene.slpk")]
    #[case("Scene.SLPK")]
    #[case("with.dots.slpk")]
    fn test_open_valid(#[case] name: &str) {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(name);
        std::fs::write(&path, b"PK").unwrap();
        let package = Package::open(&path).unwrap();
        assert_eq!(package.path(), path);
        assert_eq!(package.working_dir(), path.with_extension(""));
    }

    #[rstest]
    #[case("Scene.zip")]
    #[case("Scene")]
    #[case("Scene.slpk.gz")]
    #[case(".slpk")]
    fn test_open_wrong_extension(#[case] name: &str) {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(name);
        std::fs::write(&path, b"PK").unwrap();
        let err = Package::open(&path).unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotAPackage(_)));
        assert!(err.is_usage());
    }

    #[test]
    fn test_open_missing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = Package::open(temp_dir.path().join("Missing.slpk")).unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
        assert!(err.is_usage());
    }

    #[test]
    fn test_open_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("Folder.slpk");
        std::fs::create_dir(&path).unwrap();
        let err = Package::open(&path).unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
    }

    #[test]
    fn test_working_dir_is_sibling() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("Scene.slpk");
        std::fs::write(&path, b"PK").unwrap();
        let package = Package::open(&path).unwrap();
        assert_eq!(package.working_dir().parent(), Some(temp_dir.path()));
        assert_eq!(package.working_dir().file_name().unwrap(), "Scene");
    }
}
